//! DER canonical ordering of SET OF components
//!
//! The components of a SET OF are encoded one after another, back to front,
//! recording a [`BufLocDescr`] for each. [`BerEncoder::der_canonical_sort`]
//! then rewrites that region so the encodings appear in ascending
//! lexicographic order, as DER requires.
//!
//! # Usage Example
//!
//! ```rust
//! use asn1rt_ber::ber::{BerEncoder, BerLength, BerTag, Tagging};
//!
//! let mut encoder = BerEncoder::new();
//! let mut components = Vec::new();
//! for value in [7, 300, -1] {
//!     let len = encoder.encode_i32(value, Tagging::Explicit)?;
//!     components.push(encoder.buf_loc_descr(len));
//! }
//! let len = encoder.der_canonical_sort(&mut components)?;
//! encoder.encode_tag_len(BerTag::SET, BerLength::Definite(len))?;
//! assert_eq!(
//!     encoder.message(),
//!     &[0x31, 0x0A, 0x02, 0x01, 0x07, 0x02, 0x01, 0xFF, 0x02, 0x02, 0x01, 0x2C]
//! );
//! # Ok::<(), asn1rt_core::CodecError>(())
//! ```

use crate::ber::encoder::BerEncoder;
use crate::ber::types::BufLocDescr;
use asn1rt_core::error::{CodecError, CodecResult, ErrorKind, Traced};
use std::cmp::Ordering;

impl BerEncoder<'_> {
    /// Sort the encoded components of a SET OF into DER order
    ///
    /// The components must be the most recently encoded bytes, recorded in
    /// the order they were encoded. Components are compared octet by octet
    /// over the shorter length; on a tie the shorter one sorts first.
    ///
    /// # Returns
    /// The total size of the components, i.e. the content length of the
    /// SET OF. On return `components` lists them from last to first in
    /// message order.
    pub fn der_canonical_sort(&mut self, components: &mut [BufLocDescr]) -> CodecResult<usize> {
        let mut swapped = false;
        let mut swap = true;
        while swap {
            swap = false;
            for i in 1..components.len() {
                let first = self
                    .buffer
                    .slice_from_end(components[i - 1].offset, components[i - 1].num_octets)
                    .traced()?;
                let second = self
                    .buffer
                    .slice_from_end(components[i].offset, components[i].num_octets)
                    .traced()?;

                let common = first.len().min(second.len());
                let ordering = first[..common].cmp(&second[..common]);
                if ordering == Ordering::Less
                    || (ordering == Ordering::Equal && first.len() < second.len())
                {
                    components.swap(i - 1, i);
                    swap = true;
                    swapped = true;
                }
            }
        }

        let total: usize = components.iter().map(|c| c.num_octets).sum();
        log::debug!(
            "canonical sort: {} components, {} octets, reordered {}",
            components.len(),
            total,
            swapped
        );
        if !swapped {
            return Ok(total);
        }

        let mut sorted = vec![0u8; total];
        let mut offset = total;
        for component in components.iter() {
            let bytes = self
                .buffer
                .slice_from_end(component.offset, component.num_octets)
                .traced()?;
            offset -= bytes.len();
            sorted[offset..offset + bytes.len()].copy_from_slice(bytes);
        }

        let region = self
            .buffer
            .written_mut()
            .get_mut(..total)
            .ok_or_else(|| CodecError::new(ErrorKind::OutOfBounds))?;
        region.copy_from_slice(&sorted);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::types::{BerLength, BerTag, Tagging};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn encode_set_of(values: &[i64]) -> Vec<u8> {
        let mut encoder = BerEncoder::new();
        let mut components = Vec::new();
        for value in values.iter().rev() {
            let len = encoder.encode_i64(*value, Tagging::Explicit).unwrap();
            components.push(encoder.buf_loc_descr(len));
        }
        let len = encoder.der_canonical_sort(&mut components).unwrap();
        encoder
            .encode_tag_len(BerTag::SET, BerLength::Definite(len))
            .unwrap();
        encoder.message().to_vec()
    }

    #[test]
    fn test_sorted_input_unchanged() {
        assert_eq!(
            encode_set_of(&[1, 2, 3]),
            &[0x31, 0x09, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02, 0x02, 0x01, 0x03]
        );
    }

    #[test]
    fn test_set_of_order_independent() {
        let expected = encode_set_of(&[-5, 0, 1, 127, 128, 70000]);
        let mut values = vec![-5i64, 0, 1, 127, 128, 70000];
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..50 {
            values.shuffle(&mut rng);
            assert_eq!(encode_set_of(&values), expected, "order {:?}", values);
        }
    }

    #[test]
    fn test_shorter_prefix_sorts_first() {
        let mut encoder = BerEncoder::new();
        let mut components = Vec::new();
        for bytes in [&[0x01][..], &[0x01, 0x00][..], &[0x00, 0xFF][..]] {
            let len = encoder.memcpy(bytes).unwrap();
            components.push(encoder.buf_loc_descr(len));
        }
        assert_eq!(encoder.message(), &[0x00, 0xFF, 0x01, 0x00, 0x01]);
        assert_eq!(encoder.der_canonical_sort(&mut components).unwrap(), 5);
        assert_eq!(encoder.message(), &[0x00, 0xFF, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_sort_after_buffer_growth() {
        let config = asn1rt_core::config::CodecConfig::new().encode_extent(4);
        let mut encoder = BerEncoder::with_config(config);
        let mut components = Vec::new();
        for value in [9i64, 300, 2] {
            let len = encoder.encode_i64(value, Tagging::Explicit).unwrap();
            components.push(encoder.buf_loc_descr(len));
        }
        let len = encoder.der_canonical_sort(&mut components).unwrap();
        assert_eq!(len, 10);
        assert_eq!(
            encoder.message(),
            &[0x02, 0x01, 0x02, 0x02, 0x01, 0x09, 0x02, 0x02, 0x01, 0x2C]
        );
    }

    #[test]
    fn test_empty_set() {
        let mut encoder = BerEncoder::new();
        assert_eq!(encoder.der_canonical_sort(&mut []).unwrap(), 0);
    }
}
