//! BER encoder for ASN.1 structures
//!
//! The encoder writes back to front. A value's content is encoded first, and
//! its length and tag are then prepended once the content size is known, so
//! no length patching pass is needed. Sequence members are therefore encoded
//! in reverse order: the last member first.
//!
//! Every encode function returns the number of bytes it added to the buffer.
//!
//! # Usage Example
//!
//! ```rust
//! use asn1rt_ber::ber::{BerEncoder, BerTag, Tagging};
//!
//! let mut encoder = BerEncoder::new();
//! let len = encoder.encode_constructed(BerTag::SEQUENCE, |enc| {
//!     let mut len = enc.encode_bool(true, Tagging::Explicit)?;
//!     len += enc.encode_i32(5, Tagging::Explicit)?;
//!     Ok(len)
//! })?;
//! assert_eq!(len, 8);
//! assert_eq!(encoder.message(), &[0x30, 0x06, 0x02, 0x01, 0x05, 0x01, 0x01, 0xFF]);
//! # Ok::<(), asn1rt_core::CodecError>(())
//! ```

use crate::ber::types::{BerLength, BerTag, BufLocDescr, TM_B_IDCODE};
use crate::buffer::EncodeBuffer;
use asn1rt_core::config::CodecConfig;
use asn1rt_core::error::{CodecResult, Traced};
use bytes::Bytes;

/// BER encoder for ASN.1 structures
///
/// # Memory Management
///
/// The encoder owns a growable buffer by default. [`BerEncoder::with_buffer`]
/// encodes into a caller-supplied slice instead; running out of room there
/// is [`asn1rt_core::ErrorKind::BufferOverflow`].
///
/// # Error Handling
///
/// All encoding operations return [`CodecResult`]. Errors can occur due to:
/// - A full fixed buffer or the configured size limit of a dynamic one
/// - Values that have no valid encoding (bad OIDs, malformed big integers,
///   empty open types)
#[derive(Debug)]
pub struct BerEncoder<'b> {
    pub(crate) buffer: EncodeBuffer<'b>,
    pub(crate) config: CodecConfig,
}

impl Default for BerEncoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'b> BerEncoder<'b> {
    /// Create an encoder with a dynamic buffer
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Create an encoder with a dynamic buffer and the given configuration
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            buffer: EncodeBuffer::dynamic(&config),
            config,
        }
    }

    /// Create an encoder writing into a caller-supplied buffer
    ///
    /// The message ends at the last byte of `buf`.
    pub fn with_buffer(buf: &'b mut [u8]) -> Self {
        Self {
            buffer: EncodeBuffer::fixed(buf),
            config: CodecConfig::default(),
        }
    }

    /// Start a new message
    ///
    /// # Arguments
    /// * `buf` - Destination buffer, or `None` for a dynamic buffer
    pub fn setp(&mut self, buf: Option<&'b mut [u8]>) {
        self.buffer = match buf {
            Some(buf) if !buf.is_empty() => EncodeBuffer::fixed(buf),
            _ => EncodeBuffer::dynamic(&self.config),
        };
    }

    /// Active configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The encode buffer
    pub fn buffer(&self) -> &EncodeBuffer<'b> {
        &self.buffer
    }

    /// Mutable access to the encode buffer
    pub fn buffer_mut(&mut self) -> &mut EncodeBuffer<'b> {
        &mut self.buffer
    }

    /// Discard the message encoded so far
    pub fn reset(&mut self) {
        self.buffer.reset();
    }

    /// The finished message
    pub fn message(&self) -> &[u8] {
        self.buffer.written()
    }

    /// Length of the message encoded so far
    pub fn message_len(&self) -> usize {
        self.buffer.len()
    }

    /// Take the finished message
    pub fn into_message(self) -> Bytes {
        self.buffer.into_bytes()
    }

    /// Prepend raw bytes
    pub fn memcpy(&mut self, bytes: &[u8]) -> CodecResult<usize> {
        self.buffer.prepend_bytes(bytes).traced()?;
        Ok(bytes.len())
    }

    /// Encode a base-128 identifier (tag number or OID arc)
    ///
    /// The last octet has the high bit clear; every octet before it has it
    /// set.
    pub fn encode_identifier(&mut self, ident: u32) -> CodecResult<usize> {
        let mut value = ident;
        let mut count = 0;
        loop {
            let mut octet = (value % 128) as u8;
            if count > 0 {
                octet |= 0x80;
            }
            self.buffer.prepend_byte(octet).traced()?;
            count += 1;
            value /= 128;
            if value == 0 {
                break;
            }
        }
        Ok(count)
    }

    /// Encode a tag
    ///
    /// # Encoding Format
    /// - Tag number < 31: one octet holding class, form and number
    /// - Tag number >= 31: `class|form|0x1F` followed by the number in
    ///   base 128
    pub fn encode_tag(&mut self, tag: BerTag) -> CodecResult<usize> {
        match tag.to_octet() {
            Some(octet) => {
                self.buffer.prepend_byte(octet).traced()?;
                Ok(1)
            }
            None => {
                let len = self.encode_identifier(tag.number())?;
                self.buffer
                    .prepend_byte(tag.class_form_octet() | TM_B_IDCODE)
                    .traced()?;
                Ok(len + 1)
            }
        }
    }

    /// Encode a length
    ///
    /// # Encoding Format
    /// - 0-127: one octet
    /// - 128 and above: `0x80 | n` followed by `n` big-endian octets
    /// - Indefinite: `0x80`
    pub fn encode_len(&mut self, length: BerLength) -> CodecResult<usize> {
        let mut len = match length {
            BerLength::Indefinite => {
                self.buffer.prepend_byte(0x80).traced()?;
                return Ok(1);
            }
            BerLength::Definite(len) => len,
        };

        let long_form = len > 127;
        let mut count: u8 = 0;
        loop {
            self.buffer.prepend_byte((len % 256) as u8).traced()?;
            count += 1;
            len /= 256;
            if len == 0 {
                break;
            }
        }
        if long_form {
            self.buffer.prepend_byte(0x80 | count).traced()?;
            count += 1;
        }
        Ok(count as usize)
    }

    /// Prepend a tag and length to content that is already encoded
    ///
    /// # Returns
    /// Content plus header size for a definite length; header size for an
    /// indefinite length, whose content and EOC the caller has counted.
    pub fn encode_tag_len(&mut self, tag: BerTag, length: BerLength) -> CodecResult<usize> {
        let mut total = self.encode_len(length)?;
        total += self.encode_tag(tag)?;
        if let BerLength::Definite(content) = length {
            total += content;
        }
        Ok(total)
    }

    /// Encode an end-of-contents marker
    pub fn encode_eoc(&mut self) -> CodecResult<usize> {
        self.buffer.prepend_bytes(&[0x00, 0x00]).traced()?;
        Ok(2)
    }

    /// Encode a constructed value
    ///
    /// `content` encodes the members back to front and returns their total
    /// size; the tag and definite length are prepended afterwards.
    pub fn encode_constructed<F>(&mut self, tag: BerTag, content: F) -> CodecResult<usize>
    where
        F: FnOnce(&mut Self) -> CodecResult<usize>,
    {
        let len = content(self).traced()?;
        self.encode_tag_len(tag.constructed(), BerLength::Definite(len))
    }

    /// Describe the element of `num_octets` bytes that was just encoded
    ///
    /// The descriptor stays valid while further elements are prepended.
    pub fn buf_loc_descr(&self, num_octets: usize) -> BufLocDescr {
        BufLocDescr {
            num_octets,
            offset: self.buffer.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::decoder::BerDecoder;
    use asn1rt_core::error::ErrorKind;

    #[test]
    fn test_ber_tag_short_form() {
        let mut encoder = BerEncoder::new();
        assert_eq!(encoder.encode_tag(BerTag::context_specific(true, 2)).unwrap(), 1);
        assert_eq!(encoder.message(), &[0xA2]);
    }

    #[test]
    fn test_ber_tag_long_form() {
        let mut encoder = BerEncoder::new();
        let tag = BerTag::application(false, 201);
        assert_eq!(encoder.encode_tag(tag).unwrap(), 3);
        assert_eq!(encoder.message(), &[0x5F, 0x81, 0x49]);

        let mut decoder = BerDecoder::new();
        decoder.set_buffer(encoder.message());
        assert_eq!(decoder.decode_tag().unwrap(), tag);
    }

    #[test]
    fn test_ber_tag_largest_number() {
        let mut encoder = BerEncoder::new();
        let tag = BerTag::private(true, 0x1FFF_FFFF);
        encoder.encode_tag(tag).unwrap();
        assert_eq!(encoder.message(), &[0xFF, 0x81, 0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_ber_length_short() {
        let mut encoder = BerEncoder::new();
        assert_eq!(encoder.encode_len(BerLength::Definite(0)).unwrap(), 1);
        assert_eq!(encoder.encode_len(BerLength::Definite(127)).unwrap(), 1);
        assert_eq!(encoder.message(), &[0x7F, 0x00]);
    }

    #[test]
    fn test_ber_length_long() {
        let cases: [(usize, &[u8]); 4] = [
            (128, &[0x81, 0x80]),
            (255, &[0x81, 0xFF]),
            (256, &[0x82, 0x01, 0x00]),
            (0x0123_4567, &[0x84, 0x01, 0x23, 0x45, 0x67]),
        ];
        for (len, expected) in cases {
            let mut encoder = BerEncoder::new();
            let count = encoder.encode_len(BerLength::Definite(len)).unwrap();
            assert_eq!(encoder.message(), expected);
            assert_eq!(count, expected.len());
        }
    }

    #[test]
    fn test_ber_length_indefinite() {
        let mut encoder = BerEncoder::new();
        assert_eq!(encoder.encode_len(BerLength::Indefinite).unwrap(), 1);
        assert_eq!(encoder.message(), &[0x80]);
    }

    #[test]
    fn test_encode_tag_len_totals() {
        let mut encoder = BerEncoder::new();
        encoder.memcpy(&[0xAA; 3]).unwrap();
        let total = encoder
            .encode_tag_len(BerTag::OCTET_STRING, BerLength::Definite(3))
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(encoder.message(), &[0x04, 0x03, 0xAA, 0xAA, 0xAA]);
    }

    #[test]
    fn test_indefinite_constructed() {
        let mut encoder = BerEncoder::new();
        let mut len = encoder.encode_eoc().unwrap();
        encoder.memcpy(&[0x05, 0x00]).unwrap();
        len += 2;
        len += encoder
            .encode_tag_len(BerTag::SEQUENCE, BerLength::Indefinite)
            .unwrap();
        assert_eq!(len, 6);
        assert_eq!(encoder.message(), &[0x30, 0x80, 0x05, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_fixed_buffer() {
        let mut storage = [0u8; 4];
        let mut encoder = BerEncoder::with_buffer(&mut storage);
        encoder.memcpy(&[1, 2]).unwrap();
        encoder.encode_tag_len(BerTag::OCTET_STRING, BerLength::Definite(2)).unwrap();
        assert_eq!(encoder.message(), &[0x04, 0x02, 1, 2]);
        let err = encoder.encode_tag(BerTag::SEQUENCE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverflow);
        drop(encoder);
        assert_eq!(storage, [0x04, 0x02, 1, 2]);
    }

    #[test]
    fn test_setp_switches_buffer() {
        let mut storage = [0u8; 2];
        let mut encoder = BerEncoder::new();
        encoder.memcpy(b"old").unwrap();
        encoder.setp(Some(&mut storage));
        assert!(!encoder.buffer().is_dynamic());
        assert!(encoder.message().is_empty());
        encoder.setp(None);
        assert!(encoder.buffer().is_dynamic());
    }

    #[test]
    fn test_buf_loc_descr() {
        let mut encoder = BerEncoder::new();
        encoder.memcpy(&[0x01, 0x01, 0xFF]).unwrap();
        let first = encoder.buf_loc_descr(3);
        encoder.memcpy(&[0x05, 0x00]).unwrap();
        let second = encoder.buf_loc_descr(2);
        assert_eq!(first, BufLocDescr { num_octets: 3, offset: 3 });
        assert_eq!(second, BufLocDescr { num_octets: 2, offset: 5 });
        assert_eq!(encoder.buffer().slice_from_end(second.offset, 2).unwrap(), &[0x05, 0x00]);
    }

    #[test]
    fn test_into_message() {
        let mut encoder = BerEncoder::with_config(CodecConfig::new().encode_extent(2));
        encoder
            .encode_constructed(BerTag::SET, |enc| enc.memcpy(&[0x05, 0x00]))
            .unwrap();
        assert_eq!(encoder.into_message().as_ref(), &[0x31, 0x02, 0x05, 0x00]);
    }
}
