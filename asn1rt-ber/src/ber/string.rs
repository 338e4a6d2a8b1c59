//! BIT STRING, OCTET STRING and character string codecs
//!
//! # Constructed Form
//!
//! OCTET STRING and the character string types may arrive as a constructed
//! value whose content is a series of nested OCTET STRING fragments. The
//! fragments are concatenated on decode; a definite-length constructed value
//! must be consumed exactly. Decoders returning an arena value reject the
//! indefinite length form with [`ErrorKind::NotSupported`];
//! [`BerDecoder::decode_octet_string_s`] accepts it.
//!
//! BIT STRING is decoded from the primitive form only.

use crate::ber::decoder::BerDecoder;
use crate::ber::encoder::BerEncoder;
use crate::ber::types::{BerLength, BerTag, DecodeTagging, Tagging};
use asn1rt_core::arena::ByteRef;
use asn1rt_core::datatypes::bit_string::{significant_bits, BitStringRef};
use asn1rt_core::datatypes::char_string::{BmpStringRef, UniversalStringRef};
use asn1rt_core::error::{CodecError, CodecResult, ErrorKind, Traced};

pub(crate) const ID_BIT_STRING: u8 = 0x03;
pub(crate) const ID_OCTET_STRING: u8 = 0x04;
const ID_UTF8_STRING: u8 = 0x0C;
const ID_UNIVERSAL_STRING: u8 = 0x1C;
const ID_BMP_STRING: u8 = 0x1E;

impl<'a> BerDecoder<'a> {
    /// Collect the content fragments of an OCTET STRING-like value whose
    /// tag was just consumed
    ///
    /// `depth` counts the constructed levels entered so far, this one
    /// included.
    fn octet_fragments(
        &mut self,
        length: BerLength,
        depth: usize,
        fragments: &mut Vec<&'a [u8]>,
    ) -> CodecResult<usize> {
        if !self.buffer.is_constructed() {
            return match length {
                BerLength::Definite(len) => {
                    fragments.push(self.buffer.read_n(len).traced()?);
                    Ok(len)
                }
                BerLength::Indefinite => Err(CodecError::new(ErrorKind::InvalidLength)),
            };
        }
        if depth > self.config.max_nesting_depth {
            return Err(CodecError::new(ErrorKind::TooDeep).with_param(depth));
        }

        let ctx = self.constructed_context(length);
        let mut total = 0;
        while !self.check_end(&ctx) {
            let len = self.match_tag1(ID_OCTET_STRING).traced()?;
            total += self.octet_fragments(len, depth + 1, fragments)?;
        }

        match length {
            BerLength::Definite(len) => {
                if self.buffer.cursor() - ctx.start != len {
                    return Err(CodecError::new(ErrorKind::InvalidLength));
                }
            }
            BerLength::Indefinite => self.decode_eoc().traced()?,
        }
        Ok(total)
    }

    /// Decode string content into a new arena block
    fn string_content(&mut self, id: u8, tagging: DecodeTagging) -> CodecResult<ByteRef> {
        let length = match tagging {
            DecodeTagging::Explicit => self.match_tag1(id).traced()?,
            DecodeTagging::Implicit(len) => len,
        };
        if length.is_indefinite() {
            return Err(CodecError::new(ErrorKind::NotSupported)
                .with_param("indefinite length string"));
        }

        let mut fragments = Vec::new();
        let total = self.octet_fragments(length, 1, &mut fragments)?;
        let handle = self.arena.alloc(total).traced()?;
        concat_fragments(self.arena.get_mut(handle)?, &fragments);
        Ok(handle)
    }

    /// Validate the BIT STRING content header and borrow the bit octets
    fn bit_string_content(
        &mut self,
        length: BerLength,
        capacity: Option<usize>,
    ) -> CodecResult<(&'a [u8], usize)> {
        let len = match length {
            BerLength::Definite(len) => len,
            BerLength::Indefinite => {
                return Err(CodecError::new(ErrorKind::NotSupported)
                    .with_param("indefinite length BIT STRING"));
            }
        };
        if len == 0 {
            return Ok((&[], 0));
        }

        let unused = self.buffer.fetch().traced()?;
        let octets = len - 1;
        if octets == 0 && unused != 0 {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }
        if unused > 7 {
            return Err(CodecError::new(ErrorKind::BadValue).with_param(unused));
        }
        if capacity.is_some_and(|cap| octets > cap) {
            return Err(CodecError::new(ErrorKind::StringOverflow));
        }

        let content = self.buffer.read_n(octets).traced()?;
        Ok((content, octets * 8 - unused as usize))
    }

    /// Decode a BIT STRING into the arena
    ///
    /// # Returns
    /// The packed bits and their count; the count is
    /// `(content length - 1) * 8 - unused bits`.
    ///
    /// # Errors
    /// - [`ErrorKind::BadValue`] if the unused-bit count exceeds 7
    /// - [`ErrorKind::InvalidLength`] for a nonzero unused-bit count with no
    ///   bit octets
    /// - [`ErrorKind::NotSupported`] for the constructed or indefinite form
    pub fn decode_bit_string(&mut self, tagging: DecodeTagging) -> CodecResult<BitStringRef> {
        let length = match tagging {
            DecodeTagging::Explicit => self.match_tag1(ID_BIT_STRING).traced()?,
            DecodeTagging::Implicit(len) => len,
        };
        if self.buffer.is_constructed() {
            return Err(CodecError::new(ErrorKind::NotSupported)
                .with_param("constructed BIT STRING"));
        }

        let (content, num_bits) = self.bit_string_content(length, None)?;
        let bytes = self.arena.alloc_copy(content).traced()?;
        Ok(BitStringRef { bytes, num_bits })
    }

    /// Decode a BIT STRING into a caller buffer
    ///
    /// # Returns
    /// The number of bits written to `out`.
    ///
    /// # Errors
    /// [`ErrorKind::StringOverflow`] if the bit octets do not fit in `out`.
    pub fn decode_bit_string_s(
        &mut self,
        tagging: DecodeTagging,
        out: &mut [u8],
    ) -> CodecResult<usize> {
        let length = self.primitive_len(ID_BIT_STRING, tagging)?;
        let (content, num_bits) = self.bit_string_content(length, Some(out.len()))?;
        out[..content.len()].copy_from_slice(content);
        Ok(num_bits)
    }

    /// Decode an OCTET STRING into the arena
    ///
    /// Primitive and definite-length constructed forms are accepted.
    pub fn decode_octet_string(&mut self, tagging: DecodeTagging) -> CodecResult<ByteRef> {
        self.string_content(ID_OCTET_STRING, tagging).traced()
    }

    /// Decode an OCTET STRING into a caller buffer
    ///
    /// Accepts the primitive form and the constructed form of either length
    /// type.
    ///
    /// # Returns
    /// The number of octets written to `out`.
    ///
    /// # Errors
    /// - [`ErrorKind::StringOverflow`] if the content does not fit in `out`
    /// - [`ErrorKind::InvalidLength`] if a definite-length constructed value
    ///   is not consumed exactly by its fragments
    /// - [`ErrorKind::TooDeep`] if fragments nest beyond the configured depth
    pub fn decode_octet_string_s(
        &mut self,
        tagging: DecodeTagging,
        out: &mut [u8],
    ) -> CodecResult<usize> {
        let length = match tagging {
            DecodeTagging::Explicit => self.match_tag1(ID_OCTET_STRING).traced()?,
            DecodeTagging::Implicit(len) => len,
        };
        let primitive = !self.buffer.is_constructed();
        if primitive && length.definite().is_some_and(|len| len > out.len()) {
            return Err(CodecError::new(ErrorKind::StringOverflow));
        }

        let mut fragments = Vec::new();
        let total = self.octet_fragments(length, 1, &mut fragments)?;
        if total > out.len() {
            return Err(CodecError::new(ErrorKind::StringOverflow));
        }
        concat_fragments(&mut out[..total], &fragments);
        Ok(total)
    }

    /// Decode an eight-bit character string with the given universal tag
    ///
    /// The content is copied into the arena unchanged; read it with
    /// [`asn1rt_core::Arena::get`] or [`asn1rt_core::Arena::get_str`].
    ///
    /// # Errors
    /// [`ErrorKind::BadTag`] if `tag` has no single-octet form.
    pub fn decode_char_string(
        &mut self,
        tagging: DecodeTagging,
        tag: BerTag,
    ) -> CodecResult<ByteRef> {
        let id = tag
            .to_octet()
            .ok_or_else(|| CodecError::new(ErrorKind::BadTag).with_param(tag))?;
        self.string_content(id, tagging).traced()
    }

    /// Decode a UTF8String and validate its content
    ///
    /// # Errors
    /// [`ErrorKind::InvalidUtf8`] with the index of the first bad byte; the
    /// arena block is released.
    pub fn decode_utf8_string(&mut self, tagging: DecodeTagging) -> CodecResult<ByteRef> {
        let handle = self.string_content(ID_UTF8_STRING, tagging).traced()?;
        if let Err(err) = self.arena.get_str(handle) {
            self.arena.release(handle)?;
            return Err(err);
        }
        Ok(handle)
    }

    /// Decode a BMPString; the code units stay big-endian in the arena
    pub fn decode_bmp_string(&mut self, tagging: DecodeTagging) -> CodecResult<BmpStringRef> {
        self.string_content(ID_BMP_STRING, tagging)
            .map(BmpStringRef)
            .traced()
    }

    /// Decode a UniversalString; the code units stay big-endian in the arena
    pub fn decode_universal_string(
        &mut self,
        tagging: DecodeTagging,
    ) -> CodecResult<UniversalStringRef> {
        self.string_content(ID_UNIVERSAL_STRING, tagging)
            .map(UniversalStringRef)
            .traced()
    }
}

fn concat_fragments(out: &mut [u8], fragments: &[&[u8]]) {
    let mut pos = 0;
    for fragment in fragments {
        out[pos..pos + fragment.len()].copy_from_slice(fragment);
        pos += fragment.len();
    }
}

impl BerEncoder<'_> {
    fn finish_string(&mut self, tag: BerTag, len: usize, tagging: Tagging) -> CodecResult<usize> {
        match tagging {
            Tagging::Explicit => self.encode_tag_len(tag, BerLength::Definite(len)),
            Tagging::Implicit => Ok(len),
        }
    }

    /// Encode a BIT STRING
    ///
    /// # Encoding Format
    /// One octet with the number of unused bits in the last octet, followed
    /// by the bit octets as given. An empty bit string is the single octet
    /// `0x00`.
    ///
    /// # Errors
    /// [`ErrorKind::BadValue`] if `num_bits` exceeds the bits in `bytes`.
    pub fn encode_bit_string(
        &mut self,
        bytes: &[u8],
        num_bits: usize,
        tagging: Tagging,
    ) -> CodecResult<usize> {
        let num_bytes = check_bit_count(bytes, num_bits)?;
        if num_bits == 0 {
            self.buffer.prepend_byte(0x00).traced()?;
            return self.finish_string(BerTag::BIT_STRING, 1, tagging);
        }

        let unused = (num_bytes * 8 - num_bits) as u8;
        self.buffer.prepend_bytes(&bytes[..num_bytes]).traced()?;
        self.buffer.prepend_byte(unused).traced()?;
        self.finish_string(BerTag::BIT_STRING, num_bytes + 1, tagging)
    }

    /// Encode a BIT STRING in DER form
    ///
    /// Trailing zero bits are dropped from the count and the unused bits of
    /// the last octet are cleared.
    pub fn der_encode_bit_string(
        &mut self,
        bytes: &[u8],
        num_bits: usize,
        tagging: Tagging,
    ) -> CodecResult<usize> {
        check_bit_count(bytes, num_bits)?;
        let num_bits = significant_bits(bytes, num_bits);
        if num_bits == 0 {
            return self.encode_bit_string(&[], 0, tagging);
        }

        let num_bytes = num_bits.div_ceil(8);
        let unused = (num_bytes * 8 - num_bits) as u8;
        let last = bytes[num_bytes - 1] & (0xFFu8 << unused);
        self.buffer.prepend_byte(last).traced()?;
        self.buffer.prepend_bytes(&bytes[..num_bytes - 1]).traced()?;
        self.buffer.prepend_byte(unused).traced()?;
        self.finish_string(BerTag::BIT_STRING, num_bytes + 1, tagging)
    }

    /// Encode an OCTET STRING in primitive form
    pub fn encode_octet_string(&mut self, bytes: &[u8], tagging: Tagging) -> CodecResult<usize> {
        let len = self.memcpy(bytes)?;
        self.finish_string(BerTag::OCTET_STRING, len, tagging)
    }

    /// Encode an eight-bit character string
    ///
    /// `tag` is emitted with explicit tagging, e.g.
    /// [`BerTag::IA5_STRING`] or [`BerTag::UTF8_STRING`].
    pub fn encode_char_string(
        &mut self,
        text: &str,
        tag: BerTag,
        tagging: Tagging,
    ) -> CodecResult<usize> {
        let len = self.memcpy(text.as_bytes())?;
        self.finish_string(tag, len, tagging)
    }

    /// Encode a BMPString from 16-bit code units
    pub fn encode_bmp_string(&mut self, units: &[u16], tagging: Tagging) -> CodecResult<usize> {
        for unit in units.iter().rev() {
            self.buffer.prepend_bytes(&unit.to_be_bytes()).traced()?;
        }
        self.finish_string(BerTag::BMP_STRING, units.len() * 2, tagging)
    }

    /// Encode a UniversalString from 32-bit code units
    pub fn encode_universal_string(
        &mut self,
        units: &[u32],
        tagging: Tagging,
    ) -> CodecResult<usize> {
        for unit in units.iter().rev() {
            self.buffer.prepend_bytes(&unit.to_be_bytes()).traced()?;
        }
        self.finish_string(BerTag::UNIVERSAL_STRING, units.len() * 4, tagging)
    }
}

/// Octets needed for `num_bits`, checked against the given bytes
fn check_bit_count(bytes: &[u8], num_bits: usize) -> CodecResult<usize> {
    let num_bytes = num_bits.div_ceil(8);
    if num_bytes > bytes.len() {
        return Err(CodecError::new(ErrorKind::BadValue)
            .with_param(format!("{} bits in {} bytes", num_bits, bytes.len())));
    }
    Ok(num_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::types::MatchFlags;
    use asn1rt_core::config::CodecConfig;

    fn encoded<F>(f: F) -> Vec<u8>
    where
        F: FnOnce(&mut BerEncoder<'_>) -> CodecResult<usize>,
    {
        let mut encoder = BerEncoder::new();
        let len = f(&mut encoder).unwrap();
        assert_eq!(len, encoder.message_len());
        encoder.message().to_vec()
    }

    #[test]
    fn test_bit_string_decode() {
        let data = [0x03, 0x03, 0x06, 0x6E, 0x40];
        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let bits = decoder.decode_bit_string(DecodeTagging::Explicit).unwrap();
        assert_eq!(bits.num_bits, 10);
        let owned = bits.to_bit_string(decoder.arena()).unwrap();
        assert_eq!(owned.to_string(), "0110111001");
    }

    #[test]
    fn test_bit_string_empty() {
        let data = [0x03, 0x01, 0x00];
        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let bits = decoder.decode_bit_string(DecodeTagging::Explicit).unwrap();
        assert_eq!(bits.num_bits, 0);
        assert!(decoder.buffer().is_exhausted());

        assert_eq!(
            encoded(|e| e.encode_bit_string(&[], 0, Tagging::Explicit)),
            &[0x03, 0x01, 0x00]
        );
    }

    #[test]
    fn test_bit_string_decode_errors() {
        let mut decoder = BerDecoder::new();

        let unused_without_bits = [0x03, 0x01, 0x03];
        decoder.setp(&unused_without_bits, 0).unwrap();
        let err = decoder.decode_bit_string(DecodeTagging::Explicit).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLength);

        let bad_unused = [0x03, 0x02, 0x08, 0x00];
        decoder.setp(&bad_unused, 0).unwrap();
        let err = decoder.decode_bit_string(DecodeTagging::Explicit).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadValue);

        let constructed = [0x23, 0x04, 0x03, 0x02, 0x00, 0xFF];
        decoder.setp(&constructed, 0).unwrap();
        let err = decoder.decode_bit_string(DecodeTagging::Explicit).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);

        let err = decoder
            .decode_bit_string(DecodeTagging::Implicit(BerLength::Indefinite))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn test_bit_string_s_overflow() {
        let data = [0x03, 0x04, 0x00, 0x01, 0x02, 0x03];
        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let mut small = [0u8; 2];
        let err = decoder
            .decode_bit_string_s(DecodeTagging::Explicit, &mut small)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StringOverflow);

        decoder.setp(&data, 0).unwrap();
        let mut out = [0u8; 3];
        let num_bits = decoder
            .decode_bit_string_s(DecodeTagging::Explicit, &mut out)
            .unwrap();
        assert_eq!(num_bits, 24);
        assert_eq!(out, [0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_bit_string_encode() {
        assert_eq!(
            encoded(|e| e.encode_bit_string(&[0x6E, 0x5D, 0xC0], 18, Tagging::Explicit)),
            &[0x03, 0x04, 0x06, 0x6E, 0x5D, 0xC0]
        );
        let mut encoder = BerEncoder::new();
        let err = encoder
            .encode_bit_string(&[0xFF], 9, Tagging::Explicit)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadValue);
    }

    #[test]
    fn test_der_bit_string_trims_trailing_zeros() {
        let bytes = encoded(|e| e.der_encode_bit_string(&[0xA0, 0x00], 16, Tagging::Explicit));
        assert_eq!(bytes, &[0x03, 0x02, 0x05, 0xA0]);

        let mut decoder = BerDecoder::new();
        decoder.setp(&bytes, 0).unwrap();
        let bits = decoder.decode_bit_string(DecodeTagging::Explicit).unwrap();
        assert_eq!(bits.num_bits, 3);

        assert_eq!(
            encoded(|e| e.der_encode_bit_string(&[0x00, 0x00], 16, Tagging::Explicit)),
            &[0x03, 0x01, 0x00]
        );
    }

    #[test]
    fn test_der_bit_string_clears_padding() {
        assert_eq!(
            encoded(|e| e.der_encode_bit_string(&[0xFF], 3, Tagging::Implicit)),
            &[0x05, 0xE0]
        );
        assert_eq!(
            encoded(|e| e.der_encode_bit_string(&[0x80, 0x01], 16, Tagging::Implicit)),
            &[0x00, 0x80, 0x01]
        );
    }

    #[test]
    fn test_octet_string_matches_reference_der() {
        let value = b"\x01\x02\x03 octets".to_vec();
        let ours = encoded(|e| e.encode_octet_string(&value, Tagging::Explicit));
        let reference =
            rasn::der::encode(&rasn::types::OctetString::from(value.clone())).unwrap();
        assert_eq!(ours, reference);
        let back: rasn::types::OctetString = rasn::ber::decode(&ours).unwrap();
        assert_eq!(back.as_ref(), value.as_slice());

        let mut decoder = BerDecoder::new();
        decoder.setp(&ours, 0).unwrap();
        let handle = decoder.decode_octet_string(DecodeTagging::Explicit).unwrap();
        assert_eq!(decoder.arena().get(handle).unwrap(), value.as_slice());
    }

    #[test]
    fn test_octet_string_constructed_definite() {
        let data = [
            0x24, 0x09, 0x04, 0x03, b'a', b'b', b'c', 0x04, 0x02, b'd', b'e',
        ];
        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let handle = decoder.decode_octet_string(DecodeTagging::Explicit).unwrap();
        assert_eq!(decoder.arena().get(handle).unwrap(), b"abcde");
        assert!(decoder.buffer().is_exhausted());
    }

    #[test]
    fn test_octet_string_constructed_indefinite() {
        let data = [
            0x24, 0x80, 0x04, 0x03, b'a', b'b', b'c', 0x04, 0x02, b'd', b'e', 0x00, 0x00,
        ];
        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let mut out = [0u8; 16];
        let len = decoder
            .decode_octet_string_s(DecodeTagging::Explicit, &mut out)
            .unwrap();
        assert_eq!(&out[..len], b"abcde");
        assert!(decoder.buffer().is_exhausted());

        decoder.setp(&data, 0).unwrap();
        let err = decoder.decode_octet_string(DecodeTagging::Explicit).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn test_octet_string_implicit_constructed() {
        let data = [0xA1, 0x80, 0x04, 0x01, 0x11, 0x04, 0x01, 0x22, 0x00, 0x00];
        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let len = decoder
            .match_tag(BerTag::context_specific(false, 1), MatchFlags::ADVANCE)
            .unwrap();
        let mut out = [0u8; 2];
        let n = decoder
            .decode_octet_string_s(DecodeTagging::Implicit(len), &mut out)
            .unwrap();
        assert_eq!((n, out), (2, [0x11, 0x22]));
    }

    #[test]
    fn test_octet_string_constructed_length_mismatch() {
        let data = [
            0x24, 0x08, 0x04, 0x03, b'a', b'b', b'c', 0x04, 0x02, b'd', b'e',
        ];
        let mut decoder = BerDecoder::new();
        decoder.set_buffer(&data);
        let err = decoder.decode_octet_string(DecodeTagging::Explicit).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLength);
    }

    #[test]
    fn test_octet_string_nesting_limit() {
        let data = [0x24, 0x07, 0x24, 0x05, 0x04, 0x03, 0x01, 0x02, 0x03];
        let mut decoder = BerDecoder::with_config(CodecConfig::new().max_nesting_depth(1));
        decoder.setp(&data, 0).unwrap();
        let err = decoder.decode_octet_string(DecodeTagging::Explicit).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooDeep);

        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let handle = decoder.decode_octet_string(DecodeTagging::Explicit).unwrap();
        assert_eq!(decoder.arena().get(handle).unwrap(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_octet_string_s_overflow() {
        let data = [0x04, 0x03, 0x01, 0x02, 0x03];
        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let mut out = [0u8; 2];
        let err = decoder
            .decode_octet_string_s(DecodeTagging::Explicit, &mut out)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StringOverflow);
    }

    #[test]
    fn test_char_string_round_trip() {
        let bytes = encoded(|e| {
            e.encode_char_string("Smith", BerTag::VISIBLE_STRING, Tagging::Explicit)
        });
        assert_eq!(bytes, b"\x1A\x05Smith");

        let mut decoder = BerDecoder::new();
        decoder.setp(&bytes, 0).unwrap();
        let handle = decoder
            .decode_char_string(DecodeTagging::Explicit, BerTag::VISIBLE_STRING)
            .unwrap();
        assert_eq!(decoder.arena().get_str(handle).unwrap(), "Smith");

        decoder.setp(&bytes, 0).unwrap();
        let err = decoder
            .decode_char_string(DecodeTagging::Explicit, BerTag::IA5_STRING)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdNotFound);
    }

    #[test]
    fn test_char_string_indefinite_not_supported() {
        let data = [0x36, 0x80, 0x04, 0x01, b'x', 0x00, 0x00];
        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let err = decoder
            .decode_char_string(DecodeTagging::Explicit, BerTag::IA5_STRING)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn test_utf8_string() {
        let bytes = encoded(|e| {
            e.encode_char_string("héllo", BerTag::UTF8_STRING, Tagging::Explicit)
        });
        let mut decoder = BerDecoder::new();
        decoder.setp(&bytes, 0).unwrap();
        let handle = decoder.decode_utf8_string(DecodeTagging::Explicit).unwrap();
        assert_eq!(decoder.arena().get_str(handle).unwrap(), "héllo");
    }

    #[test]
    fn test_utf8_string_invalid_releases_block() {
        let data = [0x0C, 0x03, b'a', 0xC3, 0x28];
        let mut decoder = BerDecoder::new();
        decoder.setp(&data, 0).unwrap();
        let err = decoder.decode_utf8_string(DecodeTagging::Explicit).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUtf8);
        assert_eq!(err.params(), &["1".to_string()]);
        assert_eq!(decoder.arena().live_bytes(), 0);
    }

    #[test]
    fn test_bmp_string() {
        let units: Vec<u16> = "Añ€".encode_utf16().collect();
        let bytes = encoded(|e| e.encode_bmp_string(&units, Tagging::Explicit));
        assert_eq!(bytes, &[0x1E, 0x06, 0x00, 0x41, 0x00, 0xF1, 0x20, 0xAC]);

        let mut decoder = BerDecoder::new();
        decoder.setp(&bytes, 0).unwrap();
        let value = decoder.decode_bmp_string(DecodeTagging::Explicit).unwrap();
        assert_eq!(value.to_vec(decoder.arena()).unwrap(), units);
        assert_eq!(value.to_string_lossy(decoder.arena()).unwrap(), "Añ€");
    }

    #[test]
    fn test_universal_string() {
        let units = ['Z' as u32, 0x1F600];
        let bytes = encoded(|e| e.encode_universal_string(&units, Tagging::Explicit));
        assert_eq!(
            bytes,
            &[0x1C, 0x08, 0x00, 0x00, 0x00, 0x5A, 0x00, 0x01, 0xF6, 0x00]
        );

        let mut decoder = BerDecoder::new();
        decoder.setp(&bytes, 0).unwrap();
        let value = decoder.decode_universal_string(DecodeTagging::Explicit).unwrap();
        assert_eq!(value.len(decoder.arena()).unwrap(), 2);
        assert_eq!(value.to_string_lossy(decoder.arena()).unwrap(), "Z\u{1F600}");
    }
}
