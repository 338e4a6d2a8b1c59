//! BER decoder for ASN.1 structures
//!
//! This module holds the tag/length engine of the decoder: message setup,
//! tag and length parsing, tag matching with seek and skip, and the helpers
//! generated code uses to walk constructed values. The primitive decode
//! functions are implemented on the same [`BerDecoder`] in the sibling
//! modules.
//!
//! # Usage Example
//!
//! ```rust
//! use asn1rt_ber::ber::{BerDecoder, BerLength, BerTag, DecodeTagging, MatchFlags};
//!
//! let data = [0x30, 0x06, 0x02, 0x01, 0x05, 0x01, 0x01, 0xFF];
//! let mut decoder = BerDecoder::new();
//! let (tag, total) = decoder.setp(&data, 0)?;
//! assert_eq!(tag, BerTag::SEQUENCE);
//! assert_eq!(total, BerLength::Definite(8));
//!
//! let len = decoder.match_tag(BerTag::SEQUENCE, MatchFlags::ADVANCE)?;
//! let ctx = decoder.constructed_context(len);
//! let value = decoder.decode_i32(DecodeTagging::Explicit)?;
//! let flag = decoder.decode_bool(DecodeTagging::Explicit)?;
//! assert!(decoder.check_end(&ctx));
//! assert_eq!((value, flag), (5, true));
//! # Ok::<(), asn1rt_core::CodecError>(())
//! ```

use crate::ber::types::{
    BerLength, BerTag, ConstructedContext, MatchFlags, TAG_LSHIFT, TM_B_IDCODE, TM_CLASS_FORM,
    TM_FORM, TM_IDCODE,
};
use crate::buffer::DecodeBuffer;
use asn1rt_core::arena::Arena;
use asn1rt_core::config::CodecConfig;
use asn1rt_core::error::{CodecError, CodecResult, ErrorKind, Traced};

/// Continuation octets accepted in a multi-byte tag
const MAX_TAG_OCTETS: usize = 9;

/// Magnitude octets accepted in a long-form length
const MAX_LENGTH_OCTETS: usize = 4;

/// BER decoder for ASN.1 structures
///
/// A decoder is one decoding session: the borrowed message, the read cursor
/// and the [`Arena`] that owns every variable-size value decoded from the
/// message. Values stay valid until [`BerDecoder::reset`] or until the
/// decoder is dropped.
///
/// # Error Handling
///
/// All decoding operations return [`CodecResult`]. A tag mismatch is
/// reported as [`ErrorKind::IdNotFound`] with the buffer restored, so a
/// caller probing OPTIONAL fields or CHOICE arms can try the next candidate.
/// Every other error is fatal to the decode.
#[derive(Debug)]
pub struct BerDecoder<'a> {
    pub(crate) buffer: DecodeBuffer<'a>,
    pub(crate) arena: Arena,
    pub(crate) config: CodecConfig,
}

impl Default for BerDecoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> BerDecoder<'a> {
    /// Create a decoder with the default configuration
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Create a decoder with the given configuration
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            buffer: DecodeBuffer::default(),
            arena: Arena::with_limit(config.arena_limit),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Arena holding the decoded values
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable access to the arena, e.g. to release a value on rollback
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The decode buffer
    pub fn buffer(&self) -> &DecodeBuffer<'a> {
        &self.buffer
    }

    /// Mutable access to the decode buffer
    pub fn buffer_mut(&mut self) -> &mut DecodeBuffer<'a> {
        &mut self.buffer
    }

    /// Whether the last parsed tag had the constructed form
    pub fn is_constructed(&self) -> bool {
        self.buffer.is_constructed()
    }

    /// Free every decoded value and detach the message
    pub fn reset(&mut self) {
        self.arena.reset();
        self.buffer = DecodeBuffer::default();
    }

    /// Attach a buffer without parsing anything, e.g. to decode a bare
    /// IMPLICIT content field
    pub fn set_buffer(&mut self, data: &'a [u8]) {
        self.buffer = DecodeBuffer::new(data);
    }

    /// Start decoding a message
    ///
    /// # Arguments
    /// * `data` - Message bytes
    /// * `msglen` - Declared message length; 0 when unknown
    ///
    /// # Returns
    /// The outermost tag and the total message length (tag, length and
    /// content) for a definite-length message, or [`BerLength::Indefinite`].
    /// The cursor is left at the start of the message so the caller can
    /// match the outermost tag itself.
    ///
    /// # Errors
    /// [`ErrorKind::InvalidLength`] if the encoded message is longer than a
    /// nonzero `msglen`.
    pub fn setp(&mut self, data: &'a [u8], msglen: usize) -> CodecResult<(BerTag, BerLength)> {
        self.buffer = DecodeBuffer::with_size(data, msglen);
        self.buffer.set_indefinite(false);

        let (tag, len) = self.decode_tag_len(MatchFlags::ADVANCE).traced()?;
        let total = match len {
            BerLength::Indefinite => {
                self.buffer.set_indefinite(true);
                BerLength::Indefinite
            }
            BerLength::Definite(content) => {
                let size = content + self.buffer.cursor();
                if msglen > 0 && size > msglen {
                    return Err(CodecError::new(ErrorKind::InvalidLength));
                }
                self.buffer.set_size(size);
                BerLength::Definite(size)
            }
        };
        self.buffer.seek(0)?;

        log::trace!("decode message {} length {}", tag, total);
        Ok((tag, total))
    }

    /// Decode a tag at the cursor
    ///
    /// Records the form of the tag in the constructed flag.
    ///
    /// # Errors
    /// [`ErrorKind::BadTag`] if a multi-byte ID code exceeds 29 bits or runs
    /// past nine continuation octets.
    pub fn decode_tag(&mut self) -> CodecResult<BerTag> {
        let first = self.buffer.fetch().traced()?;
        self.buffer.set_constructed(first & TM_FORM != 0);
        let class_form = ((first & TM_CLASS_FORM) as u32) << TAG_LSHIFT;

        let mut id = (first & TM_B_IDCODE) as u64;
        if id == TM_B_IDCODE as u64 {
            id = 0;
            let mut count = 0;
            loop {
                let byte = self.buffer.fetch().traced()?;
                id = id * 128 + (byte & 0x7F) as u64;
                count += 1;
                if id > TM_IDCODE as u64 || count > MAX_TAG_OCTETS {
                    return Err(CodecError::new(ErrorKind::BadTag));
                }
                if byte & 0x80 == 0 {
                    break;
                }
            }
        }

        Ok(BerTag::from_raw(class_form | id as u32))
    }

    /// Decode a length at the cursor
    ///
    /// # Errors
    /// [`ErrorKind::InvalidLength`] for more than four magnitude octets, or
    /// a definite length larger than the rest of the message.
    pub fn decode_len(&mut self) -> CodecResult<BerLength> {
        let first = self.buffer.fetch().traced()?;
        let len = match first {
            0x80 => return Ok(BerLength::Indefinite),
            b if b < 0x80 => b as usize,
            b => {
                let count = (b & 0x7F) as usize;
                if count > MAX_LENGTH_OCTETS {
                    return Err(CodecError::new(ErrorKind::InvalidLength));
                }
                self.buffer
                    .read_n(count)
                    .traced()?
                    .iter()
                    .fold(0usize, |acc, &b| (acc << 8) | b as usize)
            }
        };

        if len > self.buffer.remaining() {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }
        Ok(BerLength::Definite(len))
    }

    /// Decode the tag and length at the cursor
    ///
    /// Without [`MatchFlags::ADVANCE`] the cursor is restored afterwards, so
    /// this is a peek.
    ///
    /// # Errors
    /// - [`ErrorKind::EndOfBuffer`] if the cursor is at the end of the message
    /// - [`ErrorKind::InvalidLength`] for an indefinite length on a primitive tag
    pub fn decode_tag_len(&mut self, flags: MatchFlags) -> CodecResult<(BerTag, BerLength)> {
        if self.buffer.is_exhausted() {
            return Err(CodecError::new(ErrorKind::EndOfBuffer));
        }

        let saved = self.buffer.checkpoint();
        let result = self.read_tag_len();
        if !flags.contains(MatchFlags::ADVANCE) {
            self.buffer.restore(saved);
        }
        result.traced()
    }

    fn read_tag_len(&mut self) -> CodecResult<(BerTag, BerLength)> {
        let tag = self.decode_tag()?;
        let len = self.decode_len()?;
        if len.is_indefinite() && !self.buffer.is_constructed() {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }
        Ok((tag, len))
    }

    /// Match an expected tag at the cursor
    ///
    /// The form bit is ignored on both sides.
    ///
    /// # Arguments
    /// * `tag` - Expected tag
    /// * `flags` - [`MatchFlags::SEEK`] scans forward past non-matching
    ///   elements; [`MatchFlags::SKIP`] steps over the element under the
    ///   cursor first; [`MatchFlags::ADVANCE`] leaves the cursor on the
    ///   content of the match
    ///
    /// # Returns
    /// The content length of the matched element. Without `ADVANCE`, the
    /// cursor is left at the start of the matched element, not where the
    /// scan began, and the result is that element's full encoded size (its
    /// tag and length octets plus content). Bytes skipped by a seek are
    /// never counted.
    ///
    /// # Errors
    /// [`ErrorKind::IdNotFound`] with the expected and parsed tags as
    /// parameters; the buffer is restored to where the scan started.
    pub fn match_tag(&mut self, tag: BerTag, flags: MatchFlags) -> CodecResult<BerLength> {
        let expected = tag.primitive();

        if flags.contains(MatchFlags::SKIP) {
            let saved = self.buffer.checkpoint();
            match self.decode_tag_len(MatchFlags::ADVANCE) {
                Ok((_, BerLength::Definite(len))) if !self.buffer.is_constructed() => {
                    self.buffer.advance(len).traced()?;
                }
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::EndOfBuffer => {
                    self.buffer.restore(saved);
                    let mut err = CodecError::new(ErrorKind::IdNotFound);
                    if !flags.contains(MatchFlags::OPTIONAL) {
                        err.add_param(tag);
                        err.add_param("end of buffer");
                    }
                    return Err(err);
                }
                Err(err) => return Err(err.trace()),
            }
        }

        let start = self.buffer.checkpoint();
        let mut parsed = BerTag::EOC;
        loop {
            let element = self.buffer.checkpoint();
            let element_start = self.buffer.cursor();
            let (found, len) = match self.decode_tag_len(MatchFlags::ADVANCE) {
                Ok(tag_len) => tag_len,
                Err(err) if err.kind() == ErrorKind::EndOfBuffer => break,
                Err(err) => {
                    self.buffer.restore(start);
                    return Err(err.trace());
                }
            };
            parsed = found;

            if found.primitive() == expected {
                if flags.contains(MatchFlags::ADVANCE) {
                    return Ok(len);
                }
                let header = self.buffer.cursor() - element_start;
                self.buffer.restore(element);
                return Ok(match len {
                    BerLength::Definite(n) => BerLength::Definite(n + header),
                    BerLength::Indefinite => BerLength::Indefinite,
                });
            }

            if !flags.contains(MatchFlags::SEEK) {
                break;
            }
            if !found.is_constructed() {
                if let BerLength::Definite(n) = len {
                    self.buffer.advance(n).traced()?;
                }
            }
        }

        self.buffer.restore(start);
        log::trace!("tag {} not matched, parsed {}", tag, parsed);
        Err(CodecError::new(ErrorKind::IdNotFound)
            .with_param(tag)
            .with_param(parsed))
    }

    /// Match a single-octet tag at the cursor, ignoring the form bit
    ///
    /// Always advances past the tag and length on success and records the
    /// form of the octet under the cursor.
    pub fn match_tag1(&mut self, octet: u8) -> CodecResult<BerLength> {
        let current = self.buffer.peek().traced()?;
        if current & !TM_FORM != octet & !TM_FORM {
            return Err(tag1_not_matched(octet, current));
        }
        self.buffer.advance(1)?;
        self.buffer.set_constructed(current & TM_FORM != 0);

        let len = self.decode_len().traced()?;
        if len.is_indefinite() && !self.buffer.is_constructed() {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }
        Ok(len)
    }

    /// Consume one identifier octet that must equal `octet` exactly
    ///
    /// Clears the constructed flag. Used by the explicit path of primitive
    /// decoders, which accept only the primitive form of their tag.
    pub(crate) fn expect_octet(&mut self, octet: u8) -> CodecResult<()> {
        let current = self.buffer.peek().traced()?;
        if current != octet {
            return Err(tag1_not_matched(octet, current));
        }
        self.buffer.set_constructed(false);
        self.buffer.advance(1)
    }

    /// Read any single-octet tag and its length
    ///
    /// # Returns
    /// The identifier octet and the length; the form of the octet is
    /// recorded in the constructed flag.
    pub fn decode_tag1_len(&mut self) -> CodecResult<(u8, BerLength)> {
        let octet = self.buffer.fetch().traced()?;
        self.buffer.set_constructed(octet & TM_FORM != 0);
        let len = self.decode_len().traced()?;
        Ok((octet, len))
    }

    /// Context for iterating the content of a constructed value whose tag
    /// and length were just consumed
    pub fn constructed_context(&self, length: BerLength) -> ConstructedContext {
        ConstructedContext {
            start: self.buffer.cursor(),
            length,
        }
    }

    /// Whether the content of a constructed value has been consumed
    ///
    /// For indefinite length, the end is an EOC under the cursor or any
    /// failure to parse a further tag. For definite length, it is the
    /// declared byte count or the end of the message.
    pub fn check_end(&mut self, ctx: &ConstructedContext) -> bool {
        match ctx.length {
            BerLength::Indefinite => match self.decode_tag_len(MatchFlags::NONE) {
                Ok((tag, len)) => tag == BerTag::EOC && len == BerLength::Definite(0),
                Err(_) => true,
            },
            BerLength::Definite(len) => {
                self.buffer.cursor().saturating_sub(ctx.start) >= len
                    || self.buffer.is_exhausted()
            }
        }
    }

    /// Count the top-level elements of a constructed value without
    /// consuming them
    pub fn count_elements(&mut self, length: BerLength) -> CodecResult<usize> {
        let saved = self.buffer.checkpoint();
        let ctx = self.constructed_context(length);
        let mut count = 0;
        while !self.check_end(&ctx) {
            if let Err(err) = self.next_element() {
                self.buffer.restore(saved);
                return Err(err.trace());
            }
            count += 1;
        }
        self.buffer.restore(saved);
        Ok(count)
    }

    /// Skip the complete element under the cursor
    pub fn next_element(&mut self) -> CodecResult<()> {
        match self.decode_tag_len(MatchFlags::ADVANCE).traced()? {
            (_, BerLength::Indefinite) => self.move_past_eoc().traced(),
            (_, BerLength::Definite(len)) => self.buffer.advance(len).traced(),
        }
    }

    /// Skip to just past the EOC closing the current indefinite-length value
    ///
    /// Nested indefinite-length values are skipped with their own EOC.
    ///
    /// # Errors
    /// [`ErrorKind::TooDeep`] if nesting exceeds the configured depth.
    pub fn move_past_eoc(&mut self) -> CodecResult<()> {
        let mut depth = 1usize;
        while depth > 0 {
            let (tag, len) = self.decode_tag_len(MatchFlags::ADVANCE).traced()?;
            match len {
                BerLength::Indefinite => {
                    depth += 1;
                    if depth > self.config.max_nesting_depth {
                        return Err(CodecError::new(ErrorKind::TooDeep).with_param(depth));
                    }
                }
                BerLength::Definite(0) if tag == BerTag::EOC => depth -= 1,
                BerLength::Definite(n) => self.buffer.advance(n).traced()?,
            }
        }
        Ok(())
    }

    /// Consume an end-of-contents marker
    ///
    /// # Errors
    /// [`ErrorKind::InvalidLength`] if the next two octets are not `00 00`.
    pub fn decode_eoc(&mut self) -> CodecResult<()> {
        if !self.buffer.at_eoc() {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }
        self.buffer.advance(2)
    }

    /// Consume `len` content octets and borrow them from the message
    pub fn memcpy(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        self.buffer.read_n(len).traced()
    }
}

fn tag1_not_matched(expected: u8, parsed: u8) -> CodecError {
    CodecError::new(ErrorKind::IdNotFound)
        .with_param(BerTag::from_octet(expected))
        .with_param(BerTag::from_octet(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::types::{BerTagClass, TM_APPL, TM_CONS, TM_CTXT};

    fn decoder_on(data: &[u8]) -> BerDecoder<'_> {
        let mut decoder = BerDecoder::new();
        decoder.set_buffer(data);
        decoder
    }

    #[test]
    fn test_setp_definite() {
        let data = [0x30, 0x03, 0x02, 0x01, 0x07, 0xEE, 0xEE];
        let mut decoder = BerDecoder::new();
        let (tag, total) = decoder.setp(&data, 0).unwrap();
        assert_eq!(tag, BerTag::SEQUENCE);
        assert_eq!(total, BerLength::Definite(5));
        assert_eq!(decoder.buffer().cursor(), 0);
        assert_eq!(decoder.buffer().size(), 5);
        assert!(!decoder.buffer().is_indefinite());
    }

    #[test]
    fn test_setp_indefinite() {
        let data = [0x30, 0x80, 0x05, 0x00, 0x00, 0x00];
        let mut decoder = BerDecoder::new();
        let (_, total) = decoder.setp(&data, 0).unwrap();
        assert_eq!(total, BerLength::Indefinite);
        assert!(decoder.buffer().is_indefinite());
    }

    #[test]
    fn test_setp_message_longer_than_declared() {
        let data = [0x04, 0x03, 0x01, 0x02, 0x03];
        let mut decoder = BerDecoder::new();
        let err = decoder.setp(&data, 4).unwrap_err();
        // the declared 4 bytes cannot hold the 3-byte content either
        assert_eq!(err.kind(), ErrorKind::InvalidLength);
    }

    #[test]
    fn test_setp_truncated_message() {
        let data = [0x30, 0x05, 0x02, 0x01];
        let err = BerDecoder::new().setp(&data, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLength);
    }

    #[test]
    fn test_decode_tag_short_form() {
        let data = [0xA3];
        let mut decoder = decoder_on(&data);
        let tag = decoder.decode_tag().unwrap();
        assert_eq!(tag.raw(), TM_CTXT | TM_CONS | 3);
        assert_eq!(tag.class(), BerTagClass::ContextSpecific);
        assert!(decoder.is_constructed());
    }

    #[test]
    fn test_decode_tag_multi_byte() {
        let data = [0x5F, 0x81, 0x00];
        let mut decoder = decoder_on(&data);
        let tag = decoder.decode_tag().unwrap();
        assert_eq!(tag.raw(), TM_APPL | 128);
        assert!(!decoder.is_constructed());
    }

    #[test]
    fn test_decode_tag_too_many_octets() {
        let mut data = vec![0x1F];
        data.extend_from_slice(&[0x80; 9]);
        data.push(0x01);
        let err = decoder_on(&data).decode_tag().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadTag);
    }

    #[test]
    fn test_decode_tag_id_overflow() {
        let data = [0x1F, 0x82, 0x80, 0x80, 0x80, 0x00];
        let err = decoder_on(&data).decode_tag().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadTag);

        let max = [0x1F, 0x81, 0xFF, 0xFF, 0xFF, 0x7F];
        let tag = decoder_on(&max).decode_tag().unwrap();
        assert_eq!(tag.number(), TM_IDCODE);
    }

    #[test]
    fn test_decode_len_forms() {
        let data = [0x82, 0x01, 0x00];
        let mut padded = data.to_vec();
        padded.resize(3 + 256, 0);
        assert_eq!(decoder_on(&padded).decode_len().unwrap(), BerLength::Definite(256));

        let indef = [0x80];
        assert_eq!(decoder_on(&indef).decode_len().unwrap(), BerLength::Indefinite);

        let five = [0x85, 0, 0, 0, 0, 1];
        assert_eq!(decoder_on(&five).decode_len().unwrap_err().kind(), ErrorKind::InvalidLength);
    }

    #[test]
    fn test_decode_len_exceeds_remaining() {
        let data = [0x05, 0x01, 0x02];
        let err = decoder_on(&data).decode_len().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLength);

        let long = [0x84, 0xFF, 0xFF, 0xFF, 0xFF];
        let err = decoder_on(&long).decode_len().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLength);
    }

    #[test]
    fn test_decode_tag_len_peek_and_advance() {
        let data = [0x02, 0x01, 0x05];
        let mut decoder = decoder_on(&data);
        let peeked = decoder.decode_tag_len(MatchFlags::NONE).unwrap();
        assert_eq!(peeked, (BerTag::INTEGER, BerLength::Definite(1)));
        assert_eq!(decoder.buffer().cursor(), 0);
        decoder.decode_tag_len(MatchFlags::ADVANCE).unwrap();
        assert_eq!(decoder.buffer().cursor(), 2);
    }

    #[test]
    fn test_indefinite_primitive_rejected() {
        let data = [0x04, 0x80, 0x00, 0x00];
        let err = decoder_on(&data).decode_tag_len(MatchFlags::ADVANCE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLength);
    }

    #[test]
    fn test_decode_tag_len_end_of_buffer() {
        let data = [0x05, 0x00];
        let mut decoder = decoder_on(&data);
        decoder.buffer_mut().advance(2).unwrap();
        let err = decoder.decode_tag_len(MatchFlags::NONE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfBuffer);
    }

    #[test]
    fn test_match_tag_direct() {
        let data = [0x02, 0x01, 0x05];
        let mut decoder = decoder_on(&data);
        let len = decoder.match_tag(BerTag::INTEGER, MatchFlags::ADVANCE).unwrap();
        assert_eq!(len, BerLength::Definite(1));
        assert_eq!(decoder.buffer().cursor(), 2);
    }

    #[test]
    fn test_match_tag_mismatch_restores() {
        let data = [0x01, 0x01, 0xFF];
        let mut decoder = decoder_on(&data);
        let err = decoder.match_tag(BerTag::INTEGER, MatchFlags::ADVANCE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdNotFound);
        assert!(err.is_recoverable());
        assert_eq!(
            err.message(),
            "Unexpected tag encountered: expected = [UNIVERSAL 2], parsed = [UNIVERSAL 1]"
        );
        assert_eq!(decoder.buffer().cursor(), 0);
    }

    #[test]
    fn test_match_tag_ignores_form() {
        let data = [0x24, 0x03, 0x04, 0x01, 0xAA];
        let mut decoder = decoder_on(&data);
        let len = decoder.match_tag(BerTag::OCTET_STRING, MatchFlags::ADVANCE).unwrap();
        assert_eq!(len, BerLength::Definite(3));
        assert!(decoder.is_constructed());
    }

    #[test]
    fn test_match_tag_seek_skips_primitives() {
        let data = [0x01, 0x01, 0xFF, 0x05, 0x00, 0x81, 0x02, 0x12, 0x34];
        let mut decoder = decoder_on(&data);
        let target = BerTag::context_specific(false, 1);

        let len = decoder.match_tag(target, MatchFlags::SEEK).unwrap();
        assert_eq!(len, BerLength::Definite(4));
        assert_eq!(decoder.buffer().cursor(), 5);

        let len = decoder
            .match_tag(target, MatchFlags::SEEK | MatchFlags::ADVANCE)
            .unwrap();
        assert_eq!(len, BerLength::Definite(2));
        assert_eq!(decoder.buffer().cursor(), 7);
    }

    #[test]
    fn test_match_tag_seek_length_excludes_skipped() {
        let data = [
            0x30, 0x06, 0x02, 0x01, 0x07, 0x04, 0x01, 0xAA, 0x01, 0x01, 0x00, 0x9F, 0x21, 0x03,
            0x01, 0x02, 0x03,
        ];
        let mut decoder = decoder_on(&data);
        let target = BerTag::context_specific(false, 33);

        let len = decoder.match_tag(target, MatchFlags::SEEK).unwrap();
        assert_eq!(len, BerLength::Definite(6));
        assert_eq!(decoder.buffer().cursor(), 11);

        let len = decoder.match_tag(target, MatchFlags::ADVANCE).unwrap();
        assert_eq!(len, BerLength::Definite(3));
        assert_eq!(decoder.memcpy(3).unwrap(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_match_tag_seek_not_found() {
        let data = [0x01, 0x01, 0xFF, 0x05, 0x00];
        let mut decoder = decoder_on(&data);
        let err = decoder
            .match_tag(BerTag::INTEGER, MatchFlags::SEEK | MatchFlags::ADVANCE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdNotFound);
        assert_eq!(err.params()[1], "[UNIVERSAL 5]");
        assert_eq!(decoder.buffer().cursor(), 0);
    }

    #[test]
    fn test_match_tag_skip() {
        let data = [0x02, 0x01, 0x05, 0x01, 0x01, 0x00];
        let mut decoder = decoder_on(&data);
        let len = decoder
            .match_tag(BerTag::BOOLEAN, MatchFlags::SKIP | MatchFlags::ADVANCE)
            .unwrap();
        assert_eq!(len, BerLength::Definite(1));
        assert_eq!(decoder.buffer().cursor(), 5);
    }

    #[test]
    fn test_match_tag_skip_at_end() {
        let data = [0x05, 0x00];
        let mut decoder = decoder_on(&data);
        decoder.buffer_mut().advance(2).unwrap();
        let err = decoder
            .match_tag(BerTag::NULL, MatchFlags::SKIP | MatchFlags::OPTIONAL)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdNotFound);
        assert!(err.params().is_empty());

        let err = decoder.match_tag(BerTag::NULL, MatchFlags::SKIP).unwrap_err();
        assert_eq!(err.params().len(), 2);
    }

    #[test]
    fn test_match_tag1() {
        let data = [0x24, 0x80, 0x00, 0x00];
        let mut decoder = decoder_on(&data);
        let len = decoder.match_tag1(0x04).unwrap();
        assert_eq!(len, BerLength::Indefinite);
        assert!(decoder.is_constructed());

        let other = [0x02, 0x01, 0x00];
        let err = decoder_on(&other).match_tag1(0x04).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdNotFound);
        assert_eq!(err.params(), &["[UNIVERSAL 4]".to_string(), "[UNIVERSAL 2]".to_string()]);
    }

    #[test]
    fn test_decode_tag1_len() {
        let data = [0x61, 0x02, 0x05, 0x00];
        let mut decoder = decoder_on(&data);
        assert_eq!(decoder.decode_tag1_len().unwrap(), (0x61, BerLength::Definite(2)));
        assert!(decoder.is_constructed());
    }

    #[test]
    fn test_check_end_definite() {
        let data = [0x05, 0x00, 0x05, 0x00];
        let mut decoder = decoder_on(&data);
        let ctx = decoder.constructed_context(BerLength::Definite(2));
        assert!(!decoder.check_end(&ctx));
        decoder.next_element().unwrap();
        assert!(decoder.check_end(&ctx));
    }

    #[test]
    fn test_check_end_indefinite() {
        let data = [0x05, 0x00, 0x00, 0x00];
        let mut decoder = decoder_on(&data);
        let ctx = decoder.constructed_context(BerLength::Indefinite);
        assert!(!decoder.check_end(&ctx));
        decoder.next_element().unwrap();
        assert!(decoder.check_end(&ctx));
        assert_eq!(decoder.buffer().cursor(), 2);
        decoder.decode_eoc().unwrap();
        assert!(decoder.check_end(&ctx));
    }

    #[test]
    fn test_count_elements() {
        let data = [
            0x02, 0x01, 0x01, 0x30, 0x80, 0x05, 0x00, 0x00, 0x00, 0x04, 0x01, 0xAA, 0x00, 0x00,
        ];
        let mut decoder = decoder_on(&data);
        assert_eq!(decoder.count_elements(BerLength::Indefinite).unwrap(), 3);
        assert_eq!(decoder.buffer().cursor(), 0);
        assert_eq!(decoder.count_elements(BerLength::Definite(3)).unwrap(), 1);
    }

    #[test]
    fn test_move_past_eoc_nested() {
        let data = [
            0x30, 0x80, 0x04, 0x01, 0xAA, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x01, 0x01, 0xFF,
        ];
        let mut decoder = decoder_on(&data);
        decoder.move_past_eoc().unwrap();
        assert_eq!(decoder.buffer().cursor(), 11);
    }

    #[test]
    fn test_move_past_eoc_too_deep() {
        let config = CodecConfig::new().max_nesting_depth(3);
        let data = [0x30, 0x80, 0x30, 0x80, 0x30, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut decoder = BerDecoder::with_config(config);
        decoder.set_buffer(&data);
        let err = decoder.move_past_eoc().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooDeep);
    }

    #[test]
    fn test_move_past_eoc_truncated() {
        let data = [0x04, 0x01, 0xAA];
        let err = decoder_on(&data).move_past_eoc().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfBuffer);
        assert!(err.stack().len() > 1);
    }

    #[test]
    fn test_decode_eoc_rejects_other_bytes() {
        let data = [0x00, 0x01];
        let err = decoder_on(&data).decode_eoc().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLength);
    }

    #[test]
    fn test_memcpy_bounds() {
        let data = [1, 2, 3];
        let mut decoder = decoder_on(&data);
        assert_eq!(decoder.memcpy(2).unwrap(), &[1, 2]);
        assert_eq!(decoder.memcpy(2).unwrap_err().kind(), ErrorKind::EndOfBuffer);
    }
}
