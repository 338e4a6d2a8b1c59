//! Open type and extension-list codecs
//!
//! An open type is captured on decode as the exact bytes of the next
//! complete TLV, nested indefinite-length content included. Extension lists
//! collect the unknown trailing elements of an extensible SEQUENCE or SET.

use crate::ber::decoder::BerDecoder;
use crate::ber::encoder::BerEncoder;
use crate::ber::types::{BerLength, BerTag, ConstructedContext, MatchFlags};
use asn1rt_core::arena::ByteRef;
use asn1rt_core::datatypes::open_type::OpenType;
use asn1rt_core::error::{CodecError, CodecResult, ErrorKind, Traced};

impl<'a> BerDecoder<'a> {
    /// Capture the next complete element into the arena
    ///
    /// Reaching the end of the message where the element would start is
    /// not an error: a trailing open type encoded as an implicit NULL leaves
    /// no bytes, and an empty value is returned.
    ///
    /// # Errors
    /// [`ErrorKind::BadValue`] if the element is an end-of-contents marker.
    pub fn decode_open_type(&mut self) -> CodecResult<ByteRef> {
        let saved = self.buffer.checkpoint();
        let start = self.buffer.cursor();

        match self.decode_tag_len(MatchFlags::ADVANCE) {
            Ok((_, BerLength::Indefinite)) => self.move_past_eoc().traced()?,
            Ok((tag, BerLength::Definite(0))) if tag == BerTag::EOC => {
                return Err(CodecError::new(ErrorKind::BadValue));
            }
            Ok((_, BerLength::Definite(len))) => self.buffer.advance(len).traced()?,
            Err(err) if err.kind() == ErrorKind::EndOfBuffer => {
                log::warn!("end of buffer at open type offset {}; value is empty", start);
                self.buffer.restore(saved);
            }
            Err(err) => return Err(err.trace()),
        }

        let bytes = self.buffer.consumed(start).traced()?;
        self.arena.alloc_copy(bytes).traced()
    }

    fn append_open_type(&mut self, list: Option<&mut Vec<ByteRef>>) -> CodecResult<()> {
        match list {
            Some(list) => {
                let value = self.decode_open_type().traced()?;
                list.push(value);
                Ok(())
            }
            None => self.next_element().traced(),
        }
    }

    /// Decode the extension elements of a constructed value
    ///
    /// # Arguments
    /// * `ctx` - The enclosing constructed value
    /// * `tag` - `None` to take every remaining element; otherwise elements
    ///   are taken until one with this tag is under the cursor
    /// * `list` - Receives the captured elements; `None` skips them
    ///
    /// # Errors
    /// [`ErrorKind::EndOfBuffer`] if `tag` is given and the constructed
    /// value ends before it is found.
    pub fn decode_open_type_ext(
        &mut self,
        ctx: &ConstructedContext,
        tag: Option<BerTag>,
        mut list: Option<&mut Vec<ByteRef>>,
    ) -> CodecResult<()> {
        let Some(tag) = tag else {
            while !self.check_end(ctx) {
                self.append_open_type(list.as_deref_mut())?;
            }
            return Ok(());
        };

        loop {
            match self.match_tag(tag, MatchFlags::NONE) {
                Ok(_) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::IdNotFound => {
                    if self.check_end(ctx) {
                        return Err(CodecError::new(ErrorKind::EndOfBuffer));
                    }
                    self.append_open_type(list.as_deref_mut())?;
                }
                Err(err) => return Err(err.trace()),
            }
        }
    }
}

/// Parse the leading TLV of an open type value
///
/// # Returns
/// The encoded size of that TLV.
fn open_type_len(bytes: &[u8]) -> CodecResult<usize> {
    if bytes.is_empty() {
        return Err(CodecError::new(ErrorKind::BadValue));
    }

    let mut decoder = BerDecoder::new();
    match decoder.setp(bytes, bytes.len()).traced()? {
        (tag, _) if tag == BerTag::EOC => Err(CodecError::new(ErrorKind::BadValue)),
        (_, BerLength::Indefinite) => Err(CodecError::new(ErrorKind::NotSupported)
            .with_param("indefinite length open type")),
        (_, BerLength::Definite(total)) => Ok(total),
    }
}

impl BerEncoder<'_> {
    /// Encode an open type
    ///
    /// [`OpenType::Raw`] bytes are copied in; [`OpenType::InPlace`] bytes are
    /// already at the front of the message and are only checked and counted.
    /// Either way only the first complete TLV counts, so trailing bytes of a
    /// raw value are not copied.
    ///
    /// # Errors
    /// - [`ErrorKind::BadValue`] for an empty value or an end-of-contents
    ///   marker
    /// - [`ErrorKind::NotSupported`] for an indefinite-length value
    pub fn encode_open_type(&mut self, value: &OpenType) -> CodecResult<usize> {
        match value {
            OpenType::Raw(bytes) => {
                let len = open_type_len(bytes)?;
                self.memcpy(&bytes[..len])
            }
            OpenType::InPlace(count) => {
                let written = self.buffer.written();
                if *count > written.len() {
                    return Err(CodecError::new(ErrorKind::BadValue));
                }
                open_type_len(&written[..*count]).traced()
            }
        }
    }

    /// Encode an extension list; the first element ends up first in the
    /// message
    pub fn encode_open_type_ext(&mut self, list: &[OpenType]) -> CodecResult<usize> {
        let mut len = 0;
        for value in list.iter().rev() {
            len += self.encode_open_type(value)?;
        }
        Ok(len)
    }
}
