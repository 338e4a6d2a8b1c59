//! OBJECT IDENTIFIER and RELATIVE-OID codecs
//!
//! # Encoding Format
//!
//! Each arc is a base-128 number, most significant group first, with the
//! high bit set on every octet but the last. An absolute OID folds its
//! first two arcs into one number `x * 40 + y`.
//!
//! ```text
//! 1.2.840.113549  ->  06 06 2A 86 48 86 F7 0D
//! ```

use crate::ber::decoder::BerDecoder;
use crate::ber::encoder::BerEncoder;
use crate::ber::types::{BerLength, BerTag, DecodeTagging, Tagging};
use asn1rt_core::datatypes::object_id::{ObjectId, MAX_SUBIDS};
use asn1rt_core::error::{CodecError, CodecResult, ErrorKind, Traced};

const ID_OBJECT_IDENTIFIER: u8 = 0x06;
const ID_RELATIVE_OID: u8 = 0x0D;

impl<'a> BerDecoder<'a> {
    fn oid_content(&mut self, id: u8, tagging: DecodeTagging) -> CodecResult<&'a [u8]> {
        match self.primitive_len(id, tagging)? {
            BerLength::Definite(len) if len > 0 => self.buffer.read_n(len).traced(),
            _ => Err(CodecError::new(ErrorKind::InvalidLength)),
        }
    }

    /// Decode an OBJECT IDENTIFIER
    ///
    /// The first arc is derived from the folded leading number: values of
    /// 80 and above belong to arc 2.
    ///
    /// # Errors
    /// - [`ErrorKind::InvalidLength`] for empty content or a truncated arc
    /// - [`ErrorKind::InvalidObjectId`] for an arc wider than 32 bits or more
    ///   than 128 arcs
    pub fn decode_object_id(&mut self, tagging: DecodeTagging) -> CodecResult<ObjectId> {
        let content = self.oid_content(ID_OBJECT_IDENTIFIER, tagging)?;
        let mut subids = Vec::new();
        parse_subids(content, &mut subids, |subids, value| {
            if subids.is_empty() {
                let first = (value / 40).min(2);
                subids.push(first);
                subids.push(value - first * 40);
            } else {
                subids.push(value);
            }
        })?;
        ObjectId::new(subids)
    }

    /// Decode a RELATIVE-OID
    pub fn decode_relative_oid(&mut self, tagging: DecodeTagging) -> CodecResult<ObjectId> {
        let content = self.oid_content(ID_RELATIVE_OID, tagging)?;
        let mut subids = Vec::new();
        parse_subids(content, &mut subids, |subids, value| subids.push(value))?;
        ObjectId::new(subids)
    }
}

fn parse_subids<F>(content: &[u8], subids: &mut Vec<u32>, mut push: F) -> CodecResult<()>
where
    F: FnMut(&mut Vec<u32>, u32),
{
    let mut octets = content.iter();
    while octets.len() > 0 {
        if subids.len() >= MAX_SUBIDS {
            return Err(CodecError::new(ErrorKind::InvalidObjectId));
        }

        let mut value: u32 = 0;
        loop {
            let Some(&b) = octets.next() else {
                return Err(CodecError::new(ErrorKind::InvalidLength));
            };
            value = value
                .checked_mul(128)
                .and_then(|v| v.checked_add((b & 0x7F) as u32))
                .ok_or_else(|| CodecError::new(ErrorKind::InvalidObjectId))?;
            if b & 0x80 == 0 {
                break;
            }
        }
        push(subids, value);
    }
    Ok(())
}

impl BerEncoder<'_> {
    /// Encode an OBJECT IDENTIFIER
    ///
    /// # Errors
    /// [`ErrorKind::InvalidObjectId`] for fewer than two arcs, a first arc
    /// above 2, or a second arc above 39 under arcs 0 and 1.
    pub fn encode_object_id(&mut self, oid: &ObjectId, tagging: Tagging) -> CodecResult<usize> {
        oid.validate_absolute()?;
        let subids = oid.subids();

        let mut len = 0;
        for i in (1..subids.len()).rev() {
            let subid = if i == 1 {
                subids[0]
                    .checked_mul(40)
                    .and_then(|v| v.checked_add(subids[1]))
                    .ok_or_else(|| CodecError::new(ErrorKind::InvalidObjectId))?
            } else {
                subids[i]
            };
            len += self.encode_identifier(subid)?;
        }

        match tagging {
            Tagging::Explicit => {
                self.encode_tag_len(BerTag::OBJECT_IDENTIFIER, BerLength::Definite(len))
            }
            Tagging::Implicit => Ok(len),
        }
    }

    /// Encode a RELATIVE-OID
    ///
    /// # Errors
    /// [`ErrorKind::InvalidObjectId`] if there are no arcs.
    pub fn encode_relative_oid(&mut self, oid: &ObjectId, tagging: Tagging) -> CodecResult<usize> {
        if oid.is_empty() {
            return Err(CodecError::new(ErrorKind::InvalidObjectId));
        }

        let mut len = 0;
        for &subid in oid.subids().iter().rev() {
            len += self.encode_identifier(subid)?;
        }

        match tagging {
            Tagging::Explicit => self
                .encode_tag_len(BerTag::RELATIVE_OID, BerLength::Definite(len))
                .traced(),
            Tagging::Implicit => Ok(len),
        }
    }
}
