//! BOOLEAN, NULL, INTEGER and ENUMERATED codecs
//!
//! # Encoding Format
//!
//! INTEGER content is the minimal two's-complement big-endian form: no
//! leading `0x00` unless the next octet's high bit is set, and no leading
//! `0xFF` unless the next octet's high bit is clear. Unsigned variants add a
//! `0x00` octet when the top bit of the value's leading octet is set.
//!
//! Explicit tagging on the primitive decoders accepts only the primitive
//! form of the universal tag.

use crate::ber::decoder::BerDecoder;
use crate::ber::encoder::BerEncoder;
use crate::ber::types::{BerLength, BerTag, DecodeTagging, Tagging};
use asn1rt_core::arena::ByteRef;
use asn1rt_core::datatypes::big_int::{digit_value, render_hex, BigIntLiteral};
use asn1rt_core::error::{CodecError, CodecResult, ErrorKind, Traced};

pub(crate) const ID_BOOLEAN: u8 = 0x01;
pub(crate) const ID_INTEGER: u8 = 0x02;
pub(crate) const ID_NULL: u8 = 0x05;
pub(crate) const ID_ENUMERATED: u8 = 0x0A;

impl<'a> BerDecoder<'a> {
    /// Resolve the content length of a primitive value
    ///
    /// With explicit tagging the exact identifier octet is consumed and the
    /// length decoded; with implicit tagging the caller's length is used.
    /// An indefinite length is [`ErrorKind::InvalidLength`].
    pub(crate) fn primitive_len(
        &mut self,
        id: u8,
        tagging: DecodeTagging,
    ) -> CodecResult<BerLength> {
        match tagging {
            DecodeTagging::Explicit => {
                self.expect_octet(id)?;
                self.decode_len().traced()
            }
            DecodeTagging::Implicit(len) => Ok(len),
        }
    }

    fn signed_content(&mut self, id: u8, tagging: DecodeTagging, width: usize) -> CodecResult<i64> {
        let len = match self.primitive_len(id, tagging)? {
            BerLength::Definite(len) => len,
            BerLength::Indefinite => return Err(CodecError::new(ErrorKind::InvalidLength)),
        };
        if len > width {
            return Err(CodecError::new(ErrorKind::TooBig));
        }
        if len == 0 {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }

        let content = self.buffer.read_n(len).traced()?;
        let first = content[0] as i8 as i64;
        Ok(content[1..]
            .iter()
            .fold(first, |value, &b| value * 256 + b as i64))
    }

    fn unsigned_content(
        &mut self,
        id: u8,
        tagging: DecodeTagging,
        width: usize,
    ) -> CodecResult<(u64, Option<u8>)> {
        let len = match self.primitive_len(id, tagging)? {
            BerLength::Definite(len) => len,
            BerLength::Indefinite => return Err(CodecError::new(ErrorKind::InvalidLength)),
        };
        if len > width + 1 {
            return Err(CodecError::new(ErrorKind::TooBig));
        }

        let content = self.buffer.read_n(len).traced()?;
        let leading = content.first().copied();
        let digits = if len == width + 1 {
            if content[0] != 0 {
                return Err(CodecError::new(ErrorKind::TooBig));
            }
            &content[1..]
        } else {
            content
        };
        let value = digits.iter().fold(0u64, |value, &b| (value << 8) | b as u64);
        Ok((value, leading))
    }

    /// Decode a BOOLEAN; any nonzero content octet is `true`
    pub fn decode_bool(&mut self, tagging: DecodeTagging) -> CodecResult<bool> {
        let len = match tagging {
            DecodeTagging::Explicit => {
                self.expect_octet(ID_BOOLEAN)?;
                BerLength::Definite(self.buffer.fetch().traced()? as usize)
            }
            DecodeTagging::Implicit(len) => len,
        };
        if len != BerLength::Definite(1) {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }
        Ok(self.buffer.fetch().traced()? != 0)
    }

    /// Decode a NULL
    ///
    /// Implicit NULL has no content, so the implicit form reads nothing.
    pub fn decode_null(&mut self, tagging: DecodeTagging) -> CodecResult<()> {
        if tagging == DecodeTagging::Explicit {
            self.expect_octet(ID_NULL)?;
            if self.buffer.fetch().traced()? != 0 {
                return Err(CodecError::new(ErrorKind::InvalidLength));
            }
        }
        Ok(())
    }

    /// Decode an 8-bit INTEGER; the content must be exactly one octet
    pub fn decode_i8(&mut self, tagging: DecodeTagging) -> CodecResult<i8> {
        let len = self.primitive_len(ID_INTEGER, tagging)?;
        if len != BerLength::Definite(1) {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }
        Ok(self.buffer.fetch().traced()? as i8)
    }

    /// Decode a 16-bit INTEGER
    pub fn decode_i16(&mut self, tagging: DecodeTagging) -> CodecResult<i16> {
        self.signed_content(ID_INTEGER, tagging, 2)
            .map(|v| v as i16)
            .traced()
    }

    /// Decode a 32-bit INTEGER
    pub fn decode_i32(&mut self, tagging: DecodeTagging) -> CodecResult<i32> {
        self.signed_content(ID_INTEGER, tagging, 4)
            .map(|v| v as i32)
            .traced()
    }

    /// Decode a 64-bit INTEGER
    ///
    /// # Errors
    /// - [`ErrorKind::TooBig`] for more than eight content octets
    /// - [`ErrorKind::InvalidLength`] for empty or indefinite content
    pub fn decode_i64(&mut self, tagging: DecodeTagging) -> CodecResult<i64> {
        self.signed_content(ID_INTEGER, tagging, 8).traced()
    }

    /// Decode an unsigned 8-bit INTEGER
    ///
    /// Two content octets are accepted when the first is a `0x00` sign pad.
    pub fn decode_u8(&mut self, tagging: DecodeTagging) -> CodecResult<u8> {
        let (value, leading) = self.unsigned_content(ID_INTEGER, tagging, 1).traced()?;
        if leading.is_none() {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }
        Ok(value as u8)
    }

    /// Decode an unsigned 16-bit INTEGER
    pub fn decode_u16(&mut self, tagging: DecodeTagging) -> CodecResult<u16> {
        let (value, leading) = self.unsigned_content(ID_INTEGER, tagging, 2).traced()?;
        if leading.is_none() {
            return Err(CodecError::new(ErrorKind::InvalidLength));
        }
        Ok(value as u16)
    }

    /// Decode an unsigned 32-bit INTEGER; empty content decodes as 0
    pub fn decode_u32(&mut self, tagging: DecodeTagging) -> CodecResult<u32> {
        let (value, _) = self.unsigned_content(ID_INTEGER, tagging, 4).traced()?;
        Ok(value as u32)
    }

    /// Decode an unsigned 64-bit INTEGER; empty content decodes as 0
    ///
    /// # Errors
    /// [`ErrorKind::ConstraintViolation`] if the encoding is negative, with
    /// the field name `_uint64` and the negative value as parameters.
    pub fn decode_u64(&mut self, tagging: DecodeTagging) -> CodecResult<u64> {
        let (value, leading) = self.unsigned_content(ID_INTEGER, tagging, 8).traced()?;
        if leading.is_some_and(|b| b & 0x80 != 0) {
            let signed = value as i64;
            let negative = if signed >= 0 { -signed } else { signed };
            return Err(CodecError::new(ErrorKind::ConstraintViolation)
                .with_param("_uint64")
                .with_param(negative));
        }
        Ok(value)
    }

    /// Decode an 8-bit ENUMERATED
    pub fn decode_enum_i8(&mut self, tagging: DecodeTagging) -> CodecResult<i8> {
        self.signed_content(ID_ENUMERATED, tagging, 1)
            .map(|v| v as i8)
            .traced()
    }

    /// Decode a 16-bit ENUMERATED
    pub fn decode_enum_i16(&mut self, tagging: DecodeTagging) -> CodecResult<i16> {
        self.signed_content(ID_ENUMERATED, tagging, 2)
            .map(|v| v as i16)
            .traced()
    }

    /// Decode a 32-bit ENUMERATED
    pub fn decode_enum_i32(&mut self, tagging: DecodeTagging) -> CodecResult<i32> {
        self.signed_content(ID_ENUMERATED, tagging, 4)
            .map(|v| v as i32)
            .traced()
    }

    /// Decode an unsigned 8-bit ENUMERATED
    pub fn decode_enum_u8(&mut self, tagging: DecodeTagging) -> CodecResult<u8> {
        let (value, _) = self.unsigned_content(ID_ENUMERATED, tagging, 1).traced()?;
        Ok(value as u8)
    }

    /// Decode an unsigned 16-bit ENUMERATED
    pub fn decode_enum_u16(&mut self, tagging: DecodeTagging) -> CodecResult<u16> {
        let (value, _) = self.unsigned_content(ID_ENUMERATED, tagging, 2).traced()?;
        Ok(value as u16)
    }

    /// Decode an unsigned 32-bit ENUMERATED
    pub fn decode_enum_u32(&mut self, tagging: DecodeTagging) -> CodecResult<u32> {
        let (value, _) = self.unsigned_content(ID_ENUMERATED, tagging, 4).traced()?;
        Ok(value as u32)
    }

    /// Decode an INTEGER of any size as `0x`-prefixed hex text
    ///
    /// # Returns
    /// Arena handle of the text; read it with
    /// [`asn1rt_core::Arena::get_str`].
    pub fn decode_big_int(&mut self, tagging: DecodeTagging) -> CodecResult<ByteRef> {
        let len = match self.primitive_len(ID_INTEGER, tagging)? {
            BerLength::Definite(len) => len,
            BerLength::Indefinite => return Err(CodecError::new(ErrorKind::InvalidLength)),
        };
        let content = self.buffer.read_n(len).traced()?;
        let text = render_hex(content);
        self.arena.alloc_copy(text.as_bytes()).traced()
    }
}

impl BerEncoder<'_> {
    fn finish_primitive(&mut self, id: u8, len: usize, tagging: Tagging) -> CodecResult<usize> {
        if tagging == Tagging::Explicit {
            self.buffer.prepend_bytes(&[id, len as u8]).traced()?;
            return Ok(len + 2);
        }
        Ok(len)
    }

    fn signed_content(&mut self, value: i64, id: u8, tagging: Tagging) -> CodecResult<usize> {
        let mut temp = value;
        let mut len = 0;
        let mut lb;
        loop {
            lb = (temp % 256) as u8;
            temp /= 256;
            if temp < 0 && lb != 0 {
                temp -= 1;
            }
            self.buffer.prepend_byte(lb).traced()?;
            len += 1;
            if temp == 0 || temp == -1 {
                break;
            }
        }

        if value > 0 && lb & 0x80 != 0 {
            self.buffer.prepend_byte(0x00).traced()?;
            len += 1;
        } else if value < 0 && lb & 0x80 == 0 {
            self.buffer.prepend_byte(0xFF).traced()?;
            len += 1;
        }
        self.finish_primitive(id, len, tagging)
    }

    fn unsigned_content(&mut self, value: u64, id: u8, tagging: Tagging) -> CodecResult<usize> {
        let mut temp = value;
        let mut len = 0;
        let mut lb;
        loop {
            lb = (temp % 256) as u8;
            temp /= 256;
            self.buffer.prepend_byte(lb).traced()?;
            len += 1;
            if temp == 0 {
                break;
            }
        }

        if lb & 0x80 != 0 {
            self.buffer.prepend_byte(0x00).traced()?;
            len += 1;
        }
        self.finish_primitive(id, len, tagging)
    }

    /// Encode a BOOLEAN as `0xFF` or `0x00`
    pub fn encode_bool(&mut self, value: bool, tagging: Tagging) -> CodecResult<usize> {
        self.buffer
            .prepend_byte(if value { 0xFF } else { 0x00 })
            .traced()?;
        self.finish_primitive(ID_BOOLEAN, 1, tagging)
    }

    /// Encode a NULL; the implicit form writes nothing
    pub fn encode_null(&mut self, tagging: Tagging) -> CodecResult<usize> {
        match tagging {
            Tagging::Explicit => {
                self.buffer.prepend_bytes(&[ID_NULL, 0x00]).traced()?;
                Ok(2)
            }
            Tagging::Implicit => Ok(0),
        }
    }

    /// Encode an 8-bit INTEGER
    pub fn encode_i8(&mut self, value: i8, tagging: Tagging) -> CodecResult<usize> {
        self.signed_content(value as i64, ID_INTEGER, tagging)
    }

    /// Encode a 16-bit INTEGER
    pub fn encode_i16(&mut self, value: i16, tagging: Tagging) -> CodecResult<usize> {
        self.signed_content(value as i64, ID_INTEGER, tagging)
    }

    /// Encode a 32-bit INTEGER
    pub fn encode_i32(&mut self, value: i32, tagging: Tagging) -> CodecResult<usize> {
        self.signed_content(value as i64, ID_INTEGER, tagging)
    }

    /// Encode a 64-bit INTEGER
    ///
    /// # Encoding Format
    /// Minimal two's complement: 127 is `02 01 7F`, 128 is `02 02 00 80`,
    /// -128 is `02 01 80` and -129 is `02 02 FF 7F`.
    pub fn encode_i64(&mut self, value: i64, tagging: Tagging) -> CodecResult<usize> {
        self.signed_content(value, ID_INTEGER, tagging)
    }

    /// Encode an unsigned 8-bit INTEGER
    pub fn encode_u8(&mut self, value: u8, tagging: Tagging) -> CodecResult<usize> {
        self.unsigned_content(value as u64, ID_INTEGER, tagging)
    }

    /// Encode an unsigned 16-bit INTEGER
    pub fn encode_u16(&mut self, value: u16, tagging: Tagging) -> CodecResult<usize> {
        self.unsigned_content(value as u64, ID_INTEGER, tagging)
    }

    /// Encode an unsigned 32-bit INTEGER
    pub fn encode_u32(&mut self, value: u32, tagging: Tagging) -> CodecResult<usize> {
        self.unsigned_content(value as u64, ID_INTEGER, tagging)
    }

    /// Encode an unsigned 64-bit INTEGER
    pub fn encode_u64(&mut self, value: u64, tagging: Tagging) -> CodecResult<usize> {
        self.unsigned_content(value, ID_INTEGER, tagging)
    }

    /// Encode an 8-bit ENUMERATED
    pub fn encode_enum_i8(&mut self, value: i8, tagging: Tagging) -> CodecResult<usize> {
        self.signed_content(value as i64, ID_ENUMERATED, tagging)
    }

    /// Encode a 16-bit ENUMERATED
    pub fn encode_enum_i16(&mut self, value: i16, tagging: Tagging) -> CodecResult<usize> {
        self.signed_content(value as i64, ID_ENUMERATED, tagging)
    }

    /// Encode a 32-bit ENUMERATED
    pub fn encode_enum_i32(&mut self, value: i32, tagging: Tagging) -> CodecResult<usize> {
        self.signed_content(value as i64, ID_ENUMERATED, tagging)
    }

    /// Encode an unsigned 8-bit ENUMERATED
    pub fn encode_enum_u8(&mut self, value: u8, tagging: Tagging) -> CodecResult<usize> {
        self.unsigned_content(value as u64, ID_ENUMERATED, tagging)
    }

    /// Encode an unsigned 16-bit ENUMERATED
    pub fn encode_enum_u16(&mut self, value: u16, tagging: Tagging) -> CodecResult<usize> {
        self.unsigned_content(value as u64, ID_ENUMERATED, tagging)
    }

    /// Encode an unsigned 32-bit ENUMERATED
    pub fn encode_enum_u32(&mut self, value: u32, tagging: Tagging) -> CodecResult<usize> {
        self.unsigned_content(value as u64, ID_ENUMERATED, tagging)
    }

    /// Encode an INTEGER given as `0x` hex or `0b` binary text
    ///
    /// The digits are the two's-complement bit pattern of the value. A digit
    /// count that does not fill whole octets makes the value positive;
    /// otherwise the top bit of the leading digit is the sign. Redundant
    /// leading sign digits are dropped and a `0x00`/`0xFF` pad is added
    /// where the remaining leading octet would read with the wrong sign.
    ///
    /// # Errors
    /// - [`ErrorKind::BadValue`] for empty text or an invalid digit
    /// - [`ErrorKind::NotSupported`] for decimal text
    pub fn encode_big_int(&mut self, text: &str, tagging: Tagging) -> CodecResult<usize> {
        let literal = BigIntLiteral::parse(text).traced()?;
        let Some(radix) = literal.radix() else {
            self.buffer.prepend_byte(0x00).traced()?;
            return self.finish_big_int(1, tagging);
        };

        let per_byte = radix.digits_per_byte();
        let bits = radix.bits_per_digit();
        let max = radix.max_digit();
        let digit = |c: u8| {
            digit_value(c)
                .filter(|&d| d <= max)
                .ok_or_else(|| CodecError::new(ErrorKind::BadValue).with_param(text))
        };

        let digits = literal.digits().as_bytes();
        let positive = match digits.first() {
            Some(&first) if digits.len() % per_byte == 0 => digit(first)? & (1 << (bits - 1)) == 0,
            _ => true,
        };

        let mut end = 0;
        if positive {
            while end < digits.len() && digits[end] == b'0' {
                end += 1;
            }
        } else {
            while end < digits.len()
                && digits[end..end + per_byte]
                    .iter()
                    .all(|&c| digit_value(c) == Some(max))
            {
                end += per_byte;
            }
        }

        let mut len = 0;
        let mut num_digits = 0;
        let mut value: u8 = 0;
        let mut shift = 0;
        let mut last: u8 = 0;
        for &c in digits[end..].iter().rev() {
            value |= digit(c)? << shift;
            shift += bits;
            num_digits += 1;
            if num_digits % per_byte == 0 {
                self.buffer.prepend_byte(value).traced()?;
                last = value;
                value = 0;
                shift = 0;
                len += 1;
            }
        }

        if num_digits % per_byte != 0 {
            self.buffer.prepend_byte(value).traced()?;
            len += 1;
        } else if positive && (num_digits == 0 || last & 0x80 != 0) {
            self.buffer.prepend_byte(0x00).traced()?;
            len += 1;
        } else if !positive && (num_digits == 0 || last & 0x80 == 0) {
            self.buffer.prepend_byte(0xFF).traced()?;
            len += 1;
        }

        self.finish_big_int(len, tagging)
    }

    fn finish_big_int(&mut self, len: usize, tagging: Tagging) -> CodecResult<usize> {
        match tagging {
            Tagging::Explicit => self.encode_tag_len(BerTag::INTEGER, BerLength::Definite(len)),
            Tagging::Implicit => Ok(len),
        }
    }
}
