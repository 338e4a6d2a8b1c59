//! Textual arbitrary-precision INTEGER values
//!
//! Big integers travel as text: decoding always renders `0x` followed by
//! lowercase hex digits of the two's-complement content; encoding accepts
//! `0x` (hex), `0b` (binary) or the single digit `0`. The digit string is the
//! two's-complement bit pattern, so its leading digit carries the sign.

use crate::error::{CodecError, CodecResult, ErrorKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

static BIG_INT_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0(?:x(?P<hex>[0-9A-Fa-f]+)|b(?P<bin>[01]+))?$")
        .expect("big integer literal pattern is valid")
});

/// Digit base of a big-integer literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    /// `0b` prefix, one bit per digit
    Binary,
    /// `0x` prefix, four bits per digit
    Hex,
}

impl Radix {
    /// Bits contributed by one digit
    pub fn bits_per_digit(self) -> u32 {
        match self {
            Radix::Binary => 1,
            Radix::Hex => 4,
        }
    }

    /// Digits making up one content octet
    pub fn digits_per_byte(self) -> usize {
        match self {
            Radix::Binary => 8,
            Radix::Hex => 2,
        }
    }

    /// Largest digit value
    pub fn max_digit(self) -> u8 {
        match self {
            Radix::Binary => 0x1,
            Radix::Hex => 0xF,
        }
    }
}

/// Validated big-integer literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigIntLiteral<'s> {
    radix: Option<Radix>,
    digits: &'s str,
}

impl<'s> BigIntLiteral<'s> {
    /// Validate a literal
    ///
    /// # Errors
    /// - [`ErrorKind::BadValue`] for an empty string or a bad digit after a
    ///   `0x`/`0b` prefix
    /// - [`ErrorKind::NotSupported`] for anything else (decimal text), with
    ///   the parameter `big integer in base 10 format`
    pub fn parse(text: &'s str) -> CodecResult<Self> {
        if text.is_empty() {
            return Err(CodecError::new(ErrorKind::BadValue));
        }
        if let Some(caps) = BIG_INT_LITERAL.captures(text) {
            if let Some(hex) = caps.name("hex") {
                return Ok(Self {
                    radix: Some(Radix::Hex),
                    digits: hex.as_str(),
                });
            }
            if let Some(bin) = caps.name("bin") {
                return Ok(Self {
                    radix: Some(Radix::Binary),
                    digits: bin.as_str(),
                });
            }
            return Ok(Self {
                radix: None,
                digits: "",
            });
        }
        if text.len() > 2 && (text.starts_with("0x") || text.starts_with("0b")) {
            return Err(CodecError::new(ErrorKind::BadValue).with_param(text));
        }
        Err(CodecError::new(ErrorKind::NotSupported).with_param("big integer in base 10 format"))
    }

    /// Digit base; `None` for the literal `0`
    pub fn radix(&self) -> Option<Radix> {
        self.radix
    }

    /// Digits after the prefix
    pub fn digits(&self) -> &'s str {
        self.digits
    }
}

/// Value of a hex or binary digit character
pub fn digit_value(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

/// Render INTEGER content octets as a `0x` literal
///
/// Leading zero octets are dropped. A `0` digit is kept in front when the
/// value is zero, or when a dropped zero octet was what kept the next octet's
/// high bit from reading as a sign bit.
pub fn render_hex(content: &[u8]) -> String {
    let leading_zero = content.first() == Some(&0);
    let significant: &[u8] = {
        let start = content.iter().position(|&b| b != 0).unwrap_or(content.len());
        &content[start..]
    };

    let mut text = String::with_capacity(significant.len() * 2 + 3);
    text.push_str("0x");
    let keeps_sign_digit = significant
        .first()
        .is_some_and(|&b| leading_zero && b & 0x80 != 0);
    if significant.is_empty() || keeps_sign_digit {
        text.push('0');
    }
    for byte in significant {
        let _ = write!(text, "{:02x}", byte);
    }
    text
}
