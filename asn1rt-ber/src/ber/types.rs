//! BER encoding types (Tag, Length, etc.)

use std::fmt;
use std::ops::BitOr;

/// Universal class bits of a packed tag
pub const TM_UNIV: u32 = 0x0000_0000;
/// Application class bits of a packed tag
pub const TM_APPL: u32 = 0x4000_0000;
/// Context-specific class bits of a packed tag
pub const TM_CTXT: u32 = 0x8000_0000;
/// Private class bits of a packed tag
pub const TM_PRIV: u32 = 0xC000_0000;
/// Constructed form bit of a packed tag
pub const TM_CONS: u32 = 0x2000_0000;
/// ID code mask of a packed tag
pub const TM_IDCODE: u32 = 0x1FFF_FFFF;
/// Left shift applied to the class/form bits of the wire byte
pub const TAG_LSHIFT: u32 = 24;

/// Class/form bits of the first identifier octet
pub const TM_CLASS_FORM: u8 = 0xE0;
/// Form bit of the first identifier octet
pub const TM_FORM: u8 = 0x20;
/// ID code bits of the first identifier octet; all ones selects the
/// multi-byte form
pub const TM_B_IDCODE: u8 = 0x1F;

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Get tag class from bits (bits 7-6 of tag byte)
    pub fn from_bits(bits: u8) -> Self {
        match (bits >> 6) & 0x03 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    /// Convert tag class to bits (for encoding)
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// BER Tag
///
/// A tag is packed into 32 bits: the class and form bits of the first
/// identifier octet sit in the top three bits, and the ID code fills the low
/// 29 bits.
///
/// ```text
/// 31 30 29 28 ........................ 0
///  C  C  F  I I I I I I I I I I I I I I I
/// ```
///
/// # Wire Format
///
/// Short form (tag number 0-30):
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C F T T T T T
/// ```
///
/// Extended form (tag number >= 31):
/// ```text
/// First byte:  C C F 1 1 1 1 1
/// Following bytes: 1 T T T T T T T ... 0 T T T T T T T
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BerTag(u32);

impl BerTag {
    /// End-of-contents (universal 0, primitive)
    pub const EOC: BerTag = BerTag(0);
    /// BOOLEAN
    pub const BOOLEAN: BerTag = BerTag(1);
    /// INTEGER
    pub const INTEGER: BerTag = BerTag(2);
    /// BIT STRING
    pub const BIT_STRING: BerTag = BerTag(3);
    /// OCTET STRING
    pub const OCTET_STRING: BerTag = BerTag(4);
    /// NULL
    pub const NULL: BerTag = BerTag(5);
    /// OBJECT IDENTIFIER
    pub const OBJECT_IDENTIFIER: BerTag = BerTag(6);
    /// ObjectDescriptor
    pub const OBJECT_DESCRIPTOR: BerTag = BerTag(7);
    /// REAL
    pub const REAL: BerTag = BerTag(9);
    /// ENUMERATED
    pub const ENUMERATED: BerTag = BerTag(10);
    /// UTF8String
    pub const UTF8_STRING: BerTag = BerTag(12);
    /// RELATIVE-OID
    pub const RELATIVE_OID: BerTag = BerTag(13);
    /// SEQUENCE and SEQUENCE OF (constructed)
    pub const SEQUENCE: BerTag = BerTag(TM_CONS | 16);
    /// SET and SET OF (constructed)
    pub const SET: BerTag = BerTag(TM_CONS | 17);
    /// NumericString
    pub const NUMERIC_STRING: BerTag = BerTag(18);
    /// PrintableString
    pub const PRINTABLE_STRING: BerTag = BerTag(19);
    /// TeletexString (T61String)
    pub const TELETEX_STRING: BerTag = BerTag(20);
    /// VideotexString
    pub const VIDEOTEX_STRING: BerTag = BerTag(21);
    /// IA5String
    pub const IA5_STRING: BerTag = BerTag(22);
    /// UTCTime
    pub const UTC_TIME: BerTag = BerTag(23);
    /// GeneralizedTime
    pub const GENERALIZED_TIME: BerTag = BerTag(24);
    /// GraphicString
    pub const GRAPHIC_STRING: BerTag = BerTag(25);
    /// VisibleString
    pub const VISIBLE_STRING: BerTag = BerTag(26);
    /// GeneralString
    pub const GENERAL_STRING: BerTag = BerTag(27);
    /// UniversalString
    pub const UNIVERSAL_STRING: BerTag = BerTag(28);
    /// BMPString
    pub const BMP_STRING: BerTag = BerTag(30);

    /// Create a new BER tag
    ///
    /// # Arguments
    /// * `class` - Tag class
    /// * `constructed` - Whether this is a constructed type
    /// * `number` - Tag number, truncated to 29 bits
    pub const fn new(class: BerTagClass, constructed: bool, number: u32) -> Self {
        let class_bits = (class as u32) << 30;
        let form_bits = if constructed { TM_CONS } else { 0 };
        Self(class_bits | form_bits | (number & TM_IDCODE))
    }

    /// Create a Universal class tag
    pub const fn universal(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Universal, constructed, number)
    }

    /// Create an Application class tag
    pub const fn application(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Application, constructed, number)
    }

    /// Create a Context-specific class tag
    pub const fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::ContextSpecific, constructed, number)
    }

    /// Create a Private class tag
    pub const fn private(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Private, constructed, number)
    }

    /// Wrap a packed 32-bit tag value
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Tag built from a single identifier octet (short form only)
    pub const fn from_octet(octet: u8) -> Self {
        Self((((octet & TM_CLASS_FORM) as u32) << TAG_LSHIFT) | (octet & TM_B_IDCODE) as u32)
    }

    /// Packed 32-bit value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get tag class
    pub fn class(self) -> BerTagClass {
        BerTagClass::from_bits((self.0 >> TAG_LSHIFT) as u8)
    }

    /// Check if tag is constructed
    pub fn is_constructed(self) -> bool {
        self.0 & TM_CONS != 0
    }

    /// Get tag number
    pub fn number(self) -> u32 {
        self.0 & TM_IDCODE
    }

    /// Same tag with the form bit cleared
    pub fn primitive(self) -> Self {
        Self(self.0 & !TM_CONS)
    }

    /// Same tag with the form bit set
    pub fn constructed(self) -> Self {
        Self(self.0 | TM_CONS)
    }

    /// Compare class and number, ignoring the form bit
    pub fn matches(self, other: BerTag) -> bool {
        self.primitive() == other.primitive()
    }

    /// Class/form bits as they appear in the first identifier octet
    pub fn class_form_octet(self) -> u8 {
        (self.0 >> TAG_LSHIFT) as u8 & TM_CLASS_FORM
    }

    /// Single identifier octet, if the number fits the short form
    pub fn to_octet(self) -> Option<u8> {
        let number = self.number();
        if number < TM_B_IDCODE as u32 {
            Some(self.class_form_octet() | number as u8)
        } else {
            None
        }
    }
}

impl fmt::Display for BerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class() {
            BerTagClass::Universal => write!(f, "[UNIVERSAL {}]", self.number()),
            BerTagClass::Application => write!(f, "[APPLICATION {}]", self.number()),
            BerTagClass::ContextSpecific => write!(f, "[{}]", self.number()),
            BerTagClass::Private => write!(f, "[PRIVATE {}]", self.number()),
        }
    }
}

impl fmt::Debug for BerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = if self.is_constructed() { "C" } else { "P" };
        write!(f, "BerTag({} {})", self, form)
    }
}

/// BER Length
///
/// # Wire Format
///
/// Short form:
/// ```text
/// Byte: 0 L L L L L L L
/// ```
///
/// Long form (1 to 4 magnitude bytes are accepted on decode):
/// ```text
/// First byte:  1 N N N N N N N  (N = number of length bytes)
/// Following bytes: L L L L L L L L  (big-endian length value)
/// ```
///
/// Indefinite form: the single byte `0x80`, with the content terminated by
/// an end-of-contents marker `00 00`. Only constructed values may use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// Declared byte count
    Definite(usize),
    /// Content ends at a matching end-of-contents marker
    Indefinite,
}

impl BerLength {
    /// Whether this is the indefinite form
    pub fn is_indefinite(self) -> bool {
        matches!(self, BerLength::Indefinite)
    }

    /// Byte count of a definite length
    pub fn definite(self) -> Option<usize> {
        match self {
            BerLength::Definite(len) => Some(len),
            BerLength::Indefinite => None,
        }
    }
}

impl From<usize> for BerLength {
    fn from(len: usize) -> Self {
        BerLength::Definite(len)
    }
}

impl fmt::Display for BerLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BerLength::Definite(len) => write!(f, "{}", len),
            BerLength::Indefinite => f.write_str("indefinite"),
        }
    }
}

/// Tagging mode of an encode call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tagging {
    /// Emit the universal tag and length of the type
    Explicit,
    /// Emit content only; the caller adds its own tag
    Implicit,
}

/// Tagging mode of a decode call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTagging {
    /// Match the universal tag of the type and read its length
    Explicit,
    /// The caller already matched a tag; the content has this length
    Implicit(BerLength),
}

/// Options of [`crate::ber::BerDecoder::match_tag`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchFlags(u8);

impl MatchFlags {
    /// Plain match at the cursor; restore on return
    pub const NONE: MatchFlags = MatchFlags(0);
    /// Skip non-matching primitive elements until the tag is found
    pub const SEEK: MatchFlags = MatchFlags(0x01);
    /// Leave the cursor on the content of the matched element
    pub const ADVANCE: MatchFlags = MatchFlags(0x02);
    /// Skip the element under the cursor before matching
    pub const SKIP: MatchFlags = MatchFlags(0x08);
    /// The element is optional; no error parameters on a miss after skip
    pub const OPTIONAL: MatchFlags = MatchFlags(0x10);

    /// Whether every flag in `other` is set
    pub fn contains(self, other: MatchFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw flag bits
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for MatchFlags {
    type Output = MatchFlags;

    fn bitor(self, rhs: MatchFlags) -> MatchFlags {
        MatchFlags(self.0 | rhs.0)
    }
}

/// Bounds of a constructed value being iterated
///
/// `start` is the decode position of the first content byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructedContext {
    /// Position of the first content byte
    pub start: usize,
    /// Declared content length
    pub length: BerLength,
}

/// Location of an encoded element inside an encode buffer
///
/// `offset` is the distance from the end of the buffer to the first byte of
/// the element, which stays fixed while the buffer grows at the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufLocDescr {
    /// Encoded size of the element
    pub num_octets: usize,
    /// Distance from the end of the buffer to the element start
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ber_tag_packing() {
        let tag = BerTag::application(true, 0);
        assert_eq!(tag.raw(), TM_APPL | TM_CONS);
        assert_eq!(tag.class(), BerTagClass::Application);
        assert!(tag.is_constructed());
        assert_eq!(tag.number(), 0);
        assert_eq!(tag.to_octet(), Some(0x60));
    }

    #[test]
    fn test_ber_tag_from_octet() {
        let tag = BerTag::from_octet(0xA3);
        assert_eq!(tag, BerTag::context_specific(true, 3));
        assert_eq!(BerTag::from_octet(0x30), BerTag::SEQUENCE);
        assert_eq!(BerTag::from_octet(0x02), BerTag::INTEGER);
    }

    #[test]
    fn test_ber_tag_long_number_has_no_octet() {
        let tag = BerTag::private(false, 31);
        assert_eq!(tag.raw(), TM_PRIV | 31);
        assert_eq!(tag.to_octet(), None);
        assert_eq!(BerTag::universal(false, 30).to_octet(), Some(0x1E));
    }

    #[test]
    fn test_ber_tag_matches_ignores_form() {
        assert!(BerTag::OCTET_STRING.matches(BerTag::OCTET_STRING.constructed()));
        assert!(!BerTag::OCTET_STRING.matches(BerTag::BIT_STRING));
        assert_eq!(BerTag::SEQUENCE.primitive(), BerTag::universal(false, 16));
    }

    #[test]
    fn test_ber_tag_display() {
        assert_eq!(BerTag::INTEGER.to_string(), "[UNIVERSAL 2]");
        assert_eq!(BerTag::application(false, 7).to_string(), "[APPLICATION 7]");
        assert_eq!(BerTag::context_specific(true, 1).to_string(), "[1]");
        assert_eq!(BerTag::private(false, 300).to_string(), "[PRIVATE 300]");
    }

    #[test]
    fn test_tag_number_truncated() {
        let tag = BerTag::context_specific(false, u32::MAX);
        assert_eq!(tag.number(), TM_IDCODE);
        assert_eq!(tag.class(), BerTagClass::ContextSpecific);
    }

    #[test]
    fn test_match_flags() {
        let flags = MatchFlags::SEEK | MatchFlags::ADVANCE;
        assert!(flags.contains(MatchFlags::SEEK));
        assert!(flags.contains(MatchFlags::ADVANCE));
        assert!(!flags.contains(MatchFlags::SKIP));
        assert_eq!(flags.bits(), 0x03);
    }

    #[test]
    fn test_ber_length() {
        assert_eq!(BerLength::from(5).definite(), Some(5));
        assert!(BerLength::Indefinite.is_indefinite());
        assert_eq!(BerLength::Indefinite.definite(), None);
        assert_eq!(BerLength::Indefinite.to_string(), "indefinite");
    }
}
