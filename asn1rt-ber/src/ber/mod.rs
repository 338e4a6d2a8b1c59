//! BER (Basic Encoding Rules) encoder and decoder for ASN.1
//!
//! Each ASN.1 value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag Encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//! Where:
//! - CC = Class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = Primitive (0) or Constructed (1)
//! - TTTTT = Tag number (0-30), or 11111 followed by base-128 octets
//!
//! In memory a tag is packed into a `u32`: class and form in the top three
//! bits, the ID code in the low 29 bits (see [`BerTag`]).
//!
//! ## Length Encoding
//!
//! - **Short form**: one octet, lengths 0-127
//! - **Long form**: `0x80 | n` followed by `n` big-endian octets
//! - **Indefinite**: `0x80`, content terminated by an end-of-contents
//!   marker `00 00`
//!
//! ## Encoding Direction
//!
//! [`BerEncoder`] writes from the end of its buffer towards the front, so the
//! content of a constructed value is encoded before its header, and its
//! length is already known when the header is written.
//!
//! ## DER
//!
//! DER output is produced with the same encoder. The DER-specific pieces are
//! [`BerEncoder::der_encode_bit_string`] and
//! [`BerEncoder::der_canonical_sort`] for SET OF.

pub mod decoder;
pub mod encoder;
pub mod types;

mod der;
mod oid;
mod open_type;
mod scalar;
mod string;

pub use decoder::BerDecoder;
pub use encoder::BerEncoder;
pub use types::{
    BerLength, BerTag, BerTagClass, BufLocDescr, ConstructedContext, DecodeTagging, MatchFlags,
    Tagging, TAG_LSHIFT, TM_APPL, TM_CONS, TM_CTXT, TM_IDCODE, TM_PRIV, TM_UNIV,
};
