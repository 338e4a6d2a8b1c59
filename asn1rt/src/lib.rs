//! asn1rt - ASN.1 BER/DER codec runtime
//!
//! This library is the runtime that generated ASN.1 encoders and decoders
//! call into. It reads and writes X.690 BER, and the DER subset, one
//! in-memory message at a time.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `asn1rt-core`: Error diagnostics, the decode arena, configuration and
//!   value types
//! - `asn1rt-ber`: Decode/encode buffers, the tag/length engine, primitive
//!   codecs and the DER canonicalizer
//!
//! # Usage
//!
//! ```rust
//! use asn1rt::{BerDecoder, BerEncoder, BerTag, DecodeTagging, MatchFlags, Tagging};
//!
//! let mut encoder = BerEncoder::new();
//! encoder.encode_constructed(BerTag::SEQUENCE, |enc| {
//!     let mut len = enc.encode_bool(true, Tagging::Explicit)?;
//!     len += enc.encode_i32(-129, Tagging::Explicit)?;
//!     Ok(len)
//! })?;
//! let message = encoder.into_message();
//! assert_eq!(&message[..], &[0x30, 0x07, 0x02, 0x02, 0xFF, 0x7F, 0x01, 0x01, 0xFF]);
//!
//! let mut decoder = BerDecoder::new();
//! decoder.setp(&message, 0)?;
//! let len = decoder.match_tag(BerTag::SEQUENCE, MatchFlags::ADVANCE)?;
//! let ctx = decoder.constructed_context(len);
//! assert_eq!(decoder.decode_i32(DecodeTagging::Explicit)?, -129);
//! assert!(decoder.decode_bool(DecodeTagging::Explicit)?);
//! assert!(decoder.check_end(&ctx));
//! # Ok::<(), asn1rt::CodecError>(())
//! ```

// Re-export core types
pub use asn1rt_core::datatypes::*;
pub use asn1rt_core::{
    Arena, ByteRef, CodecConfig, CodecError, CodecResult, ErrorKind, StackFrame, Traced,
};

// Re-export the BER engine
pub use asn1rt_ber::{
    BerDecoder, BerEncoder, BerLength, BerTag, BerTagClass, BufLocDescr, ConstructedContext,
    DecodeTagging, MatchFlags, Tagging,
};

/// Owned message type returned by [`BerEncoder::into_message`]
pub use bytes::Bytes;

pub mod buffer {
    pub use asn1rt_ber::buffer::*;
}

pub mod ber {
    pub use asn1rt_ber::ber::*;
}
