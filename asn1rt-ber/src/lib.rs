//! BER/DER codec engine for the ASN.1 runtime
//!
//! This crate provides the decode and encode buffers, the tag/length engine
//! and the primitive codecs that generated ASN.1 code calls into.

pub mod ber;
pub mod buffer;

pub use ber::{
    BerDecoder, BerEncoder, BerLength, BerTag, BerTagClass, BufLocDescr, ConstructedContext,
    DecodeTagging, MatchFlags, Tagging,
};
pub use buffer::{Checkpoint, DecodeBuffer, EncodeBuffer};
