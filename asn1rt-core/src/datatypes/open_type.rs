//! Open type values
//!
//! An open type is a complete, already encoded TLV whose type is not known
//! to the codec. Decoding captures it into the arena as a [`ByteRef`];
//! encoding takes an [`OpenType`].

use crate::arena::{Arena, ByteRef};
use crate::error::CodecResult;
use bytes::Bytes;

/// Pre-encoded TLV to be emitted by the encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenType {
    /// Encoded bytes to be copied into the message
    Raw(Bytes),
    /// This many bytes were already written at the encode cursor; they are
    /// validated and counted but not copied again
    InPlace(usize),
}

impl OpenType {
    /// Copy a decoded open type out of the arena
    pub fn from_arena(arena: &Arena, handle: ByteRef) -> CodecResult<Self> {
        Ok(OpenType::Raw(Bytes::copy_from_slice(arena.get(handle)?)))
    }

    /// Number of encoded bytes
    pub fn len(&self) -> usize {
        match self {
            OpenType::Raw(bytes) => bytes.len(),
            OpenType::InPlace(len) => *len,
        }
    }

    /// Whether the value holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<u8>> for OpenType {
    fn from(bytes: Vec<u8>) -> Self {
        OpenType::Raw(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for OpenType {
    fn from(bytes: &'static [u8]) -> Self {
        OpenType::Raw(Bytes::from_static(bytes))
    }
}
