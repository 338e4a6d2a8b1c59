//! Wide character string handles
//!
//! BMPString (16-bit) and UniversalString (32-bit) values are decoded into
//! the arena as their raw big-endian content octets. The handles here expose
//! the code units without copying them into a separate array.

use crate::arena::{Arena, ByteRef};
use crate::error::CodecResult;

/// Decoded BMPString held by an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpStringRef(pub ByteRef);

impl BmpStringRef {
    /// Number of 16-bit characters
    pub fn len(&self, arena: &Arena) -> CodecResult<usize> {
        Ok(arena.get(self.0)?.len() / 2)
    }

    /// Whether the string holds no characters
    pub fn is_empty(&self, arena: &Arena) -> CodecResult<bool> {
        Ok(self.len(arena)? == 0)
    }

    /// Iterate the code units in order
    pub fn units<'a>(self, arena: &'a Arena) -> CodecResult<impl Iterator<Item = u16> + 'a> {
        let bytes = arena.get(self.0)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]])))
    }

    /// Collect the code units into a vector
    pub fn to_vec(&self, arena: &Arena) -> CodecResult<Vec<u16>> {
        Ok(self.units(arena)?.collect())
    }

    /// Convert to a `String`, replacing unpaired surrogates with U+FFFD
    pub fn to_string_lossy(&self, arena: &Arena) -> CodecResult<String> {
        Ok(char::decode_utf16(self.units(arena)?)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect())
    }
}

/// Decoded UniversalString held by an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniversalStringRef(pub ByteRef);

impl UniversalStringRef {
    /// Number of 32-bit characters
    pub fn len(&self, arena: &Arena) -> CodecResult<usize> {
        Ok(arena.get(self.0)?.len() / 4)
    }

    /// Whether the string holds no characters
    pub fn is_empty(&self, arena: &Arena) -> CodecResult<bool> {
        Ok(self.len(arena)? == 0)
    }

    /// Iterate the code units in order
    pub fn units<'a>(self, arena: &'a Arena) -> CodecResult<impl Iterator<Item = u32> + 'a> {
        let bytes = arena.get(self.0)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|quad| u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]])))
    }

    /// Collect the code units into a vector
    pub fn to_vec(&self, arena: &Arena) -> CodecResult<Vec<u32>> {
        Ok(self.units(arena)?.collect())
    }

    /// Convert to a `String`, replacing invalid scalar values with U+FFFD
    pub fn to_string_lossy(&self, arena: &Arena) -> CodecResult<String> {
        Ok(self
            .units(arena)?
            .map(|unit| char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmp_units() {
        let mut arena = Arena::new();
        let handle = arena.alloc_copy(&[0x00, 0x41, 0x04, 0x14, 0xD8, 0x00]).unwrap();
        let value = BmpStringRef(handle);
        assert_eq!(value.len(&arena).unwrap(), 3);
        assert_eq!(value.to_vec(&arena).unwrap(), vec![0x0041, 0x0414, 0xD800]);
        assert_eq!(value.to_string_lossy(&arena).unwrap(), "A\u{414}\u{FFFD}");
    }

    #[test]
    fn test_universal_units() {
        let mut arena = Arena::new();
        let handle = arena
            .alloc_copy(&[0x00, 0x01, 0xF6, 0x00, 0x00, 0x00, 0x00, 0x7A])
            .unwrap();
        let value = UniversalStringRef(handle);
        assert_eq!(value.len(&arena).unwrap(), 2);
        assert_eq!(value.to_string_lossy(&arena).unwrap(), "\u{1F600}z");
    }

    #[test]
    fn test_empty() {
        let mut arena = Arena::new();
        let value = BmpStringRef(arena.alloc(0).unwrap());
        assert!(value.is_empty(&arena).unwrap());
        assert_eq!(value.to_string_lossy(&arena).unwrap(), "");
    }
}
