//! Bit string values

use crate::arena::{Arena, ByteRef};
use crate::error::{CodecError, CodecResult, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arbitrary string of bits (zeros and ones). A bit string value can have any length including zero.
///
/// Bits are numbered from the most significant bit of the first byte, as on
/// the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitString {
    #[serde(with = "serde_bytes")]
    bytes: Vec<u8>,
    num_bits: usize,
}

impl BitString {
    /// Construct a new bit string object.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The bits packed MSB-first
    /// * `num_bits` - The number of bits
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::BadValue`] if `num_bits > bytes.len() * 8`.
    pub fn new(bytes: Vec<u8>, num_bits: usize) -> CodecResult<Self> {
        if num_bits > bytes.len() * 8 {
            return Err(CodecError::new(ErrorKind::BadValue)
                .with_param(format!("{} bits in {} bytes", num_bits, bytes.len())));
        }

        Ok(Self { bytes, num_bits })
    }

    /// Create an empty bit string
    pub fn empty() -> Self {
        Self {
            bytes: Vec::new(),
            num_bits: 0,
        }
    }

    /// Get the bit string as byte array.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The number of bits in the byte array.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Get the bit at a specific position
    ///
    /// # Arguments
    /// * `index` - The bit index (0-based)
    ///
    /// # Returns
    /// * `true` if the bit is set, `false` otherwise
    /// * `Err` ([`ErrorKind::OutOfBounds`]) if the index is out of bounds
    pub fn get_bit(&self, index: usize) -> CodecResult<bool> {
        if index >= self.num_bits {
            return Err(CodecError::new(ErrorKind::OutOfBounds));
        }
        Ok(test_bit(&self.bytes, self.num_bits, index))
    }

    /// Set the bit at a specific position
    ///
    /// # Arguments
    /// * `index` - The bit index (0-based)
    /// * `value` - The value to set (true = 1, false = 0)
    pub fn set_bit(&mut self, index: usize, value: bool) -> CodecResult<()> {
        if index >= self.num_bits {
            return Err(CodecError::new(ErrorKind::OutOfBounds));
        }
        let byte_index = index / 8;
        let bit_index = 7 - (index % 8); // MSB first
        if value {
            self.bytes[byte_index] |= 1 << bit_index;
        } else {
            self.bytes[byte_index] &= !(1 << bit_index);
        }
        Ok(())
    }

    /// Number of bits up to and including the last set bit
    ///
    /// Trailing zero bits are not significant in a DER named-bit list.
    pub fn significant_bits(&self) -> usize {
        significant_bits(&self.bytes, self.num_bits)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.num_bits {
            let bit = test_bit(&self.bytes, self.num_bits, index);
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Test one bit of an MSB-first bit buffer; bits at or past `num_bits` read as zero
pub fn test_bit(bytes: &[u8], num_bits: usize, index: usize) -> bool {
    if index >= num_bits {
        return false;
    }
    bytes
        .get(index / 8)
        .is_some_and(|byte| byte & (0x80 >> (index % 8)) != 0)
}

/// Bit count with trailing zero bits removed
pub fn significant_bits(bytes: &[u8], mut num_bits: usize) -> usize {
    while num_bits > 0 && !test_bit(bytes, num_bits, num_bits - 1) {
        num_bits -= 1;
    }
    num_bits
}

/// Decoded bit string held by an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitStringRef {
    /// Packed bits
    pub bytes: ByteRef,
    /// Number of valid bits
    pub num_bits: usize,
}

impl BitStringRef {
    /// Copy the arena bytes into an owned [`BitString`]
    pub fn to_bit_string(&self, arena: &Arena) -> CodecResult<BitString> {
        BitString::new(arena.get(self.bytes)?.to_vec(), self.num_bits)
    }
}
