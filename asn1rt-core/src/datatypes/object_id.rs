//! Object identifier values

use crate::error::{CodecError, CodecResult, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of sub-identifiers in an object identifier
pub const MAX_SUBIDS: usize = 128;

/// OBJECT IDENTIFIER / RELATIVE-OID value
///
/// Holds up to [`MAX_SUBIDS`] unsigned 32-bit arcs. The absolute-OID rules
/// (first arc at most 2, second arc at most 39 under arcs 0 and 1) are
/// checked by [`ObjectId::validate_absolute`] when encoding, not here, so the
/// same type can carry relative OIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId {
    subids: Vec<u32>,
}

impl ObjectId {
    /// Create an object identifier from its arcs
    ///
    /// # Errors
    /// [`ErrorKind::InvalidObjectId`] if more than [`MAX_SUBIDS`] arcs are given.
    pub fn new(subids: Vec<u32>) -> CodecResult<Self> {
        if subids.len() > MAX_SUBIDS {
            return Err(CodecError::new(ErrorKind::InvalidObjectId));
        }
        Ok(Self { subids })
    }

    /// Arcs in order
    pub fn subids(&self) -> &[u32] {
        &self.subids
    }

    /// Number of arcs
    pub fn len(&self) -> usize {
        self.subids.len()
    }

    /// Whether there are no arcs
    pub fn is_empty(&self) -> bool {
        self.subids.is_empty()
    }

    /// Check the X.690 rules for an absolute OID
    ///
    /// At least two arcs, the first at most 2, and the second at most 39
    /// unless the first is 2.
    pub fn validate_absolute(&self) -> CodecResult<()> {
        match self.subids.as_slice() {
            [first, second, ..] if *first <= 2 && (*first == 2 || *second <= 39) => Ok(()),
            _ => Err(CodecError::new(ErrorKind::InvalidObjectId)),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, subid) in self.subids.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", subid)?;
        }
        Ok(())
    }
}

impl FromStr for ObjectId {
    type Err = CodecError;

    /// Parse dotted notation such as `1.2.840.113549`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let subids = s
            .split('.')
            .map(|arc| {
                arc.parse::<u32>()
                    .map_err(|_| CodecError::new(ErrorKind::InvalidObjectId).with_param(s))
            })
            .collect::<CodecResult<Vec<u32>>>()?;
        Self::new(subids)
    }
}

impl TryFrom<&[u32]> for ObjectId {
    type Error = CodecError;

    fn try_from(subids: &[u32]) -> Result<Self, Self::Error> {
        Self::new(subids.to_vec())
    }
}
