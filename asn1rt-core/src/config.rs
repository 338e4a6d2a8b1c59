//! Codec configuration
//!
//! # Usage Example
//!
//! ```rust
//! use asn1rt_core::config::CodecConfig;
//!
//! let config = CodecConfig::new()
//!     .encode_extent(4096)
//!     .max_encode_size(1 << 20)
//!     .arena_limit(64 * 1024);
//! assert_eq!(config.encode_extent, 4096);
//! ```

use serde::{Deserialize, Serialize};

/// Default growth step of a dynamic encode buffer
pub const DEFAULT_ENCODE_EXTENT: usize = 16 * 1024;

/// Default limit on constructed/indefinite nesting
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Runtime limits shared by decoders and encoders
///
/// All limits are checked before memory is touched, so a hostile message can
/// only cause an error, never an unbounded allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Minimum number of bytes added when a dynamic encode buffer grows
    pub encode_extent: usize,
    /// Upper bound on the size of a dynamic encode buffer (`None` = unbounded)
    pub max_encode_size: Option<usize>,
    /// Upper bound on live arena bytes during a decode (`None` = unbounded)
    pub arena_limit: Option<usize>,
    /// Maximum depth of nested constructed strings and indefinite-length
    /// sections
    pub max_nesting_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            encode_extent: DEFAULT_ENCODE_EXTENT,
            max_encode_size: None,
            arena_limit: None,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl CodecConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dynamic encode buffer growth step
    ///
    /// A zero extent is raised to one byte.
    pub fn encode_extent(mut self, extent: usize) -> Self {
        self.encode_extent = extent.max(1);
        self
    }

    /// Cap the dynamic encode buffer size
    pub fn max_encode_size(mut self, size: usize) -> Self {
        self.max_encode_size = Some(size);
        self
    }

    /// Cap the number of live arena bytes
    pub fn arena_limit(mut self, limit: usize) -> Self {
        self.arena_limit = Some(limit);
        self
    }

    /// Set the maximum nesting depth
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
