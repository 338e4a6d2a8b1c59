//! Decode and encode buffers
//!
//! [`DecodeBuffer`] reads forward through a borrowed message.
//! [`EncodeBuffer`] writes backward from the end of its storage.

pub mod decode;
pub mod encode;

pub use decode::{Checkpoint, DecodeBuffer};
pub use encode::EncodeBuffer;
