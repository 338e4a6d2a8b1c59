//! Value types produced and consumed by the BER codec

pub mod big_int;
pub mod bit_string;
pub mod char_string;
pub mod object_id;
pub mod open_type;

// Re-export types
pub use big_int::{BigIntLiteral, Radix};
pub use bit_string::{BitString, BitStringRef};
pub use char_string::{BmpStringRef, UniversalStringRef};
pub use object_id::{ObjectId, MAX_SUBIDS};
pub use open_type::OpenType;
