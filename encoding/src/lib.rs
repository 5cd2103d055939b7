//! ADAC header encoding and decoding primitives.
//!
//! This crate provides the type-directed codecs for the values
//! stored in an ADAC header's value region:
//!
//! - [`decode`] reads a field value out of the value region,
//!   given its position and its dictionary entry;
//! - [`encode`] turns a field value back into its fixed-width slot;
//! - [`extras`] parses and builds the key-value objects
//!   nested in the "program specific" field;
//! - [`text`] handles the fixed length, NUL padded text fields.
//!
//! All multi-byte numbers in the format are big endian.
//! For the time being, all APIs are based on synchronous I/O.

pub mod decode;
pub mod encode;
pub mod extras;
pub mod text;
pub mod value;

pub use decode::decode_value;
pub use encode::encode_value;
pub use extras::ExtrasMap;
pub use value::FieldValue;
