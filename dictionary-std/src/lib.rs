//! This crate implements the standard ADAC header field dictionary
//! and the constants of the ADAC raw image layout.
//!
//! An ADAC header is made of a key table and a value region.
//! Each key table record names a field by its number (1 to 114),
//! and this dictionary is the only authority on
//! what that field is called, how it is typed,
//! and how many bytes its value occupies.
//!
//! - [`keys`] contains the [`Key`] enumeration
//!   and the static [`ENTRIES`](keys::ENTRIES) table,
//!   which map each key to its definition at compile time.
//! - [`data_element`] provides [`StandardDictionary`],
//!   a singleton lookup facade over the table,
//!   including a lazily built index by description.
//!
//! The table is immutable and can be shared freely across threads.
pub mod data_element;
pub mod keys;

pub use data_element::{registry, StandardDictionary, StandardDictionaryRegistry};
pub use keys::Key;

use std::fmt;

/// The literal preamble at the start of every ADAC file.
pub const PREAMBLE: &[u8; 6] = b"adac01";

/// The size of the key table region,
/// which is also the absolute position where the value region starts.
pub const LABEL_OFFSET: usize = 540;

/// The default absolute position of the pixel data,
/// which is also where the value region ends.
pub const IM_OFFSET: usize = 2048;

/// The number of keys known to the dictionary.
pub const NUM_KEYS: usize = 114;

/// The length in bytes of a single key table record.
pub const KEY_RECORD_LENGTH: usize = 6;

/// The length in bytes of the fixed part before the key table records:
/// preamble, label count, sub-header count and an unused byte.
pub const KEY_TABLE_START: usize = 10;

/// The maximum number of key table records which fit in the key table region.
pub const MAX_LABELS: usize = (LABEL_OFFSET - KEY_TABLE_START) / KEY_RECORD_LENGTH;

/// The sub-header count written by encoders for ordinary images.
pub const DEFAULT_SUBHEADER_COUNT: u8 = 2;

/// Size of the sub-header preceding the pixel data
/// for each gated interval of a reconstructed study.
pub const RECON_SUBHEADER_SIZE: usize = 128;

/// Size of the sub-header preceding the pixel data
/// for each gated interval of a SPECT projection study.
pub const SPECT_SUBHEADER_SIZE: usize = 1664;

/// A flat pixel data offset for gated studies
/// observed in one variant of the format.
///
/// Not used by the decoder, which scales the offset by the number of
/// gated intervals instead. Kept for files which disagree with that rule.
pub const FLAT_GATED_IMAGE_OFFSET: usize = 4096;

/// The value data type of a header field.
///
/// The in-file type byte of a key record is ignored:
/// the data type declared here is authoritative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Fixed length ASCII text, padded with NUL characters
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 32-bit IEEE 754 floating point number
    Float,
    /// The "program specific" block of extra key-value objects
    Extras,
}

impl DataType {
    /// The nominal type code written to a key table record.
    ///
    /// Text and extras blocks are both recorded as bytes.
    pub fn type_code(self) -> u8 {
        match self {
            DataType::Byte | DataType::Extras => 0,
            DataType::Short => 1,
            DataType::Int => 2,
            DataType::Float => 3,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataType::Byte => "BYTE",
            DataType::Short => "SHORT",
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::Extras => "EXTRAS",
        })
    }
}

/// The definition of an ADAC header field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DictionaryEntry {
    /// The key identifying the field
    pub key: Key,
    /// The human readable description,
    /// also used as the field name in header dumps
    pub description: &'static str,
    /// The declared data type of the value
    pub data_type: DataType,
    /// The fixed length of the value in bytes
    pub value_length: usize,
}

impl DictionaryEntry {
    /// The raw key number of this entry.
    #[inline]
    pub fn number(&self) -> u16 {
        self.key.number()
    }
}
