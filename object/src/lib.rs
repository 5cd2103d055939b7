//! This crate contains a high-level abstraction for reading and writing
//! the headers of ADAC raw image files.
//!
//! An ADAC header is decoded into an [`AdacHeader`],
//! which holds every known field found in the file
//! and computes the image geometry derived from them:
//! dimensions, number of images, pixel size,
//! and the byte offset where the pixel data starts.
//!
//! Loading a header can be done with ease via the function [`open_file`].
//! For additional reading options, use [`OpenFileOptions`].
//!
//! # Examples
//!
//! ```no_run
//! use adac_object::open_file;
//! # fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let header = open_file("study.adac")?;
//! println!(
//!     "{}x{} pixels, {} images starting at byte {}",
//!     header.width()?,
//!     header.height()?,
//!     header.number_of_images(),
//!     header.image_byte_offset(),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Headers can also be written back,
//! from the textual dump of another header
//! and the geometry of the pixel data to follow:
//!
//! ```no_run
//! # use adac_object::{open_file, BitDepth, EncodeGeometry, Encoder};
//! # fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let header = open_file("study.adac")?;
//! let geometry = EncodeGeometry {
//!     width: 128,
//!     height: 128,
//!     z_dim: 1,
//!     bit_depth: BitDepth::Gray16Signed,
//! };
//! let pixels = vec![0u8; 128 * 128 * 2];
//! Encoder::new(geometry).write_to_file(&header.dump(), &pixels, "copy.adac")?;
//! # Ok(())
//! # }
//! ```
//!
//! Problems which do not prevent decoding,
//! such as unknown keys or unparseable values,
//! are reported to a [`Logger`], which forwards them to `tracing` by default.
use adac_dictionary_std::Key;
use snafu::{Backtrace, Snafu};
use std::io::ErrorKind;

pub mod decode;
pub mod encode;
pub mod file;
pub mod header;
pub mod key_entry;
pub mod log;
pub mod scan;
pub mod store;

pub use crate::encode::{EncodeGeometry, EncodedHeader, Encoder};
pub use crate::file::{from_reader, open_file, OpenFileOptions};
pub use crate::header::{AdacHeader, BitDepth, ImageGeometry};
pub use crate::key_entry::KeyEntry;
pub use crate::log::{Logger, TracingLogger};
pub use crate::scan::{find_preambles, PreambleMatch};
pub use crate::store::FieldStore;

pub use adac_dictionary_std as dictionary_std;
pub use adac_encoding::{ExtrasMap, FieldValue};

/// An error which may occur when loading an ADAC header
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum ReadError {
    #[snafu(display("Could not open file '{}'", filename.display()))]
    OpenFile {
        filename: std::path::PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not read the key table region
    ReadKeyTable {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Invalid ADAC preamble {:?}", String::from_utf8_lossy(preamble)))]
    BadPreamble {
        preamble: [u8; 6],
        backtrace: Backtrace,
    },
    #[snafu(display("Invalid number of key table records {}", count))]
    InvalidLabelCount { count: i16, backtrace: Backtrace },
    #[snafu(display("Could not read key table record #{}", index))]
    ReadKeyEntry {
        index: usize,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not read the value region
    ReadValueRegion {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Offset {} of {} is outside of the value region", offset, key))]
    FieldOffsetOutOfRegion {
        key: Key,
        offset: i16,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not decode {}", key))]
    DecodeField {
        key: Key,
        #[snafu(backtrace)]
        source: adac_encoding::decode::Error,
    },
    #[snafu(display("Header does not describe a valid image"))]
    InvalidGeometry {
        #[snafu(backtrace)]
        source: AccessError,
    },
}

impl ReadError {
    /// Whether this error is caused by a structurally broken header:
    /// a bad preamble, a truncated file,
    /// a key table overflow, or a value outside of the value region.
    pub fn is_malformed_header(&self) -> bool {
        match self {
            ReadError::ReadKeyTable { source, .. }
            | ReadError::ReadKeyEntry { source, .. }
            | ReadError::ReadValueRegion { source, .. } => {
                source.kind() == ErrorKind::UnexpectedEof
            }
            ReadError::BadPreamble { .. }
            | ReadError::InvalidLabelCount { .. }
            | ReadError::FieldOffsetOutOfRegion { .. }
            | ReadError::DecodeField { .. } => true,
            ReadError::OpenFile { .. } | ReadError::InvalidGeometry { .. } => false,
        }
    }
}

/// An error which may occur when writing an ADAC header
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum WriteError {
    #[snafu(display("Could not write to file '{}'", filename.display()))]
    WriteFile {
        filename: std::path::PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display(
        "Too many fields for the key table ({} records, at most {})",
        count,
        max
    ))]
    KeyTableOverflow {
        count: usize,
        max: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("Value {} of {} is out of range", value, key))]
    DimensionOutOfRange {
        key: Key,
        value: u32,
        backtrace: Backtrace,
    },
    #[snafu(display("Value of {} does not fit in the value region", key))]
    ValueRegionOverflow { key: Key, backtrace: Backtrace },
    #[snafu(display("Could not encode {}", key))]
    EncodeField {
        key: Key,
        #[snafu(backtrace)]
        source: adac_encoding::encode::Error,
    },
    /// Could not write the key table
    WriteKeyTable {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not write the header bytes
    WriteHeader {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// Could not write the pixel data
    WritePixelData {
        backtrace: Backtrace,
        source: std::io::Error,
    },
}

/// An error which may occur when querying a required header field
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum AccessError {
    #[snafu(display("Missing required field {}", key))]
    MissingRequiredField { key: Key, backtrace: Backtrace },
    #[snafu(display("Invalid value {} for {}", value, key))]
    InvalidDimension {
        key: Key,
        value: i16,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = ReadError> = std::result::Result<T, E>;
