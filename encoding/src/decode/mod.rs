//! This module contains the field value decoding logic.
//!
//! A field value is fetched from the header's value region
//! at a given offset,
//! and interpreted according to the field's dictionary entry.

use crate::extras::ExtrasMap;
use crate::text::decode_text;
use crate::value::FieldValue;
use adac_dictionary_std::{DataType, DictionaryEntry};
use snafu::{ensure, Backtrace, ResultExt, Snafu};
use std::io::{self, Read};

pub mod basic;

pub use self::basic::BigEndianBasicDecoder;

/// Module-level error type:
/// for errors which may occur while decoding field values.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The value slot does not fit in the value region.
    #[snafu(display(
        "Value of {} bytes at offset {} exceeds the value region ({} bytes)",
        length,
        offset,
        available
    ))]
    ValueOutOfBounds {
        offset: usize,
        length: usize,
        available: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("Failed to read {} value: {}", data_type, source))]
    ReadValue {
        data_type: DataType,
        backtrace: Backtrace,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/** Type trait for reading and decoding basic data values from a data source.
 *
 * This trait aims to provide methods for reading binary numbers
 * of the header's byte order. It is not object safe,
 * and there is only one implementation in practice
 * ([`BigEndianBasicDecoder`]), since ADAC headers are always big endian.
 */
pub trait BasicDecode {
    /// Decode a signed short value from the given source.
    fn decode_ss<S>(&self, source: S) -> std::io::Result<i16>
    where
        S: Read;

    /// Decode a signed long value from the given source.
    fn decode_sl<S>(&self, source: S) -> std::io::Result<i32>
    where
        S: Read;

    /// Decode a single precision float value from the given source.
    fn decode_fl<S>(&self, source: S) -> std::io::Result<f32>
    where
        S: Read;
}

/// Decode the value of a field from the value region.
///
/// `offset` is the position of the value slot
/// relative to the start of `region`.
/// The slot length is the fixed value length declared in `entry`,
/// and the whole slot must lie inside the region.
pub fn decode_value(region: &[u8], offset: usize, entry: &DictionaryEntry) -> Result<FieldValue> {
    let length = entry.value_length;
    ensure!(
        offset
            .checked_add(length)
            .map(|end| end <= region.len())
            .unwrap_or(false),
        ValueOutOfBoundsSnafu {
            offset,
            length,
            available: region.len(),
        }
    );
    let slot = &region[offset..offset + length];
    let basic = BigEndianBasicDecoder;
    let data_type = entry.data_type;

    let value = match data_type {
        DataType::Byte => FieldValue::Text(decode_text(slot)),
        DataType::Short => basic
            .decode_ss(slot)
            .map(FieldValue::Short)
            .context(ReadValueSnafu { data_type })?,
        DataType::Int => basic
            .decode_sl(slot)
            .map(FieldValue::Int)
            .context(ReadValueSnafu { data_type })?,
        DataType::Float => basic
            .decode_fl(slot)
            .map(FieldValue::Float)
            .context(ReadValueSnafu { data_type })?,
        DataType::Extras => FieldValue::Extras(ExtrasMap::parse(slot)),
    };
    Ok(value)
}
