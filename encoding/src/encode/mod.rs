//! This module contains the field value encoding logic.
//!
//! Every field is written to a slot of the fixed length
//! declared in its dictionary entry.
//! Text is truncated or NUL padded to fit,
//! and the program specific block keeps only the extra objects
//! which fit in it entirely.
use crate::value::FieldValue;
use adac_dictionary_std::{DataType, DictionaryEntry};
use snafu::{ensure, Backtrace, ResultExt, Snafu};
use std::io::{self, Write};

pub mod basic;

pub use self::basic::BigEndianBasicEncoder;

/// Module-level error type:
/// for errors which may occur while encoding field values.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The value given does not have the field's declared type.
    #[snafu(display(
        "Cannot encode {} value into {} field `{}`",
        actual,
        expected,
        description
    ))]
    TypeMismatch {
        description: &'static str,
        expected: DataType,
        actual: DataType,
        backtrace: Backtrace,
    },
    #[snafu(display("Failed to write {} value: {}", data_type, source))]
    WriteValue {
        data_type: DataType,
        backtrace: Backtrace,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Type trait for encoding basic data values to a data sink.
///
/// Mirrors [`BasicDecode`](crate::decode::BasicDecode).
pub trait BasicEncode {
    /// Encode a signed short value to the given writer.
    fn encode_ss<W>(&self, to: W, value: i16) -> io::Result<()>
    where
        W: Write;

    /// Encode a signed long value to the given writer.
    fn encode_sl<W>(&self, to: W, value: i32) -> io::Result<()>
    where
        W: Write;

    /// Encode a single precision float value to the given writer.
    fn encode_fl<W>(&self, to: W, value: f32) -> io::Result<()>
    where
        W: Write;
}

/// Encode a field value into a slot of exactly `entry.value_length` bytes.
///
/// Fails if the value's type does not agree with the entry.
pub fn encode_value(value: &FieldValue, entry: &DictionaryEntry) -> Result<Vec<u8>> {
    let data_type = entry.data_type;
    ensure!(
        value.data_type() == data_type,
        TypeMismatchSnafu {
            description: entry.description,
            expected: data_type,
            actual: value.data_type(),
        }
    );

    let len = entry.value_length;
    let basic = BigEndianBasicEncoder;
    let mut out = Vec::with_capacity(len);
    match value {
        FieldValue::Text(text) => out = crate::text::encode_text(text, len),
        FieldValue::Extras(map) => out = map.to_bytes(len),
        FieldValue::Short(v) => basic
            .encode_ss(&mut out, *v)
            .context(WriteValueSnafu { data_type })?,
        FieldValue::Int(v) => basic
            .encode_sl(&mut out, *v)
            .context(WriteValueSnafu { data_type })?,
        FieldValue::Float(v) => basic
            .encode_fl(&mut out, *v)
            .context(WriteValueSnafu { data_type })?,
    }
    // numbers already have their natural width,
    // this only matters for unusually declared lengths
    out.resize(len, 0);
    Ok(out)
}
