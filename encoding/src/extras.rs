//! ADAC "extra" objects.
//!
//! The "program specific" header field holds a second,
//! informal key-value format of its own.
//! Each record is made of a 4 character alphanumeric key,
//! one separator byte,
//! and a value in ASCII text terminated by a NUL byte:
//!
//! ```text
//! C A L B \0 0 . 6 2 5 \0 W L A A \0 1 2 3 4 \0 \0 \0 ...
//! ```
//!
//! DICOM worklist data and the pixel calibration factor are stored here.
use crate::text::{decode_text, encode_latin1};
use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;
use tracing::warn;

/// Calibration factor: the size in mm of a pixel
/// if the image were acquired on a 1024 square matrix.
pub const CALIBRATION_FACTOR: &str = "CALB";
/// Patient name (long)
pub const LONG_PATIENT_NAME: &str = "WLAG";
/// Patient ID (long)
pub const LONG_PATIENT_ID: &str = "WLAH";
/// Study Instance UID
pub const STUDY_INSTANCE_UID: &str = "WLAS";
/// Accession number
pub const ACCESSION_NUMBER: &str = "WLAA";
/// Patient dose(s)
pub const DOSE: &str = "DOSE";
/// Detector heads
pub const DETECTOR_HEADS: &str = "HADS";
/// DICOM study date
pub const STUDY_DATE: &str = "WLAY";
/// Study description
pub const STUDY_DESCRIPTION: &str = "WLBB";
/// Application entity title
pub const APPLICATION_ENTITY_TITLE: &str = "WLBD";
/// Scheduled procedure step ID
pub const SCHEDULED_PROCEDURE_STEP_ID: &str = "WLBC";
/// Requested procedure ID
pub const REQUESTED_PROCEDURE_ID: &str = "WLBT";

/// The extra object keys with a known meaning, and their descriptions.
pub static KNOWN_EXTRAS: &[(&str, &str)] = &[
    (CALIBRATION_FACTOR, "Calibration factor"),
    (LONG_PATIENT_NAME, "Patient name (long)"),
    (LONG_PATIENT_ID, "Patient ID (long)"),
    (STUDY_INSTANCE_UID, "Study Instance UID"),
    (ACCESSION_NUMBER, "Accession number"),
    (DOSE, "Patient dose(s)"),
    (DETECTOR_HEADS, "Detector heads"),
    (STUDY_DATE, "Dicom study date"),
    (STUDY_DESCRIPTION, "Study description"),
    (APPLICATION_ENTITY_TITLE, "Application entity title"),
    (SCHEDULED_PROCEDURE_STEP_ID, "Scheduled procedure step ID"),
    (REQUESTED_PROCEDURE_ID, "Requested procedure ID"),
];

/// Retrieve the description of a known extra object key.
pub fn describe(key: &str) -> Option<&'static str> {
    KNOWN_EXTRAS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, desc)| *desc)
}

const KEY_LENGTH: usize = 4;
/// key, separator, and at least one more byte
const MIN_RECORD_LENGTH: usize = KEY_LENGTH + 2;

/// Record separator in the single line text form.
const TEXT_SEPARATOR: char = '|';
/// Escapes a separator or itself in the single line text form.
const TEXT_ESCAPE: char = '\\';

#[inline]
fn is_valid_key(key: &[u8]) -> bool {
    key.len() == KEY_LENGTH && key.iter().all(u8::is_ascii_alphanumeric)
}

/// An ordered collection of extra objects, keyed by their 4 character token.
///
/// Records are kept in the order in which they were found.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtrasMap {
    entries: Vec<(String, String)>,
}

impl ExtrasMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the extra objects in a "program specific" block.
    ///
    /// Scanning stops at the first candidate key which is not made of
    /// alphanumeric characters, or when too few bytes remain for a record.
    /// This is the normal end of data:
    /// the tail of the block is usually NUL padding.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut map = ExtrasMap::new();
        let mut pos = 0;
        while bytes.len() - pos >= MIN_RECORD_LENGTH {
            let key = &bytes[pos..pos + KEY_LENGTH];
            if !is_valid_key(key) {
                break;
            }
            // skip the key and the separator byte
            let start = pos + KEY_LENGTH + 1;
            let end = bytes[start..]
                .iter()
                .position(|&b| b == 0)
                .map(|i| start + i)
                .unwrap_or(bytes.len());
            let key = String::from_utf8_lossy(key).into_owned();
            map.insert(key, decode_text(&bytes[start..end]));
            pos = (end + 1).min(bytes.len());
        }
        map
    }

    /// Retrieve the value of an extra object.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the map contains the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert an extra object, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Iterate over all key-value pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the calibration factor,
    /// or `None` if the map does not have one.
    pub fn try_calibration_factor(&self) -> Option<Result<f32, ParseFloatError>> {
        self.get(CALIBRATION_FACTOR)
            .map(|v| v.trim().parse::<f32>())
    }

    /// The calibration factor,
    /// which is 0 when absent or not a valid number.
    pub fn calibration_factor(&self) -> f32 {
        match self.try_calibration_factor() {
            Some(Ok(v)) => v,
            _ => 0.,
        }
    }

    /// Encode the extra objects into a block of exactly `len` bytes.
    ///
    /// Each record is written with a NUL separator.
    /// Records which do not fit entirely are left out.
    pub fn to_bytes(&self, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        for (key, value) in &self.entries {
            let value = encode_latin1(value);
            let record_len = KEY_LENGTH + 1 + value.len() + 1;
            if out.len() + record_len > len {
                warn!("Extra object {} does not fit in the program specific block", key);
                break;
            }
            out.extend_from_slice(key.as_bytes());
            out.push(0);
            out.extend_from_slice(&value);
            out.push(0);
        }
        out.resize(len, 0);
        out
    }
}

/// Split the single line text form into records,
/// resolving escaped separators.
///
/// An escape character at the very end is kept as is.
fn split_records(s: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            TEXT_ESCAPE => current.push(chars.next().unwrap_or(TEXT_ESCAPE)),
            TEXT_SEPARATOR => records.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    records.push(current);
    records
}

/// Single line text form: `KEY=value|KEY=value`.
///
/// Separators and escape characters in values are preceded by `\`.
impl fmt::Display for ExtrasMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", TEXT_SEPARATOR)?;
            }
            write!(f, "{}=", key)?;
            for c in value.chars() {
                if c == TEXT_SEPARATOR || c == TEXT_ESCAPE {
                    write!(f, "{}", TEXT_ESCAPE)?;
                }
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Parse the single line text form.
///
/// Records without a valid 4 character key are ignored.
impl FromStr for ExtrasMap {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut map = ExtrasMap::new();
        for record in split_records(s).iter().filter(|r| !r.trim().is_empty()) {
            match record.split_once('=') {
                Some((key, value)) if is_valid_key(key.trim().as_bytes()) => {
                    map.insert(key.trim(), value);
                }
                _ => warn!("Ignoring malformed extra object `{}`", record),
            }
        }
        Ok(map)
    }
}

impl<K, V> FromIterator<(K, V)> for ExtrasMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = ExtrasMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
