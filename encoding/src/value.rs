//! Header field values.
use crate::extras::ExtrasMap;
use adac_dictionary_std::DataType;
use snafu::{Backtrace, Snafu};
use std::fmt;

/// An error raised when the text form of a value
/// could not be interpreted as the field's data type.
#[derive(Debug, Snafu)]
pub enum ParseValueError {
    #[snafu(display("Could not parse `{}` as {}", text, data_type))]
    InvalidNumber {
        text: String,
        data_type: DataType,
        backtrace: Backtrace,
    },
}

/// The value of a single ADAC header field.
///
/// The variant always agrees with the data type
/// declared for the field in the dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Fixed length text, trailing NULs removed
    Text(String),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point number
    Float(f32),
    /// Extra objects of the program specific field
    Extras(ExtrasMap),
}

impl FieldValue {
    /// The data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            FieldValue::Text(_) => DataType::Byte,
            FieldValue::Short(_) => DataType::Short,
            FieldValue::Int(_) => DataType::Int,
            FieldValue::Float(_) => DataType::Float,
            FieldValue::Extras(_) => DataType::Extras,
        }
    }

    /// Interpret the text form of a value as the given data type.
    ///
    /// Numbers are trimmed before parsing.
    /// Text is taken as is.
    pub fn from_text(data_type: DataType, text: &str) -> Result<FieldValue, ParseValueError> {
        let fail = || InvalidNumberSnafu {
            text: text.to_string(),
            data_type,
        };
        let number = text.trim();
        match data_type {
            DataType::Byte => Ok(FieldValue::Text(text.to_string())),
            DataType::Short => number
                .parse()
                .map(FieldValue::Short)
                .map_err(|_| fail().build()),
            DataType::Int => number
                .parse()
                .map(FieldValue::Int)
                .map_err(|_| fail().build()),
            DataType::Float => number
                .parse()
                .map(FieldValue::Float)
                .map_err(|_| fail().build()),
            DataType::Extras => match text.parse::<ExtrasMap>() {
                Ok(map) => Ok(FieldValue::Extras(map)),
                Err(never) => match never {},
            },
        }
    }

    /// The zero value of the given data type.
    pub fn zero(data_type: DataType) -> FieldValue {
        match data_type {
            DataType::Byte => FieldValue::Text(String::new()),
            DataType::Short => FieldValue::Short(0),
            DataType::Int => FieldValue::Int(0),
            DataType::Float => FieldValue::Float(0.),
            DataType::Extras => FieldValue::Extras(ExtrasMap::new()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match self {
            FieldValue::Short(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_extras(&self) -> Option<&ExtrasMap> {
        match self {
            FieldValue::Extras(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Short(v) => write!(f, "{}", v),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{:?}", v),
            FieldValue::Extras(m) => write!(f, "{}", m),
        }
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        FieldValue::Short(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<ExtrasMap> for FieldValue {
    fn from(v: ExtrasMap) -> Self {
        FieldValue::Extras(v)
    }
}
