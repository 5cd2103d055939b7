//! Encoding of ADAC headers.
//!
//! A header is rebuilt from the text of a header dump
//! (see [`AdacHeader::dump`])
//! and the geometry of the pixel data which follows it.
//! Fields are laid out in key number order,
//! each one at a fixed position in the value region:
//! the cursor advances past the slot of every dictionary entry,
//! whether the field is written or not.
use crate::header::{AdacHeader, BitDepth};
use crate::log::{Logger, TracingLogger};
use crate::store::FieldStore;
use crate::{
    DimensionOutOfRangeSnafu, EncodeFieldSnafu, KeyTableOverflowSnafu,
    ValueRegionOverflowSnafu, WriteError, WriteFileSnafu, WriteHeaderSnafu,
    WriteKeyTableSnafu, WritePixelDataSnafu,
};
use adac_dictionary_std::keys::ENTRIES;
use adac_dictionary_std::{
    DictionaryEntry, Key, DEFAULT_SUBHEADER_COUNT, IM_OFFSET, KEY_TABLE_START, LABEL_OFFSET,
    MAX_LABELS, PREAMBLE,
};
use adac_encoding::{encode_value, FieldValue};
use byteordered::ByteOrdered;
use snafu::{ensure, OptionExt, ResultExt};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub type Result<T, E = WriteError> = std::result::Result<T, E>;

/// Separator between the description and the value in a dump line.
const DUMP_SEPARATOR: &str = " = ";

/// The geometry of the pixel data to be written after the header.
///
/// These values always take precedence over the ones in the dump.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EncodeGeometry {
    pub width: u16,
    pub height: u16,
    pub z_dim: u16,
    pub bit_depth: BitDepth,
}

impl EncodeGeometry {
    fn value_of(&self, key: Key) -> Option<Result<FieldValue>> {
        let dimension = |value: u16| {
            i16::try_from(value)
                .ok()
                .map(FieldValue::Short)
                .context(DimensionOutOfRangeSnafu {
                    key,
                    value: u32::from(value),
                })
        };
        match key {
            Key::XDimensions => Some(dimension(self.width)),
            Key::YDimensions => Some(dimension(self.height)),
            Key::ZDimensions => Some(dimension(self.z_dim)),
            Key::PixelBitDepth => Some(Ok(FieldValue::Short(self.bit_depth.bits()))),
            _ => None,
        }
    }
}

/// An encoded header, ready to be followed by pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedHeader {
    header: AdacHeader,
    bytes: Vec<u8>,
}

impl EncodedHeader {
    /// The header model of the fields written.
    pub fn header(&self) -> &AdacHeader {
        &self.header
    }

    /// The header bytes,
    /// including the padding up to the start of the pixel data.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// A builder of ADAC headers.
///
/// Unparseable numbers in the dump are reported to the logger
/// and written as 0.
///
/// # Example
///
/// ```
/// # use adac_object::{BitDepth, EncodeGeometry, Encoder};
/// let geometry = EncodeGeometry {
///     width: 64,
///     height: 64,
///     z_dim: 1,
///     bit_depth: BitDepth::Gray8,
/// };
/// let header = Encoder::new(geometry).encode_header("Patient name = DOE^JOHN")?;
/// assert_eq!(header.bytes().len(), 2048);
/// # Result::<(), adac_object::WriteError>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct Encoder<L = TracingLogger> {
    geometry: EncodeGeometry,
    logger: L,
}

impl Encoder {
    pub fn new(geometry: EncodeGeometry) -> Self {
        Encoder {
            geometry,
            logger: TracingLogger,
        }
    }
}

impl<L> Encoder<L>
where
    L: Logger,
{
    /// Set the logger for recoverable problems.
    pub fn logger<L2>(self, logger: L2) -> Encoder<L2>
    where
        L2: Logger,
    {
        Encoder {
            geometry: self.geometry,
            logger,
        }
    }

    /// Build the header bytes from the text of a header dump.
    ///
    /// Each line of the form `<description> = <value>`
    /// whose description matches a dictionary entry exactly
    /// provides the value of that field.
    /// Other lines are ignored.
    pub fn encode_header(&self, dump: &str) -> Result<EncodedHeader> {
        let lines = parse_dump(dump);

        let mut fields = FieldStore::new();
        let mut key_table: Vec<u8> = Vec::with_capacity(LABEL_OFFSET);
        let mut bytes = vec![0u8; IM_OFFSET];
        let mut cursor = LABEL_OFFSET;

        for entry in ENTRIES {
            let offset = cursor;
            cursor += entry.value_length;

            let value = match self.geometry.value_of(entry.key) {
                Some(value) => value?,
                None => match lines.get(entry.description) {
                    Some(text) => self.parse_value(entry, text),
                    None => continue,
                },
            };

            ensure!(cursor <= IM_OFFSET, ValueRegionOverflowSnafu { key: entry.key });
            let slot = encode_value(&value, entry).context(EncodeFieldSnafu { key: entry.key })?;
            bytes[offset..cursor].copy_from_slice(&slot);

            write_record(&mut key_table, entry, offset as i16).context(WriteKeyTableSnafu)?;

            fields.insert(entry.key, value);
        }

        let count = fields.len();
        ensure!(
            count <= MAX_LABELS,
            KeyTableOverflowSnafu {
                count,
                max: MAX_LABELS,
            }
        );

        bytes[..PREAMBLE.len()].copy_from_slice(PREAMBLE);
        bytes[6..8].copy_from_slice(&(count as i16).to_be_bytes());
        bytes[8] = DEFAULT_SUBHEADER_COUNT;
        bytes[KEY_TABLE_START..KEY_TABLE_START + key_table.len()].copy_from_slice(&key_table);

        let header = AdacHeader::from_fields(fields, DEFAULT_SUBHEADER_COUNT, &self.logger);
        // room for the sub-headers of gated studies
        let image_offset = usize::try_from(header.image_byte_offset()).unwrap_or(usize::MAX);
        bytes.resize(image_offset.max(IM_OFFSET), 0);

        Ok(EncodedHeader { header, bytes })
    }

    /// Write a complete ADAC file:
    /// the header, then the given pixel data.
    pub fn write_to<W>(&self, dump: &str, pixels: &[u8], mut to: W) -> Result<()>
    where
        W: Write,
    {
        let header = self.encode_header(dump)?;
        to.write_all(header.bytes()).context(WriteHeaderSnafu)?;
        to.write_all(pixels).context(WritePixelDataSnafu)?;
        to.flush().context(WritePixelDataSnafu)?;
        Ok(())
    }

    /// Write a complete ADAC file to the given path.
    pub fn write_to_file<P>(&self, dump: &str, pixels: &[u8], path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::create(path).context(WriteFileSnafu { filename: path })?;
        self.write_to(dump, pixels, BufWriter::new(file))
    }

    /// Encode a complete ADAC file into memory.
    pub fn to_vec(&self, dump: &str, pixels: &[u8]) -> Result<Vec<u8>> {
        let mut bytes = self.encode_header(dump)?.into_bytes();
        bytes.extend_from_slice(pixels);
        Ok(bytes)
    }

    fn parse_value(&self, entry: &DictionaryEntry, text: &str) -> FieldValue {
        FieldValue::from_text(entry.data_type, text).unwrap_or_else(|e| {
            self.logger
                .error("ADAC encoder", &format!("{} of {}, writing 0", e, entry.key));
            FieldValue::zero(entry.data_type)
        })
    }
}

/// Write a 6-byte key table record.
fn write_record<W>(to: W, entry: &DictionaryEntry, offset: i16) -> std::io::Result<()>
where
    W: Write,
{
    let mut to = ByteOrdered::be(to);
    to.write_i16(entry.number() as i16)?;
    to.write_u8(entry.data_type.type_code())?;
    // unused
    to.write_u8(0)?;
    to.write_i16(offset)
}

/// Collect the `<description> = <value>` lines of a dump.
///
/// A line with an empty value may have lost its trailing space.
fn parse_dump(dump: &str) -> HashMap<&str, &str> {
    dump.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter_map(|line| {
            line.split_once(DUMP_SEPARATOR)
                .or_else(|| line.strip_suffix(DUMP_SEPARATOR.trim_end()).map(|d| (d, "")))
        })
        .collect()
}
