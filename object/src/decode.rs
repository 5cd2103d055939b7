//! Decoding of ADAC headers from a byte source.
//!
//! The header is read as two regions:
//! the key table region (the first 540 bytes)
//! and the value region (up to byte 2048).
//! Every key table record points to a value by its absolute file offset.
use crate::header::AdacHeader;
use crate::key_entry::KeyEntry;
use crate::log::Logger;
use crate::store::FieldStore;
use crate::{
    BadPreambleSnafu, DecodeFieldSnafu, FieldOffsetOutOfRegionSnafu, InvalidLabelCountSnafu,
    ReadKeyEntrySnafu, ReadKeyTableSnafu, ReadValueRegionSnafu, Result,
};
use adac_dictionary_std::{
    IM_OFFSET, KEY_RECORD_LENGTH, KEY_TABLE_START, LABEL_OFFSET, MAX_LABELS, PREAMBLE,
};
use adac_encoding::decode_value;
use byteordered::ByteOrdered;
use snafu::{ensure, OptionExt, ResultExt};
use std::io::Read;

/// Decode an ADAC header from the given source.
///
/// The source is consumed up to the end of the value region,
/// but no further:
/// gated sub-headers and pixel data are left unread.
///
/// Unknown keys are reported to the logger and skipped.
pub fn decode<R, L>(mut source: R, logger: &L) -> Result<AdacHeader>
where
    R: Read,
    L: Logger + ?Sized,
{
    let mut key_table = [0u8; LABEL_OFFSET];
    source.read_exact(&mut key_table).context(ReadKeyTableSnafu)?;

    let mut preamble = [0u8; 6];
    preamble.copy_from_slice(&key_table[..PREAMBLE.len()]);
    ensure!(&preamble == PREAMBLE, BadPreambleSnafu { preamble });

    let mut fixed = ByteOrdered::be(&key_table[PREAMBLE.len()..KEY_TABLE_START]);
    let label_count = fixed.read_i16().context(ReadKeyTableSnafu)?;
    let subheader_count = fixed.read_u8().context(ReadKeyTableSnafu)?;
    let label_count = usize::try_from(label_count)
        .ok()
        .filter(|&count| count <= MAX_LABELS)
        .context(InvalidLabelCountSnafu { count: label_count })?;

    let mut value_region = vec![0u8; IM_OFFSET - LABEL_OFFSET];
    source
        .read_exact(&mut value_region)
        .context(ReadValueRegionSnafu)?;

    let mut fields = FieldStore::new();
    for index in 0..label_count {
        let start = KEY_TABLE_START + index * KEY_RECORD_LENGTH;
        let record = KeyEntry::read_from(&key_table[start..start + KEY_RECORD_LENGTH])
            .context(ReadKeyEntrySnafu { index })?;

        let (key, entry) = match record.key() {
            Some(key) => (key, key.entry()),
            None => {
                logger.log(&format!(
                    "Unknown key {} in key table record #{}, skipping",
                    record.number, index
                ));
                continue;
            }
        };

        let offset = record
            .absolute_offset()
            .and_then(|offset| offset.checked_sub(LABEL_OFFSET))
            .context(FieldOffsetOutOfRegionSnafu {
                key,
                offset: record.offset,
            })?;
        let value =
            decode_value(&value_region, offset, entry).context(DecodeFieldSnafu { key })?;

        if fields.insert(key, value).is_some() {
            logger.log(&format!("Duplicate {}, keeping the last value", key));
        }
    }

    Ok(AdacHeader::from_fields(fields, subheader_count, logger))
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::log::testing::RecordingLogger;
    use crate::log::TracingLogger;
    use crate::ReadError;
    use adac_dictionary_std::Key;
    use adac_encoding::FieldValue;

    /// Build a header with the given records (key, offset) and value bytes.
    fn build(records: &[(i16, i16)], values: &[(usize, &[u8])]) -> Vec<u8> {
        let mut data = vec![0u8; 2048];
        data[..6].copy_from_slice(b"adac01");
        data[6..8].copy_from_slice(&(records.len() as i16).to_be_bytes());
        data[8] = 2;
        for (i, (key, offset)) in records.iter().enumerate() {
            let start = 10 + i * 6;
            data[start..start + 2].copy_from_slice(&key.to_be_bytes());
            data[start + 4..start + 6].copy_from_slice(&offset.to_be_bytes());
        }
        for (offset, bytes) in values {
            data[*offset..*offset + bytes.len()].copy_from_slice(bytes);
        }
        data
    }

    #[test]
    fn decode_minimal_header() {
        let data = build(
            &[(39, 540), (40, 542), (17, 544), (46, 546)],
            &[
                (540, &[0x00, 0x80]),
                (542, &[0x00, 0x40]),
                (544, b"ST"),
                (546, &1000i32.to_be_bytes()),
            ],
        );
        let header = decode(&data[..], &TracingLogger).unwrap();
        assert_eq!(header.width().unwrap(), 128);
        assert_eq!(header.height().unwrap(), 64);
        assert_eq!(header.data_type_code(), Some("ST"));
        assert!(!header.is_gated());
        assert_eq!(header.frame_interval_seconds(), 1.);
        assert_eq!(header.subheader_count(), 2);
        assert_eq!(header.fields().len(), 4);
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let data = build(&[(200, 540), (39, 600), (0, 540)], &[(600, &[0x01, 0x00])]);
        let logger = RecordingLogger::default();
        let header = decode(&data[..], &logger).unwrap();
        assert_eq!(header.width().unwrap(), 256);
        assert_eq!(header.fields().len(), 1);
        assert_eq!(logger.messages.borrow().len(), 2);
    }

    #[test]
    fn bad_preamble() {
        let mut data = build(&[], &[]);
        data[..6].copy_from_slice(b"adac02");
        let err = decode(&data[..], &TracingLogger).unwrap_err();
        assert!(matches!(err, ReadError::BadPreamble { .. }));
        assert!(err.is_malformed_header());
    }

    #[test]
    fn truncated_input() {
        let data = build(&[(39, 540)], &[]);
        let err = decode(&data[..300], &TracingLogger).unwrap_err();
        assert!(matches!(err, ReadError::ReadKeyTable { .. }));
        assert!(err.is_malformed_header());

        let err = decode(&data[..1000], &TracingLogger).unwrap_err();
        assert!(matches!(err, ReadError::ReadValueRegion { .. }));
        assert!(err.is_malformed_header());
    }

    #[test]
    fn key_table_overflow() {
        let mut data = build(&[], &[]);
        data[6..8].copy_from_slice(&89i16.to_be_bytes());
        let err = decode(&data[..], &TracingLogger).unwrap_err();
        assert!(matches!(err, ReadError::InvalidLabelCount { count: 89, .. }));

        data[6..8].copy_from_slice(&(-1i16).to_be_bytes());
        let err = decode(&data[..], &TracingLogger).unwrap_err();
        assert!(err.is_malformed_header());
    }

    #[test]
    fn value_outside_region() {
        // offset inside the key table region
        let data = build(&[(39, 100)], &[]);
        let err = decode(&data[..], &TracingLogger).unwrap_err();
        assert!(matches!(err, ReadError::FieldOffsetOutOfRegion { .. }));
        assert!(err.is_malformed_header());

        // float slot running past the end of the value region
        let data = build(&[(44, 2046)], &[]);
        let err = decode(&data[..], &TracingLogger).unwrap_err();
        assert!(matches!(
            err,
            ReadError::DecodeField {
                key: Key::Zoom,
                ..
            }
        ));
        assert!(err.is_malformed_header());
    }

    #[test]
    fn gated_reconstruction_header() {
        let data = build(
            &[(17, 540), (61, 542), (88, 544), (41, 546)],
            &[
                (540, b"GE"),
                (542, &[0x00, 0x10]),
                (544, &[0x00, 0x01]),
                (546, &[0x00, 0x0A]),
            ],
        );
        let header = decode(&data[..], &TracingLogger).unwrap();
        assert!(header.is_gated());
        assert!(header.is_reconstruction());
        assert_eq!(header.intervals(), 16);
        assert_eq!(header.image_byte_offset(), 4096);
        assert_eq!(header.number_of_images(), 160);
    }

    #[test]
    fn extras_with_calibration() {
        let mut block = b"CALB\x000.625\0".to_vec();
        block.resize(800, 0);
        let data = build(
            &[(39, 540), (40, 542), (44, 544), (114, 548)],
            &[
                (540, &[0x00, 0x80]),
                (542, &[0x00, 0x80]),
                (544, &1f32.to_be_bytes()),
                (548, &block),
            ],
        );
        let header = decode(&data[..], &TracingLogger).unwrap();
        assert_eq!(header.calibration_factor(), 0.625);
        assert_eq!(header.pixel_size_mm(), 5.);
        assert!(matches!(
            header.get(Key::ProgramSpecific),
            Some(FieldValue::Extras(_))
        ));
    }

    #[test]
    fn trailing_data_is_not_read() {
        let mut data = build(&[], &[]);
        data.extend_from_slice(&[0xAB; 64]);
        let mut source = &data[..];
        decode(&mut source, &TracingLogger).unwrap();
        assert_eq!(source.len(), 64);
    }
}
