//! Key table records.
use adac_dictionary_std::{DataType, DictionaryEntry, Key, StandardDictionary};
use byteordered::ByteOrdered;
use std::io::Read;

/// A parsed key table record.
///
/// On disk, each record takes 6 bytes:
/// the key number (i16),
/// a nominal type code (u8),
/// an unused byte,
/// and the absolute file offset of the value (i16),
/// all in big endian.
///
/// The type code is not kept:
/// the dictionary is the only authority on a field's data type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct KeyEntry {
    /// the raw key number, which may not be known to the dictionary
    pub number: i16,
    /// the absolute file offset of the value
    pub offset: i16,
}

impl KeyEntry {
    /// Read a key table record from the given source.
    pub fn read_from<R>(source: R) -> std::io::Result<Self>
    where
        R: Read,
    {
        let mut source = ByteOrdered::be(source);
        let number = source.read_i16()?;
        let _type_code = source.read_u8()?;
        let _unused = source.read_u8()?;
        let offset = source.read_i16()?;
        Ok(KeyEntry { number, offset })
    }

    /// The known key of this record, if any.
    pub fn key(&self) -> Option<Key> {
        u16::try_from(self.number).ok().and_then(Key::from_number)
    }

    /// The dictionary entry of this record's key, if known.
    pub fn entry(&self) -> Option<&'static DictionaryEntry> {
        u16::try_from(self.number)
            .ok()
            .and_then(|n| StandardDictionary.by_number(n))
    }

    /// The declared data type of this record's key, if known.
    pub fn data_type(&self) -> Option<DataType> {
        self.entry().map(|e| e.data_type)
    }

    /// The offset of the value as an unsigned position,
    /// or `None` if it is negative.
    pub fn absolute_offset(&self) -> Option<usize> {
        usize::try_from(self.offset).ok()
    }
}
