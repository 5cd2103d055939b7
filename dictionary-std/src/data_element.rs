//! Run-time lookup of ADAC header field definitions.
use crate::keys::{Key, ENTRIES};
use crate::{DataType, DictionaryEntry};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

static DICT: Lazy<StandardDictionaryRegistry> = Lazy::new(init_dictionary);

/// Retrieve a singleton instance of the standard dictionary registry.
///
/// Note that one does not generally have to call this
/// unless when retrieving the underlying registry is important.
/// The unit type [`StandardDictionary`]
/// already provides a lazy loaded singleton with the necessary methods.
#[inline]
pub fn registry() -> &'static StandardDictionaryRegistry {
    &DICT
}

/// The index over the static dictionary table.
///
/// Lookups by key are resolved directly in the table;
/// lookups by description go through this index.
#[derive(Debug)]
pub struct StandardDictionaryRegistry {
    /// mapping: description → entry
    by_description: HashMap<&'static str, &'static DictionaryEntry>,
}

impl StandardDictionaryRegistry {
    fn new() -> StandardDictionaryRegistry {
        StandardDictionaryRegistry {
            by_description: HashMap::with_capacity(ENTRIES.len()),
        }
    }

    /// record the given dictionary entry reference
    fn index(&mut self, entry: &'static DictionaryEntry) -> &mut Self {
        self.by_description.insert(entry.description, entry);
        self
    }
}

/// The standard ADAC header field dictionary.
///
/// This is a zero sized handle to the static table,
/// so it can be copied around and used from any thread.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardDictionary;

impl StandardDictionary {
    /// Fetch the definition of a known key.
    #[inline]
    pub fn by_key(&self, key: Key) -> &'static DictionaryEntry {
        key.entry()
    }

    /// Fetch the definition of a raw key number,
    /// if it is covered by the dictionary.
    pub fn by_number(&self, number: u16) -> Option<&'static DictionaryEntry> {
        Key::from_number(number).map(Key::entry)
    }

    /// Fetch an entry by its exact description (e.g. "X-dimensions").
    pub fn by_description(&self, description: &str) -> Option<&'static DictionaryEntry> {
        registry().by_description.get(description).copied()
    }

    /// The description of a field.
    #[inline]
    pub fn description(&self, key: Key) -> &'static str {
        key.entry().description
    }

    /// The declared data type of a field.
    #[inline]
    pub fn data_type(&self, key: Key) -> DataType {
        key.entry().data_type
    }

    /// The fixed value length of a field in bytes.
    #[inline]
    pub fn value_length(&self, key: Key) -> usize {
        key.entry().value_length
    }

    /// Iterate over all entries in key number order.
    pub fn iter(&self) -> impl Iterator<Item = &'static DictionaryEntry> {
        ENTRIES.iter()
    }
}

impl Display for StandardDictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str("Standard ADAC Header Dictionary")
    }
}

fn init_dictionary() -> StandardDictionaryRegistry {
    let mut d = StandardDictionaryRegistry::new();
    for entry in ENTRIES {
        d.index(entry);
    }
    d
}

#[cfg(test)]
mod tests {
    use super::StandardDictionary;
    use crate::{DataType, Key};

    // tests for just a few fields to make sure that the entries
    // were well installed into the crate
    #[test]
    fn smoke_test() {
        let dict = StandardDictionary;

        let entry = dict.by_description("X-dimensions").expect("should exist");
        assert_eq!(entry.key, Key::XDimensions);
        assert_eq!(entry.number(), 39);
        assert_eq!(entry.data_type, DataType::Short);
        assert_eq!(entry.value_length, 2);

        let entry = dict.by_number(46).expect("should exist");
        assert_eq!(entry.description, "Frame time");
        assert_eq!(entry.data_type, DataType::Int);

        assert_eq!(dict.description(Key::Zoom), "Zoom");
        assert_eq!(dict.data_type(Key::Zoom), DataType::Float);
        assert_eq!(dict.value_length(Key::PatientName), 20);
    }

    #[test]
    fn unknown_lookups() {
        let dict = StandardDictionary;
        assert!(dict.by_description("X-dimension").is_none());
        assert!(dict.by_description("").is_none());
        assert!(dict.by_number(0).is_none());
        assert!(dict.by_number(200).is_none());
    }

    #[test]
    fn description_index_covers_all_entries() {
        let dict = StandardDictionary;
        for entry in dict.iter() {
            assert_eq!(dict.by_description(entry.description), Some(entry));
        }
    }
}
