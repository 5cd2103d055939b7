//! The in-memory store of decoded header fields.
use adac_dictionary_std::{Key, NUM_KEYS};
use adac_encoding::FieldValue;

/// A set of header field values, indexed by key.
///
/// Each key holds at most one value.
/// The order in which keys were first inserted is retained,
/// so that header dumps follow the original key table.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStore {
    values: [Option<FieldValue>; NUM_KEYS],
    order: Vec<Key>,
}

impl Default for FieldStore {
    fn default() -> Self {
        FieldStore {
            values: std::array::from_fn(|_| None),
            order: Vec::new(),
        }
    }
}

impl FieldStore {
    /// Create an empty field store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the value of a field.
    #[inline]
    pub fn get(&self, key: Key) -> Option<&FieldValue> {
        self.values[key.index()].as_ref()
    }

    /// Whether the store has a value for the given key.
    #[inline]
    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace the value of a field,
    /// returning the previous value.
    ///
    /// A replaced field keeps its original position in the encounter order.
    pub fn insert(&mut self, key: Key, value: FieldValue) -> Option<FieldValue> {
        let old = self.values[key.index()].replace(value);
        if old.is_none() {
            self.order.push(key);
        }
        old
    }

    /// The number of fields with a value.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over the fields in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &FieldValue)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.get(key).map(|v| (key, v)))
    }

    /// Fetch a short value, if present.
    pub fn short(&self, key: Key) -> Option<i16> {
        self.get(key).and_then(FieldValue::as_short)
    }

    /// Fetch an int value, if present.
    pub fn int(&self, key: Key) -> Option<i32> {
        self.get(key).and_then(FieldValue::as_int)
    }

    /// Fetch a float value, if present.
    pub fn float(&self, key: Key) -> Option<f32> {
        self.get(key).and_then(FieldValue::as_float)
    }

    /// Fetch a text value, if present.
    pub fn text(&self, key: Key) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::FieldStore;
    use adac_dictionary_std::Key;
    use adac_encoding::FieldValue;

    #[test]
    fn insert_and_fetch() {
        let mut store = FieldStore::new();
        assert!(store.is_empty());
        store.insert(Key::YDimensions, FieldValue::Short(64));
        store.insert(Key::XDimensions, FieldValue::Short(128));
        store.insert(Key::Zoom, FieldValue::Float(1.5));

        assert_eq!(store.len(), 3);
        assert_eq!(store.short(Key::XDimensions), Some(128));
        assert_eq!(store.float(Key::Zoom), Some(1.5));
        assert_eq!(store.short(Key::Zoom), None);
        assert!(!store.contains(Key::PatientName));

        let keys: Vec<_> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Key::YDimensions, Key::XDimensions, Key::Zoom]);
    }

    #[test]
    fn replacing_keeps_position() {
        let mut store = FieldStore::new();
        store.insert(Key::PatientName, "A".into());
        store.insert(Key::PatientId, "1".into());
        let old = store.insert(Key::PatientName, "B".into());
        assert_eq!(old, Some(FieldValue::Text("A".to_string())));
        assert_eq!(store.len(), 2);
        let fields: Vec<_> = store.iter().collect();
        assert_eq!(fields[0], (Key::PatientName, &FieldValue::Text("B".to_string())));
    }
}
