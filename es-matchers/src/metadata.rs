use std::collections::BTreeMap;

use serde_json::{Map, Value};

const TIMESTAMP: &str = "timestamp";
const VALID_AT: &str = "valid_at";

/// Metadata attached to a published [`Event`](crate::Event).
///
/// - `timestamp`: when the event was stored, in nanoseconds since Unix epoch.
/// - `valid_at`: when the event becomes valid, in nanoseconds since Unix epoch.
/// - any number of free-form JSON entries.
///
/// Matchers never look at this type directly. They compare against
/// [`Metadata::to_map`], the plain key-value form, so two metadata values are
/// interchangeable whenever their maps are equal.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    timestamp: Option<u64>,
    valid_at: Option<u64>,
    entries: BTreeMap<String, Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, returning the updated metadata.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_timestamp(mut self, nanos: u64) -> Self {
        self.timestamp = Some(nanos);
        self.entries.remove(TIMESTAMP);
        self
    }

    pub fn with_valid_at(mut self, nanos: u64) -> Self {
        self.valid_at = Some(nanos);
        self.entries.remove(VALID_AT);
        self
    }

    /// Insert an entry.
    ///
    /// Unsigned integer `timestamp` and `valid_at` values land in their typed
    /// fields; any other value under those keys is kept as a plain entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let slot = match key.as_str() {
            TIMESTAMP => Some(&mut self.timestamp),
            VALID_AT => Some(&mut self.valid_at),
            _ => None,
        };
        match (slot, value.as_u64()) {
            (Some(slot), Some(nanos)) => {
                *slot = Some(nanos);
                self.entries.remove(&key);
            }
            (Some(slot), None) => {
                *slot = None;
                self.entries.insert(key, value);
            }
            (None, _) => {
                self.entries.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            TIMESTAMP if self.timestamp.is_some() => self.timestamp.map(Value::from),
            VALID_AT if self.valid_at.is_some() => self.valid_at.map(Value::from),
            _ => self.entries.get(key).cloned(),
        }
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    pub fn valid_at(&self) -> Option<u64> {
        self.valid_at
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_none() && self.valid_at.is_none() && self.entries.is_empty()
    }

    /// Coerce into a plain key-value mapping.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(nanos) = self.timestamp {
            map.insert(TIMESTAMP.to_owned(), Value::from(nanos));
        }
        if let Some(nanos) = self.valid_at {
            map.insert(VALID_AT.to_owned(), Value::from(nanos));
        }
        map
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in map {
            metadata.insert(key, value);
        }
        metadata
    }
}

impl From<Metadata> for Map<String, Value> {
    fn from(metadata: Metadata) -> Self {
        metadata.to_map()
    }
}

impl From<Metadata> for Value {
    fn from(metadata: Metadata) -> Self {
        Value::Object(metadata.to_map())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn typed_fields_show_up_in_map() {
        let metadata = Metadata::new()
            .with("request_id", "abc")
            .with_timestamp(42);

        assert_eq!(
            Value::Object(metadata.to_map()),
            json!({"request_id": "abc", "timestamp": 42})
        );
        assert_eq!(metadata.timestamp(), Some(42));
        assert_eq!(metadata.valid_at(), None);
    }

    #[test]
    fn integer_timestamp_entry_is_lifted() {
        let metadata = Metadata::new().with("timestamp", 7).with("valid_at", 9);
        assert_eq!(metadata.timestamp(), Some(7));
        assert_eq!(metadata.valid_at(), Some(9));
        assert_eq!(metadata.get("timestamp"), Some(json!(7)));
    }

    #[test]
    fn non_integer_timestamp_stays_an_entry() {
        let metadata = Metadata::new()
            .with_timestamp(1)
            .with("timestamp", "yesterday");
        assert_eq!(metadata.timestamp(), None);
        assert_eq!(metadata.to_map().get("timestamp"), Some(&json!("yesterday")));
    }

    #[test]
    fn representations_with_equal_maps_are_equal() {
        let typed = Metadata::new().with_timestamp(5).with("a", 1);
        let Value::Object(map) = json!({"a": 1, "timestamp": 5}) else {
            panic!("not an object");
        };
        let coerced = Metadata::from(map);
        assert_eq!(typed, coerced);
        assert_eq!(typed.to_map(), coerced.to_map());
    }

    #[test]
    fn empty_metadata() {
        assert!(Metadata::new().is_empty());
        assert!(Metadata::new().to_map().is_empty());
        assert!(!Metadata::new().with_valid_at(3).is_empty());
    }

    fn json_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<u64>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
        ]
    }

    proptest! {
        #[test]
        fn map_round_trips(entries in proptest::collection::btree_map(
            prop_oneof![Just("timestamp".to_owned()), Just("valid_at".to_owned()), "[a-z]{1,6}"],
            json_leaf(),
            0..6,
        )) {
            let map: Map<String, Value> = entries.into_iter().collect();
            prop_assert_eq!(Metadata::from(map.clone()).to_map(), map);
        }
    }
}
