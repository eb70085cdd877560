//! Most-recent-first list of searched cities, persisted on every change.

use crate::storage::KeyValueStore;

/// Storage key holding the serialized list
pub const HISTORY_KEY: &str = "citySearchHistory";

/// Maximum number of remembered cities
pub const HISTORY_CAPACITY: usize = 10;

/// Search history bound to one key of a `KeyValueStore`.
pub struct HistoryStore<S: KeyValueStore> {
    store: S,
    cities: Vec<String>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Read the persisted list. Missing, unreadable or malformed data starts
    /// an empty history.
    pub fn load(store: S) -> Self {
        let mut cities = match store.get(HISTORY_KEY) {
            Ok(Some(json)) => serde_json::from_str::<Vec<String>>(&json).unwrap_or_else(|e| {
                tracing::warn!("Discarding malformed search history: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read search history: {}", e);
                Vec::new()
            }
        };
        cities.truncate(HISTORY_CAPACITY);

        tracing::debug!("Loaded {} cities from search history", cities.len());
        Self { store, cities }
    }

    /// Put `city` at the front unless it is already present.
    ///
    /// Returns `false` (and leaves the list as is) for a duplicate. A failed
    /// write is logged; the in-memory list keeps the new entry.
    pub fn add(&mut self, city: impl Into<String>) -> bool {
        let city = city.into();
        if self.cities.iter().any(|c| *c == city) {
            return false;
        }

        self.cities.insert(0, city);
        self.cities.truncate(HISTORY_CAPACITY);
        self.persist();
        true
    }

    /// Cities, most recent first
    pub fn list(&self) -> &[String] {
        &self.cities
    }

    /// The city to show at startup
    pub fn most_recent(&self) -> Option<&str> {
        self.cities.first().map(String::as_str)
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.cities) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize search history: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(HISTORY_KEY, &json) {
            tracing::error!("Failed to save search history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteKeyValueStore;
    use skycast_core::StorageError;
    use std::collections::HashMap;

    /// Map-backed store that can be told to fail writes.
    #[derive(Default)]
    struct MapStore {
        values: HashMap<String, String>,
        fail_writes: bool,
        writes: usize,
    }

    impl KeyValueStore for MapStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes += 1;
            if self.fail_writes {
                return Err(StorageError::QueryFailed("disk full".into()));
            }
            self.values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn store_with(json: &str) -> MapStore {
        let mut store = MapStore::default();
        store.values.insert(HISTORY_KEY.to_string(), json.to_string());
        store
    }

    #[test]
    fn test_load_absent_is_empty() {
        let history = HistoryStore::load(MapStore::default());
        assert!(history.list().is_empty());
        assert_eq!(history.most_recent(), None);
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let history = HistoryStore::load(store_with("{not json"));
        assert!(history.list().is_empty());

        let history = HistoryStore::load(store_with("{\"a\": 1}"));
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_load_existing_list() {
        let history = HistoryStore::load(store_with("[\"Paris, FR\",\"Austin, US\"]"));
        assert_eq!(history.list(), ["Paris, FR", "Austin, US"]);
        assert_eq!(history.most_recent(), Some("Paris, FR"));
    }

    #[test]
    fn test_load_truncates_oversized_list() {
        let cities: Vec<String> = (0..15).map(|i| format!("City{}, XX", i)).collect();
        let history = HistoryStore::load(store_with(&serde_json::to_string(&cities).unwrap()));
        assert_eq!(history.list().len(), HISTORY_CAPACITY);
        assert_eq!(history.list()[0], "City0, XX");
    }

    #[test]
    fn test_add_twice_keeps_one_instance() {
        let mut history = HistoryStore::load(MapStore::default());

        assert!(history.add("Austin, US"));
        assert!(!history.add("Austin, US"));
        assert_eq!(history.list(), ["Austin, US"]);
    }

    #[test]
    fn test_duplicate_is_not_moved_to_front() {
        let mut history = HistoryStore::load(MapStore::default());
        history.add("Austin, US");
        history.add("Paris, FR");

        assert!(!history.add("Austin, US"));
        assert_eq!(history.list(), ["Paris, FR", "Austin, US"]);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let mut history = HistoryStore::load(MapStore::default());
        history.add("Austin, US");
        assert!(history.add("austin, US"));
        assert_eq!(history.list().len(), 2);
    }

    #[test]
    fn test_keeps_ten_most_recent() {
        let mut history = HistoryStore::load(MapStore::default());

        for i in 0..25 {
            assert!(history.add(format!("City{}, XX", i)));
            assert!(history.list().len() <= HISTORY_CAPACITY);

            let expected: Vec<String> = (0..=i)
                .rev()
                .take(HISTORY_CAPACITY)
                .map(|n| format!("City{}, XX", n))
                .collect();
            assert_eq!(history.list(), expected.as_slice());
        }
    }

    #[test]
    fn test_add_persists_full_list() {
        let mut history = HistoryStore::load(MapStore::default());
        history.add("Austin, US");
        history.add("Paris, FR");

        let stored = history.store.values.get(HISTORY_KEY).unwrap();
        let cities: Vec<String> = serde_json::from_str(stored).unwrap();
        assert_eq!(cities, vec!["Paris, FR", "Austin, US"]);
    }

    #[test]
    fn test_duplicate_does_not_write() {
        let mut history = HistoryStore::load(MapStore::default());
        history.add("Austin, US");
        history.add("Austin, US");
        assert_eq!(history.store.writes, 1);
    }

    #[test]
    fn test_failed_write_still_updates_list() {
        let store = MapStore {
            fail_writes: true,
            ..MapStore::default()
        };
        let mut history = HistoryStore::load(store);

        assert!(history.add("Austin, US"));
        assert_eq!(history.list(), ["Austin, US"]);
    }

    #[test]
    fn test_history_survives_reload_from_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        {
            let mut history = HistoryStore::load(SqliteKeyValueStore::open(&path).unwrap());
            history.add("Austin, US");
            history.add("Paris, FR");
        }

        let history = HistoryStore::load(SqliteKeyValueStore::open(&path).unwrap());
        assert_eq!(history.list(), ["Paris, FR", "Austin, US"]);
    }
}
