//! In-memory store for service tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::repositories::KeyValueStore;

/// Mapping held in process memory. Counts saves so callers can assert on
/// write behaviour.
#[derive(Debug)]
pub struct MemoryStore<V> {
    entries: Mutex<BTreeMap<String, V>>,
    saves: Mutex<usize>,
}

impl<V: Clone> MemoryStore<V> {
    pub fn with_entries(entries: BTreeMap<String, V>) -> Self {
        Self {
            entries: Mutex::new(entries),
            saves: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, V> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or_default()
    }
}

fn poisoned(e: impl std::fmt::Display) -> AppError {
    AppError::Internal {
        source: anyhow::anyhow!("memory store lock poisoned: {}", e),
    }
}

impl<V: Clone + Send> KeyValueStore<V> for MemoryStore<V> {
    fn load(&self) -> AppResult<BTreeMap<String, V>> {
        Ok(self.entries.lock().map_err(poisoned)?.clone())
    }

    fn save(&self, entries: &BTreeMap<String, V>) -> AppResult<()> {
        *self.entries.lock().map_err(poisoned)? = entries.clone();
        *self.saves.lock().map_err(poisoned)? += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_replaces_entries_and_counts() {
        let store = MemoryStore::with_entries(BTreeMap::from([("a".to_string(), 1u32)]));
        assert_eq!(store.save_count(), 0);

        store
            .save(&BTreeMap::from([("b".to_string(), 2u32)]))
            .unwrap();

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap(), BTreeMap::from([("b".to_string(), 2u32)]));
        assert_eq!(store.snapshot(), store.load().unwrap());
    }
}
