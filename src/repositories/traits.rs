//! KeyValueStore trait definition.

use std::collections::BTreeMap;

use crate::error::AppResult;

/// Durable name → value mapping, read once at the start of a run and written at
/// most once at the end.
///
/// `load` of a store that does not exist yet returns an empty mapping. `save`
/// replaces the whole mapping; implementations must never leave a partially
/// written store behind.
pub trait KeyValueStore<V>: Send + Sync {
    fn load(&self) -> AppResult<BTreeMap<String, V>>;

    fn save(&self, entries: &BTreeMap<String, V>) -> AppResult<()>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}
