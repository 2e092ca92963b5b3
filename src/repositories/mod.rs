//! Repository layer for the two persisted mappings.
//!
//! TrackedItemStore and PriceStore are persisted independently and may diverge
//! in key sets.

mod json_store;
#[cfg(test)]
mod memory;
mod traits;

pub use json_store::JsonFileStore;
#[cfg(test)]
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::config::StorageConfig;
use crate::models::TrackedItem;

pub type TrackedItemRepository = Arc<dyn KeyValueStore<TrackedItem>>;
pub type PriceRepository = Arc<dyn KeyValueStore<BigDecimal>>;

/// Aggregates both stores for convenient access.
#[derive(Clone)]
pub struct Repositories {
    pub tracked_items: TrackedItemRepository,
    pub prices: PriceRepository,
}

impl Repositories {
    pub fn new(tracked_items: TrackedItemRepository, prices: PriceRepository) -> Self {
        Self {
            tracked_items,
            prices,
        }
    }

    /// JSON file stores at the configured paths
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            Arc::new(JsonFileStore::<TrackedItem>::new(&config.tracked_items_path)),
            Arc::new(JsonFileStore::<BigDecimal>::new(&config.prices_path)),
        )
    }
}
