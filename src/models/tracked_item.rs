use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A product under price surveillance, keyed by its user-chosen name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    /// Storefront identifier (Steam app id)
    #[serde(deserialize_with = "string_or_number")]
    pub product_id: String,

    /// Two-letter country code; `None` means the configured default region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Price at or below which a drop is announced as a deal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<BigDecimal>,
}

impl TrackedItem {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            region: None,
            threshold: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_threshold(mut self, threshold: BigDecimal) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Region to query, falling back to `default_region`
    pub fn region_or<'a>(&'a self, default_region: &'a str) -> &'a str {
        self.region.as_deref().unwrap_or(default_region)
    }
}

/// TrackedItemStore contents. Ordered by name so every run visits items in the
/// same order.
pub type TrackedItems = BTreeMap<String, TrackedItem>;

// Hand-edited files often carry Steam app ids as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
