use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// PriceStore contents: last observed price per item name, in major currency units.
pub type PriceBook = BTreeMap<String, BigDecimal>;

/// A price as reported by a price source, already normalised to major units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: BigDecimal,
    /// Storefront discount in percent, 0 when not on sale
    pub discount_percent: u32,
    /// ISO currency code when the source reports one
    pub currency: Option<String>,
}

impl PriceQuote {
    pub fn new(price: BigDecimal) -> Self {
        Self {
            price,
            discount_percent: 0,
            currency: None,
        }
    }

    pub fn with_discount(mut self, discount_percent: u32) -> Self {
        self.discount_percent = discount_percent;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}
