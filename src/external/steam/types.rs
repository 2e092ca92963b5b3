use serde::Deserialize;
use std::collections::HashMap;

/// `appdetails` answers with one entry per requested app id.
pub(super) type AppDetailsResponse = HashMap<String, AppDetailsEntry>;

#[derive(Debug, Deserialize)]
pub(super) struct AppDetailsEntry {
    pub success: bool,
    /// An object for priced titles, `[]` for free ones
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct PriceOverview {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(rename = "final")]
    pub final_price: i64,
    #[serde(default)]
    pub discount_percent: u32,
}
