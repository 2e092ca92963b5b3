use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use reqwest::Url;

use super::types::{AppDetailsResponse, PriceOverview};
use crate::config::SteamConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use crate::external::price_source::PriceSource;
use crate::models::PriceQuote;

const APP_DETAILS_PATH: &str = "/api/appdetails";

/// Steam storefront price lookup via the public `appdetails` endpoint.
pub struct SteamStore {
    base_url: String,
    timeout: Duration,
}

impl SteamStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &SteamConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn make_error(message: impl Into<String>, source: Option<anyhow::Error>) -> AppError {
        AppError::ExternalApi {
            platform: "steam".into(),
            message: message.into(),
            source,
        }
    }

    fn app_details_url(&self, product_id: &str, region: &str) -> AppResult<Url> {
        let endpoint = format!("{}{}", self.base_url.trim_end_matches('/'), APP_DETAILS_PATH);
        Url::parse_with_params(
            &endpoint,
            &[
                ("appids", product_id),
                ("cc", region),
                ("filters", "price_overview"),
            ],
        )
        .map_err(|e| Self::make_error(format!("invalid store URL {}: {}", endpoint, e), Some(e.into())))
    }

    /// Extracts the price for `product_id` from a decoded `appdetails` body.
    fn quote_from_response(
        product_id: &str,
        region: &str,
        mut response: AppDetailsResponse,
    ) -> AppResult<PriceQuote> {
        let unavailable = || AppError::PriceUnavailable {
            product_id: product_id.to_string(),
            region: region.to_string(),
        };

        let entry = response.remove(product_id).ok_or_else(unavailable)?;
        if !entry.success {
            return Err(unavailable());
        }

        let Some(overview) = entry.data.get("price_overview") else {
            return Err(unavailable());
        };

        let overview: PriceOverview = serde_json::from_value(overview.clone()).map_err(|e| {
            Self::make_error(
                format!("appdetails({}) malformed price_overview: {}", product_id, e),
                Some(e.into()),
            )
        })?;

        if overview.final_price < 0 {
            return Err(Self::make_error(
                format!(
                    "appdetails({}) negative price: {}",
                    product_id, overview.final_price
                ),
                None,
            ));
        }

        // Storefront prices are integer subunits (grosze, cents)
        let price = BigDecimal::new(overview.final_price.into(), 2);
        let mut quote = PriceQuote::new(price).with_discount(overview.discount_percent);
        if let Some(currency) = overview.currency {
            quote = quote.with_currency(currency);
        }
        Ok(quote)
    }
}

#[async_trait]
impl PriceSource for SteamStore {
    fn name(&self) -> &'static str {
        "steam"
    }

    async fn fetch(&self, product_id: &str, region: &str) -> AppResult<PriceQuote> {
        let url = self.app_details_url(product_id, region)?;

        let resp = HTTP_CLIENT
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                Self::make_error(
                    format!("appdetails({}) request failed: {}", product_id, e),
                    Some(e.into()),
                )
            })?
            .error_for_status()
            .map_err(|e: reqwest::Error| {
                Self::make_error(
                    format!("appdetails({}) HTTP error: {}", product_id, e),
                    Some(e.into()),
                )
            })?;

        let body: AppDetailsResponse = resp.json().await.map_err(|e: reqwest::Error| {
            Self::make_error(
                format!("appdetails({}) invalid JSON: {}", product_id, e),
                Some(e.into()),
            )
        })?;

        Self::quote_from_response(product_id, region, body)
    }
}
