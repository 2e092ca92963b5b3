use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::PriceQuote;

/// Looks up the current price of a product in a region.
///
/// Implementations normalise currency subunits into major units and bound the
/// time a single call may take. Any failure to produce a usable price is
/// reported as `AppError::ExternalApi` or `AppError::PriceUnavailable`.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, product_id: &str, region: &str) -> AppResult<PriceQuote>;
}
