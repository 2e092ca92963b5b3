//! Reconciliation engine.
//!
//! Merges freshly fetched prices with the last persisted ones, classifies every
//! transition and assembles a single report. Fetch failures are isolated per
//! item: the item gets an "unavailable" line and its saved price is carried
//! forward untouched.

use std::fmt;

use bigdecimal::BigDecimal;
use futures::stream::{self, StreamExt};

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::PriceSource;
use crate::models::{PriceBook, PriceQuote, TrackedItem, TrackedItems};

/// Report text for a run with nothing to check.
pub const NO_ITEMS_TRACKED: &str = "No items tracked";

/// Engine settings, resolved from configuration once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    pub default_region: String,
    pub fetch_concurrency: usize,
    pub prune_orphans: bool,
}

impl ReconcilerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            default_region: settings.steam.default_region.clone(),
            fetch_concurrency: settings.steam.fetch_concurrency,
            prune_orphans: settings.reconciliation.prune_orphans,
        }
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            default_region: "PL".to_string(),
            fetch_concurrency: 1,
            prune_orphans: false,
        }
    }
}

/// How an item's price moved since the last run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceChange {
    FirstObservation,
    /// `crossed_threshold` is true when no threshold is set or the new price
    /// is at or below it
    Decrease { crossed_threshold: bool },
    Increase,
    Unchanged,
    Unavailable,
}

impl PriceChange {
    /// Classifies a successfully fetched price. The threshold only matters
    /// for decreases.
    pub fn classify(
        previous: Option<&BigDecimal>,
        current: &BigDecimal,
        threshold: Option<&BigDecimal>,
    ) -> Self {
        let Some(previous) = previous else {
            return PriceChange::FirstObservation;
        };

        if current < previous {
            let crossed_threshold = threshold.is_none_or(|t| current <= t);
            PriceChange::Decrease { crossed_threshold }
        } else if current > previous {
            PriceChange::Increase
        } else {
            PriceChange::Unchanged
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceChange::FirstObservation => "first_observation",
            PriceChange::Decrease {
                crossed_threshold: true,
            } => "deal",
            PriceChange::Decrease {
                crossed_threshold: false,
            } => "decrease",
            PriceChange::Increase => "increase",
            PriceChange::Unchanged => "unchanged",
            PriceChange::Unavailable => "unavailable",
        }
    }
}

/// Result of reconciling one tracked item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub name: String,
    pub change: PriceChange,
    pub previous: Option<BigDecimal>,
    /// `None` when the price could not be fetched
    pub quote: Option<PriceQuote>,
    pub threshold: Option<BigDecimal>,
}

impl ItemOutcome {
    fn unavailable(name: &str, item: &TrackedItem, previous: Option<BigDecimal>) -> Self {
        Self {
            name: name.to_string(),
            change: PriceChange::Unavailable,
            previous,
            quote: None,
            threshold: item.threshold.clone(),
        }
    }

    /// One report line for this item.
    pub fn render(&self) -> String {
        let name = &self.name;
        let (Some(quote), change) = (&self.quote, self.change) else {
            return format!("⚠️ Could not fetch price for {}", name);
        };

        let currency = quote.currency.as_deref();
        let current = format_price(&quote.price, currency);
        let previous = self
            .previous
            .as_ref()
            .map(|p| format_price(p, currency))
            .unwrap_or_default();
        let discount = if quote.discount_percent > 0 {
            format!(" (-{}%)", quote.discount_percent)
        } else {
            String::new()
        };

        match change {
            PriceChange::FirstObservation => format!("🆕 Saved {} price: {}", name, current),
            PriceChange::Decrease {
                crossed_threshold: true,
            } => {
                let threshold = self
                    .threshold
                    .as_ref()
                    .map(|t| format!(", at or below threshold {}", format_price(t, currency)))
                    .unwrap_or_default();
                format!(
                    "💸 Price drop! {}: {} → {}{}{}",
                    name, previous, current, discount, threshold
                )
            }
            PriceChange::Decrease {
                crossed_threshold: false,
            } => {
                let threshold = self
                    .threshold
                    .as_ref()
                    .map(|t| format!(", threshold {} not reached", format_price(t, currency)))
                    .unwrap_or_default();
                format!(
                    "🔻 {} decreased: {} → {}{}{}",
                    name, previous, current, discount, threshold
                )
            }
            PriceChange::Increase => {
                format!("⬆️ {} increased: {} → {}", name, previous, current)
            }
            PriceChange::Unchanged => format!("✅ {} unchanged: {}", name, current),
            PriceChange::Unavailable => format!("⚠️ Could not fetch price for {}", name),
        }
    }
}

fn format_price(price: &BigDecimal, currency: Option<&str>) -> String {
    match currency {
        Some(currency) => format!("{} {}", price, currency),
        None => price.to_string(),
    }
}

/// Aggregate, ordered per-item report of one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    outcomes: Vec<ItemOutcome>,
}

impl Report {
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn count(&self, change: PriceChange) -> usize {
        self.outcomes.iter().filter(|o| o.change == change).count()
    }

    pub fn render(&self) -> String {
        if self.outcomes.is_empty() {
            return NO_ITEMS_TRACKED.to_string();
        }
        self.outcomes
            .iter()
            .map(ItemOutcome::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Output of [`Reconciler::reconcile`]: the full price book to persist and the
/// report to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub prices: PriceBook,
    pub report: Report,
}

pub struct Reconciler {
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Checks every tracked item against `source` and merges the results into
    /// a copy of `prices`.
    ///
    /// Items are visited in name order. Fetches may run concurrently up to
    /// `fetch_concurrency`, but outcomes are merged sequentially in that same
    /// order. An empty `tracked` makes no source calls.
    pub async fn reconcile(
        &self,
        tracked: &TrackedItems,
        prices: &PriceBook,
        source: &dyn PriceSource,
    ) -> Reconciliation {
        if tracked.is_empty() {
            return Reconciliation {
                prices: prices.clone(),
                report: Report::default(),
            };
        }

        let default_region = self.config.default_region.as_str();
        let fetched: Vec<(&String, &TrackedItem, &str, AppResult<PriceQuote>)> =
            stream::iter(tracked.iter())
                .map(|(name, item)| {
                    let region = item.region_or(default_region);
                    async move {
                        let result = source.fetch(&item.product_id, region).await;
                        (name, item, region, result)
                    }
                })
                .buffered(self.config.fetch_concurrency.max(1))
                .collect()
                .await;

        let mut updated = prices.clone();
        let mut outcomes = Vec::with_capacity(fetched.len());

        for (name, item, region, result) in fetched {
            let previous = prices.get(name).cloned();

            let quote = match result {
                Ok(quote) => quote,
                Err(e) => {
                    tracing::warn!(
                        item = %name,
                        product_id = %item.product_id,
                        region,
                        source = source.name(),
                        error = %e,
                        "Price unavailable, keeping last saved price"
                    );
                    outcomes.push(ItemOutcome::unavailable(name, item, previous));
                    continue;
                }
            };

            let change =
                PriceChange::classify(previous.as_ref(), &quote.price, item.threshold.as_ref());

            tracing::info!(
                item = %name,
                product_id = %item.product_id,
                region,
                price = %quote.price,
                change = change.as_str(),
                "Price checked"
            );

            // Equal prices keep their stored representation
            if change != PriceChange::Unchanged {
                updated.insert(name.clone(), quote.price.clone());
            }

            outcomes.push(ItemOutcome {
                name: name.clone(),
                change,
                previous,
                quote: Some(quote),
                threshold: item.threshold.clone(),
            });
        }

        if self.config.prune_orphans {
            let before = updated.len();
            updated.retain(|name, _| tracked.contains_key(name));
            if before != updated.len() {
                tracing::info!(pruned = before - updated.len(), "Pruned orphaned prices");
            }
        }

        Reconciliation {
            prices: updated,
            report: Report { outcomes },
        }
    }
}
