//! Chat command processor.
//!
//! Parses one inbound text message into a [`Command`] and applies it to the
//! tracked item set. Unknown input is ignored without a reply.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::config::Settings;
use crate::config::validation::is_valid_region;
use crate::models::{TrackedItem, TrackedItems};
use crate::services::reconciliation::NO_ITEMS_TRACKED;

pub const ADD_USAGE: &str = "/add <name> <productId> [threshold] [region]";
pub const REMOVE_USAGE: &str = "/remove <name>";

/// Malformed command input. `Display` is the reply sent back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: /add <name> <productId> [threshold] [region]")]
    AddUsage,

    #[error("Usage: /remove <name>")]
    RemoveUsage,

    #[error("Invalid threshold '{0}', expected a non-negative number. Usage: /add <name> <productId> [threshold] [region]")]
    InvalidThreshold(String),

    #[error("Invalid region '{0}', expected a two-letter country code. Usage: /add <name> <productId> [threshold] [region]")]
    InvalidRegion(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        name: String,
        product_id: String,
        threshold: Option<BigDecimal>,
        region: Option<String>,
    },
    Remove {
        name: String,
    },
    List,
    /// Not a command this processor handles
    Ignored,
}

impl Command {
    /// Parses whitespace-delimited input. The verb is case-sensitive; a
    /// `@BotName` suffix on it is dropped.
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        let mut tokens = raw.split_whitespace();
        let Some(verb) = tokens.next() else {
            return Ok(Command::Ignored);
        };
        let verb = verb.split_once('@').map_or(verb, |(verb, _)| verb);
        let args: Vec<&str> = tokens.collect();

        match verb {
            "/add" => Self::parse_add(&args),
            "/remove" => match args.as_slice() {
                [name] => Ok(Command::Remove {
                    name: name.to_string(),
                }),
                _ => Err(CommandError::RemoveUsage),
            },
            "/list" => Ok(Command::List),
            _ => Ok(Command::Ignored),
        }
    }

    fn parse_add(args: &[&str]) -> Result<Self, CommandError> {
        let (name, product_id, rest) = match args {
            [name, product_id, rest @ ..] if rest.len() <= 2 => (name, product_id, rest),
            _ => return Err(CommandError::AddUsage),
        };

        let (threshold, region) = match rest {
            [] => (None, None),
            // A lone trailing argument is a threshold unless it reads as a region
            [arg] => match parse_threshold(arg) {
                Ok(t) => (Some(t), None),
                Err(_) if is_valid_region(arg) => (None, Some(arg.to_ascii_uppercase())),
                Err(e) => return Err(e),
            },
            [threshold, region] => (Some(parse_threshold(threshold)?), Some(parse_region(region)?)),
            _ => return Err(CommandError::AddUsage),
        };

        Ok(Command::Add {
            name: name.to_string(),
            product_id: product_id.to_string(),
            threshold,
            region,
        })
    }
}

fn parse_threshold(raw: &str) -> Result<BigDecimal, CommandError> {
    let value =
        BigDecimal::from_str(raw).map_err(|_| CommandError::InvalidThreshold(raw.to_string()))?;
    if value < BigDecimal::from(0) {
        return Err(CommandError::InvalidThreshold(raw.to_string()));
    }
    Ok(value)
}

fn parse_region(raw: &str) -> Result<String, CommandError> {
    if !is_valid_region(raw) {
        return Err(CommandError::InvalidRegion(raw.to_string()));
    }
    Ok(raw.to_ascii_uppercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConfig {
    pub default_region: String,
}

impl CommandConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            default_region: settings.steam.default_region.to_ascii_uppercase(),
        }
    }
}

/// Result of processing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub tracked: TrackedItems,
    /// `None` for ignored input
    pub reply: Option<String>,
    /// Whether `tracked` differs from the input and must be saved
    pub changed: bool,
}

impl CommandOutcome {
    fn unchanged(tracked: &TrackedItems, reply: Option<String>) -> Self {
        Self {
            tracked: tracked.clone(),
            reply,
            changed: false,
        }
    }
}

pub struct CommandProcessor {
    config: CommandConfig,
}

impl CommandProcessor {
    pub fn new(config: CommandConfig) -> Self {
        Self { config }
    }

    pub fn process(&self, raw: &str, tracked: &TrackedItems) -> CommandOutcome {
        let command = match Command::parse(raw) {
            Ok(command) => command,
            Err(e) => {
                tracing::info!(input = raw, error = %e, "Malformed command");
                return CommandOutcome::unchanged(tracked, Some(e.to_string()));
            }
        };

        match command {
            Command::Add {
                name,
                product_id,
                threshold,
                region,
            } => {
                let region = region.unwrap_or_else(|| self.config.default_region.clone());
                let mut item = TrackedItem::new(product_id).with_region(region);
                if let Some(threshold) = threshold {
                    item = item.with_threshold(threshold);
                }

                let reply = format!("Added {}: {}", name, describe(&item));
                tracing::info!(item = %name, product_id = %item.product_id, "Tracked item added");

                // Always saved: BigDecimal equality ignores scale (`10` == `10.0`).
                let mut updated = tracked.clone();
                updated.insert(name, item);
                CommandOutcome {
                    tracked: updated,
                    reply: Some(reply),
                    changed: true,
                }
            }
            Command::Remove { name } => {
                if !tracked.contains_key(&name) {
                    return CommandOutcome::unchanged(tracked, Some(format!("{} not found", name)));
                }
                let mut updated = tracked.clone();
                updated.remove(&name);
                tracing::info!(item = %name, "Tracked item removed");
                CommandOutcome {
                    tracked: updated,
                    reply: Some(format!("Removed {}", name)),
                    changed: true,
                }
            }
            Command::List => CommandOutcome::unchanged(tracked, Some(self.listing(tracked))),
            Command::Ignored => {
                tracing::debug!(input = raw, "Ignoring non-command message");
                CommandOutcome::unchanged(tracked, None)
            }
        }
    }

    fn listing(&self, tracked: &TrackedItems) -> String {
        if tracked.is_empty() {
            return NO_ITEMS_TRACKED.to_string();
        }
        tracked
            .iter()
            .map(|(name, item)| {
                let region = item.region_or(&self.config.default_region);
                format!(
                    "{}: product {}, region {}, threshold {}",
                    name,
                    item.product_id,
                    region,
                    threshold_text(item)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn threshold_text(item: &TrackedItem) -> String {
    item.threshold
        .as_ref()
        .map_or_else(|| "none".to_string(), |t| t.to_string())
}

fn describe(item: &TrackedItem) -> String {
    format!(
        "product {}, region {}, threshold {}",
        item.product_id,
        item.region.as_deref().unwrap_or("default"),
        threshold_text(item)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> CommandProcessor {
        CommandProcessor::new(CommandConfig {
            default_region: "PL".to_string(),
        })
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_add_variants() {
        assert_eq!(
            Command::parse("/add X 123 10.0").unwrap(),
            Command::Add {
                name: "X".to_string(),
                product_id: "123".to_string(),
                threshold: Some(dec("10.0")),
                region: None,
            }
        );
        assert_eq!(
            Command::parse("/add X 123").unwrap(),
            Command::Add {
                name: "X".to_string(),
                product_id: "123".to_string(),
                threshold: None,
                region: None,
            }
        );
        assert_eq!(
            Command::parse("/add X 123 us").unwrap(),
            Command::Add {
                name: "X".to_string(),
                product_id: "123".to_string(),
                threshold: None,
                region: Some("US".to_string()),
            }
        );
        assert_eq!(
            Command::parse("  /add   X 123 5 de ").unwrap(),
            Command::Add {
                name: "X".to_string(),
                product_id: "123".to_string(),
                threshold: Some(dec("5")),
                region: Some("DE".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed_add() {
        assert_eq!(Command::parse("/add X"), Err(CommandError::AddUsage));
        assert_eq!(Command::parse("/add"), Err(CommandError::AddUsage));
        assert_eq!(
            Command::parse("/add X 123 5 PL extra"),
            Err(CommandError::AddUsage)
        );
        assert_eq!(
            Command::parse("/add X 123 cheap"),
            Err(CommandError::InvalidThreshold("cheap".to_string()))
        );
        assert_eq!(
            Command::parse("/add X 123 -1"),
            Err(CommandError::InvalidThreshold("-1".to_string()))
        );
        assert_eq!(
            Command::parse("/add X 123 5 POL"),
            Err(CommandError::InvalidRegion("POL".to_string()))
        );
    }

    #[test]
    fn test_parse_verbs() {
        assert_eq!(Command::parse("/list").unwrap(), Command::List);
        assert_eq!(Command::parse("/list@PriceBot").unwrap(), Command::List);
        assert_eq!(
            Command::parse("/remove Y").unwrap(),
            Command::Remove {
                name: "Y".to_string()
            }
        );
        assert_eq!(Command::parse("/remove"), Err(CommandError::RemoveUsage));
        assert_eq!(Command::parse("/LIST").unwrap(), Command::Ignored);
        assert_eq!(Command::parse("hello there").unwrap(), Command::Ignored);
        assert_eq!(Command::parse("   ").unwrap(), Command::Ignored);
    }

    #[test]
    fn test_add_then_list() {
        let p = processor();
        let added = p.process("/add X 123 10.0", &TrackedItems::new());
        assert!(added.changed);
        assert_eq!(
            added.reply.as_deref(),
            Some("Added X: product 123, region PL, threshold 10.0")
        );

        let listed = p.process("/list", &added.tracked);
        assert!(!listed.changed);
        assert_eq!(
            listed.reply.as_deref(),
            Some("X: product 123, region PL, threshold 10.0")
        );
    }

    #[test]
    fn test_add_overwrites_existing() {
        let p = processor();
        let first = p.process("/add X 123 10", &TrackedItems::new());
        let second = p.process("/add X 456", &first.tracked);

        assert!(second.changed);
        assert_eq!(second.tracked.len(), 1);
        assert_eq!(second.tracked["X"].product_id, "456");
        assert!(second.tracked["X"].threshold.is_none());

        let again = p.process("/add X 456", &second.tracked);
        assert!(again.changed);
        assert_eq!(again.tracked, second.tracked);
    }

    #[test]
    fn test_remove_absent_is_not_found() {
        let p = processor();
        let tracked = p.process("/add X 1", &TrackedItems::new()).tracked;

        let outcome = p.process("/remove Y", &tracked);
        assert!(!outcome.changed);
        assert_eq!(outcome.tracked, tracked);
        assert_eq!(outcome.reply.as_deref(), Some("Y not found"));
    }

    #[test]
    fn test_remove_present() {
        let p = processor();
        let tracked = p.process("/add X 1", &TrackedItems::new()).tracked;

        let outcome = p.process("/remove X", &tracked);
        assert!(outcome.changed);
        assert!(outcome.tracked.is_empty());
        assert_eq!(outcome.reply.as_deref(), Some("Removed X"));
    }

    #[test]
    fn test_malformed_leaves_store_untouched() {
        let p = processor();
        let tracked = p.process("/add X 1 5", &TrackedItems::new()).tracked;

        let outcome = p.process("/add X 1 lots", &tracked);
        assert!(!outcome.changed);
        assert_eq!(outcome.tracked, tracked);
        assert!(outcome.reply.unwrap().contains(ADD_USAGE));
    }

    #[test]
    fn test_unknown_input_has_no_reply() {
        let outcome = processor().process("what's the price?", &TrackedItems::new());
        assert!(!outcome.changed);
        assert!(outcome.reply.is_none());
    }

    #[test]
    fn test_list_empty() {
        let outcome = processor().process("/list", &TrackedItems::new());
        assert_eq!(outcome.reply.as_deref(), Some(NO_ITEMS_TRACKED));
    }

    #[test]
    fn test_list_is_sorted_and_uses_default_region() {
        let mut tracked = TrackedItems::new();
        tracked.insert("b".to_string(), TrackedItem::new("2").with_region("US"));
        tracked.insert("a".to_string(), TrackedItem::new("1"));

        let outcome = processor().process("/list", &tracked);
        assert_eq!(
            outcome.reply.as_deref(),
            Some("a: product 1, region PL, threshold none\nb: product 2, region US, threshold none")
        );
    }
}
