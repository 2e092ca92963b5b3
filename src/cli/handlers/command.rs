//! Local command handler

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::services::WatchService;

/// Applies a chat command to the local tracked item store and prints the
/// reply instead of sending it.
pub struct ApplyCommandHandler {
    config: Settings,
}

impl ApplyCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub fn execute(&self, text: &str) -> AppResult<()> {
        let outcome = WatchService::from_settings(&self.config).apply_command(text)?;
        match outcome.reply {
            Some(reply) => println!("{}", reply),
            None => println!("Ignored: not a recognised command"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{JsonFileStore, KeyValueStore};
    use crate::models::TrackedItem;
    use tempfile::TempDir;

    #[test]
    fn test_add_and_remove_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracked.json");
        let mut config = Settings::default();
        config.storage.tracked_items_path = path.to_string_lossy().into_owned();
        let handler = ApplyCommandHandler::new(config);

        handler.execute("/add Hades 1145360 20").unwrap();
        let stored = JsonFileStore::<TrackedItem>::new(&path).load().unwrap();
        assert_eq!(stored["Hades"].product_id, "1145360");
        assert_eq!(stored["Hades"].region.as_deref(), Some("PL"));

        handler.execute("/remove Hades").unwrap();
        assert!(JsonFileStore::<TrackedItem>::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_command_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let mut config = Settings::default();
        config.storage.tracked_items_path =
            dir.path().join("tracked.json").to_string_lossy().into_owned();

        assert!(ApplyCommandHandler::new(config).execute("/add only-name").is_ok());
        assert!(!dir.path().join("tracked.json").exists());
    }
}
