//! Clients for the remote services the watcher talks to.

pub mod client;
mod price_source;
pub mod steam;
pub mod telegram;

pub use price_source::PriceSource;
pub use steam::SteamStore;
pub use telegram::TelegramClient;
