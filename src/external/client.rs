use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("steam-price-watch/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client, built on first use.
///
/// Every remote collaborator (Steam storefront, Telegram bot API, webhooks)
/// goes through this instance so connections are pooled across a run.
/// Per-call timeouts come from configuration and are set on each request;
/// the client-wide timeout is an upper bound.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        // Enable compression (gzip, deflate, brotli, zstd)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_initialization() {
        let _ = &*HTTP_CLIENT;
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("steam-price-watch/"));
        assert!(USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
