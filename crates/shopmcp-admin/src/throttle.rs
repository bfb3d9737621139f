//! Fixed post-call delays for the admin API.
//!
//! This is a flat pause after each call, not a token bucket: it never reads
//! the remote's quota headers and never adapts. Single calls wait
//! `call_delay`; the bulk routine additionally waits `bulk_item_delay`
//! after every item.

use std::time::Duration;

use shopmcp_core::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    call_delay: Duration,
    bulk_item_delay: Duration,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_millis(1000))
    }
}

impl Throttle {
    #[must_use]
    pub const fn new(call_delay: Duration, bulk_item_delay: Duration) -> Self {
        Self {
            call_delay,
            bulk_item_delay,
        }
    }

    /// No pauses at all. Meant for tests against a local mock server.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Duration::from_millis(config.shopify_call_delay_ms),
            Duration::from_millis(config.shopify_bulk_item_delay_ms),
        )
    }

    #[must_use]
    pub const fn call_delay(&self) -> Duration {
        self.call_delay
    }

    #[must_use]
    pub const fn bulk_item_delay(&self) -> Duration {
        self.bulk_item_delay
    }

    pub async fn after_call(&self) {
        pause(self.call_delay).await;
    }

    pub async fn between_bulk_items(&self) {
        pause(self.bulk_item_delay).await;
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn default_matches_admin_api_pacing() {
        let throttle = Throttle::default();
        assert_eq!(throttle.call_delay(), Duration::from_millis(500));
        assert_eq!(throttle.bulk_item_delay(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn disabled_throttle_returns_immediately() {
        let started = Instant::now();
        let throttle = Throttle::disabled();
        throttle.after_call().await;
        throttle.between_bulk_items().await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn after_call_waits_at_least_the_configured_delay() {
        let throttle = Throttle::new(Duration::from_millis(30), Duration::ZERO);
        let started = Instant::now();
        throttle.after_call().await;
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
