//! Fixed pause before outbound mutating calls.

use std::time::Duration;

/// Inserts a fixed delay before each destination write to stay under a
/// downstream rate limit. A zero delay never sleeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_enabled(&self) -> bool {
        !self.delay.is_zero()
    }

    /// Wait for the configured delay before a mutating call.
    pub async fn pause(&self) {
        if self.is_enabled() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
