use std::time::Duration;
use tracing::trace;

/// Fixed pause taken before every API call.
///
/// Not adaptive: rate-limit responses do not lengthen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep for the configured delay
    pub async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        trace!(delay_ms = self.delay.as_millis() as u64, "pausing before request");
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_DELAY_MILLIS))
    }
}
