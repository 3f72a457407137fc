use std::time::Duration;

/// Retry policy for one agent step: a fixed attempt budget with a fixed
/// delay between attempts. Injected through `AppState` so the pipeline is
/// testable with a zero-delay policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    /// 3 total attempts, 2 seconds between them.
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(2))
    }
}
