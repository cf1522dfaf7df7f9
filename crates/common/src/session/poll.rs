use std::time::Duration;

/// No poll is issued sooner than this after the previous one.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How the completion endpoint is polled while a handshake is pending.
///
/// Delays start at `initial` and grow by `multiplier` per attempt up to
/// `max_interval`. Polling gives up once `timeout` has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub initial: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max_interval: Duration::from_secs(10),
            multiplier: 2.0,
            timeout: Duration::from_secs(300),
        }
    }
}

impl PollPolicy {
    /// Constant interval, no growth.
    pub fn fixed(interval: Duration, timeout: Duration) -> Self {
        Self {
            initial: interval,
            max_interval: interval,
            multiplier: 1.0,
            timeout,
        }
    }

    /// Delay before poll number `attempt` (zero based), never below
    /// [`MIN_POLL_INTERVAL`].
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt.min(64) as i32);
        let millis = (self.initial.as_millis() as f64 * factor)
            .min(self.max_interval.as_millis() as f64);
        Duration::from_millis(millis as u64)
            .max(self.initial.min(self.max_interval))
            .max(MIN_POLL_INTERVAL)
    }
}
