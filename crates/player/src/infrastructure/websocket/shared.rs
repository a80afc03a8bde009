//! Reconnection policy for the session socket.
//!
//! The delay is fixed and attempts are unbounded: a lost connection is
//! retried forever, one attempt per delay window.

use std::time::Duration;

pub const RECONNECT_DELAY_MS: u64 = 5_000;

/// Fixed-delay retry state shared by the reconnect loop.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    attempts: u64,
    delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_millis(RECONNECT_DELAY_MS))
    }
}

impl ReconnectPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self { attempts: 0, delay }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    #[cfg(test)]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Count one more attempt and return the delay to wait before it.
    pub fn next_delay_and_advance(&mut self) -> Duration {
        self.attempts = self.attempts.saturating_add(1);
        self.delay
    }

    /// Forget the attempt count after a successful open.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}
