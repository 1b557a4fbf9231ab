//! Reconnect backoff policies.
//!
//! Recoverable disconnects trigger an automatic reconnect, but an
//! unconditional immediate retry can busy-loop against the transport. The
//! wait between attempts is a pluggable strategy so the retry behavior is
//! explicit and testable.

use std::time::Duration;

use rand::Rng;

/// Decides how long to wait before reconnect attempt `attempt` (1-based).
pub trait ReconnectPolicy: Send + Sync {
    /// Delay before the given attempt. The attempt counter resets once a
    /// connection reaches the open state.
    fn delay(&self, attempt: u32) -> Duration;
}

/// Exponential backoff with a cap and random jitter.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Delay before the first retry.
    pub base: Duration,
    /// Upper bound on the delay.
    pub cap: Duration,
    /// Jitter fraction in `[0, 1]`; the delay is scaled by a random factor
    /// in `[1 - jitter, 1 + jitter]`.
    pub jitter: f64,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            cap: Duration::from_secs(30),
            jitter: 0.2,
        }
    }
}

impl ExponentialBackoff {
    /// Creates a policy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay before the first retry.
    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    /// Sets the upper bound on the delay.
    pub fn with_cap(mut self, cap: Duration) -> Self {
        self.cap = cap;
        self
    }

    /// Sets the jitter fraction.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }
}

impl ReconnectPolicy for ExponentialBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        let exp = self
            .base
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        let capped = exp.min(self.cap);

        if self.jitter == 0.0 {
            return capped;
        }
        let factor = 1.0 + self.jitter * (rand::thread_rng().gen::<f64>() * 2.0 - 1.0);
        capped.mul_f64(factor.max(0.0))
    }
}

/// No waiting between attempts. Only suitable for tests.
#[derive(Debug, Clone, Default)]
pub struct Immediate;

impl ReconnectPolicy for Immediate {
    fn delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}
