//! Per-client usage accounting within a fixed admission window.

use std::time::{Duration, Instant};

/// Usage record for a single client identity.
///
/// A bucket tracks how many requests were admitted in the current window and
/// when that window expires. Buckets are created lazily on a client's first
/// request and become eligible for removal once the window has passed.
#[derive(Debug, Clone, Copy)]
pub struct UsageBucket {
    /// Admitted requests counted against the current window
    count: u32,
    /// When the current window expires
    window_end: Instant,
}

impl UsageBucket {
    /// Open a fresh window at `now`, counting the request that opened it.
    pub fn open(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            window_end: now + window,
        }
    }

    /// Whether the window has expired at `now`.
    ///
    /// A request landing exactly on the boundary belongs to the next window,
    /// so expiry is inclusive.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.window_end
    }

    /// Count one more admitted request against the current window.
    pub fn record(&mut self) {
        self.count += 1;
    }

    /// Get the number of admitted requests in the current window.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Get the time remaining until the window resets, zero if already past.
    pub fn until_reset(&self, now: Instant) -> Duration {
        self.window_end.saturating_duration_since(now)
    }
}
