//! Core admission limiter implementation.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use super::bucket::UsageBucket;

/// Outcome of an admission check.
///
/// Both variants are normal control flow. A rejection carries the time until
/// the client's window resets so the caller can relay it as a retry hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed to its handler.
    Admit,
    /// The request is over quota for the current window.
    Reject {
        /// Time until the window resets and requests are admitted again
        retry_after: Duration,
    },
}

impl Admission {
    /// Whether the request was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admit)
    }
}

/// Fixed-window admission limiter keyed by client identity.
///
/// Each instance exclusively owns its bucket map; share it behind an `Arc`
/// and it can front any number of routes. The current time is supplied by the
/// caller, which keeps decisions deterministic under test.
pub struct RateLimiter {
    /// Maximum admitted requests per identity per window
    max_requests: u32,
    /// Duration of one counting window
    window: Duration,
    /// Usage buckets indexed by client identity
    buckets: DashMap<String, UsageBucket>,
}

impl RateLimiter {
    /// Create a new limiter with the given per-window quota.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            buckets: DashMap::new(),
        }
    }

    /// Admit or reject a request from `identity` observed at `now`.
    ///
    /// The full read-modify-write runs under the entry guard of the owning
    /// map shard, so two concurrent requests for the same identity cannot
    /// both claim the final slot in a window.
    pub fn check_and_record(&self, identity: &str, now: Instant) -> Admission {
        match self.buckets.entry(identity.to_string()) {
            Entry::Vacant(slot) => {
                debug!(identity, "Opening rate limit window for new client");
                slot.insert(UsageBucket::open(now, self.window));
                Admission::Admit
            }
            Entry::Occupied(mut slot) => {
                let bucket = slot.get_mut();
                if bucket.is_expired(now) {
                    *bucket = UsageBucket::open(now, self.window);
                    Admission::Admit
                } else if bucket.count() < self.max_requests {
                    bucket.record();
                    Admission::Admit
                } else {
                    Admission::Reject {
                        retry_after: bucket.until_reset(now),
                    }
                }
            }
        }
    }

    /// Remove every bucket whose window has passed at `now`.
    ///
    /// Returns the number of buckets removed. An expired bucket and an absent
    /// bucket behave identically in [`check_and_record`](Self::check_and_record),
    /// so sweeping never changes an admission outcome.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| !bucket.is_expired(now));
        before.saturating_sub(self.buckets.len())
    }

    /// Get the number of live buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Get the per-window quota.
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Get the window duration.
    pub fn window(&self) -> Duration {
        self.window
    }
}
