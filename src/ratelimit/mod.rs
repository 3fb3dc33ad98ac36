//! Admission limiting logic and state management.

mod bucket;
mod limiter;

pub use bucket::UsageBucket;
pub use limiter::{Admission, RateLimiter};
