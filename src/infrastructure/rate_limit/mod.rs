//! Per-key sliding window limiting for reports and admin logins

mod sliding_window;

pub use sliding_window::{RateLimitResult, SlidingWindowLimiter};
