//! Sliding window rate limiter
//!
//! Keeps the timestamps of recent events per key in process memory and
//! allows at most `max_events` of them within any rolling `window`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Upper bound on how often expired keys are swept
const MAX_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the event is allowed
    pub allowed: bool,
    /// Events still allowed in the current window
    pub remaining: usize,
    /// Total limit for the window
    pub limit: usize,
    /// Seconds until the oldest event leaves the window
    pub reset_in_seconds: u64,
}

/// Rate limiter over a rolling time window
#[derive(Debug, Clone)]
pub struct SlidingWindowLimiter {
    records: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    max_events: usize,
    window: Duration,
    /// How often keys with no events left in the window are dropped
    cleanup_interval: Duration,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_events: usize, window: Duration) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            max_events,
            window,
            cleanup_interval: window.min(MAX_CLEANUP_INTERVAL),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn limit(&self) -> usize {
        self.max_events
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check whether another event for `key` would be allowed, without recording it
    pub async fn check(&self, key: &str) -> RateLimitResult {
        let now = Instant::now();
        let records = self.records.read().await;

        self.calculate(records.get(key).map(Vec::as_slice).unwrap_or_default(), now)
    }

    /// Record an event for `key` unconditionally
    pub async fn record(&self, key: &str) {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let mut records = self.records.write().await;
        let events = records.entry(key.to_string()).or_default();

        self.prune(events, now);
        events.push(now);
    }

    /// Check and record in one operation; rejected events are not recorded
    pub async fn check_and_record(&self, key: &str) -> RateLimitResult {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let mut records = self.records.write().await;
        let events = records.entry(key.to_string()).or_default();

        self.prune(events, now);
        let result = self.calculate(events, now);

        if result.allowed {
            events.push(now);
            return RateLimitResult {
                remaining: result.remaining.saturating_sub(1),
                ..result
            };
        }

        result
    }

    /// Forget every event for `key`
    pub async fn reset(&self, key: &str) {
        let mut records = self.records.write().await;
        records.remove(key);
    }

    /// Drop keys whose events have all left the window
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut records = self.records.write().await;

        for events in records.values_mut() {
            self.prune(events, now);
        }

        records.retain(|_, v| !v.is_empty());
    }

    /// Runs [`cleanup`](Self::cleanup) once per `cleanup_interval`
    async fn maybe_cleanup(&self) {
        let due = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if !due {
            return;
        }

        {
            let mut last = self.last_cleanup.write().await;
            if last.elapsed() < self.cleanup_interval {
                return;
            }
            *last = Instant::now();
        }

        self.cleanup().await;
    }

    fn prune(&self, events: &mut Vec<Instant>, now: Instant) {
        events.retain(|t| now.duration_since(*t) < self.window);
    }

    fn calculate(&self, events: &[Instant], now: Instant) -> RateLimitResult {
        let in_window: Vec<&Instant> = events
            .iter()
            .filter(|t| now.duration_since(**t) < self.window)
            .collect();

        let count = in_window.len();
        let reset_in_seconds = in_window
            .iter()
            .min()
            .map(|oldest| {
                let elapsed = now.duration_since(**oldest);
                self.window.saturating_sub(elapsed).as_secs()
            })
            .unwrap_or(0);

        RateLimitResult {
            allowed: count < self.max_events,
            remaining: self.max_events.saturating_sub(count),
            limit: self.max_events,
            reset_in_seconds,
        }
    }
}
