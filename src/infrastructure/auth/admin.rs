//! Admin token verification with per-client lockout

use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::config::AdminConfig;
use crate::domain::DomainError;
use crate::infrastructure::rate_limit::SlidingWindowLimiter;

/// Hex-encoded SHA-256 digest of a token
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verifies the `X-Admin-Token` header against the configured password.
///
/// Failed attempts are counted per client in a sliding window; a client that
/// reaches the limit is refused until its oldest failure leaves the window,
/// even with the right token. A successful login clears the client's failures.
#[derive(Clone)]
pub struct AdminAuthenticator {
    password_hash: String,
    failures: SlidingWindowLimiter,
    trust_forwarded_for: bool,
}

impl AdminAuthenticator {
    pub fn new(password: &str, max_failed_logins: usize, lockout: Duration) -> Self {
        Self {
            password_hash: hash_token(password),
            failures: SlidingWindowLimiter::new(max_failed_logins, lockout),
            trust_forwarded_for: false,
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(
            &config.password,
            config.max_failed_logins,
            Duration::from_secs(config.lockout_secs),
        )
        .with_trust_forwarded_for(config.trust_forwarded_for)
    }

    /// Whether the client may be identified by `X-Forwarded-For`
    pub fn trust_forwarded_for(&self) -> bool {
        self.trust_forwarded_for
    }

    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Every presented token takes a failure slot before it is compared, so
    /// concurrent attempts cannot exceed the limit; a match releases them all.
    pub async fn authenticate(&self, client: &str, token: Option<&str>) -> Result<(), DomainError> {
        let Some(token) = token else {
            let status = self.failures.check(client).await;
            if !status.allowed {
                return Err(locked_out(client, status.reset_in_seconds));
            }
            return Err(DomainError::unauthorized("Admin token required"));
        };

        let attempt = self.failures.check_and_record(client).await;
        if !attempt.allowed {
            return Err(locked_out(client, attempt.reset_in_seconds));
        }

        if constant_time_compare(&hash_token(token), &self.password_hash) {
            self.failures.reset(client).await;
            return Ok(());
        }

        tracing::warn!(client, remaining = attempt.remaining, "Admin login failed");

        Err(DomainError::unauthorized("Invalid admin token"))
    }
}

fn locked_out(client: &str, reset_in_seconds: u64) -> DomainError {
    tracing::warn!(client, "Admin login refused: client locked out");
    DomainError::rate_limited("Too many failed login attempts", reset_in_seconds)
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
