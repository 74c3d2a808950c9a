use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after_secs: u64,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after_secs: u64) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_secs,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error originates from an unreachable or failing store
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("File 'abc' not found");
        assert_eq!(error.to_string(), "Not found: File 'abc' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Display name cannot be empty");
        assert_eq!(
            error.to_string(),
            "Validation error: Display name cannot be empty"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let error = DomainError::rate_limited("Too many reports", 120);
        assert_eq!(error.to_string(), "Rate limited: Too many reports");

        match error {
            DomainError::RateLimited {
                retry_after_secs, ..
            } => assert_eq!(retry_after_secs, 120),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_is_storage() {
        assert!(DomainError::storage("connection refused").is_storage());
        assert!(!DomainError::internal("boom").is_storage());
    }
}
