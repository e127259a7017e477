//! # Payment Error Types
//!
//! Typed error handling for the cardflow relay.
//! All provider operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Payment provider rejected the request (declined card, unknown id, ...).
    /// Displays the provider's own message so callers can relay it verbatim.
    #[error("{message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Shorthand for a provider rejection
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ProviderError {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_displays_provider_message() {
        let err = PaymentError::provider("stripe", "Your card was declined.");
        assert_eq!(err.to_string(), "Your card was declined.");
    }
}
