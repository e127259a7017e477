//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! All secrets are loaded from environment variables.

use cardflow_core::PaymentError;
use std::env;

/// Default base for the payment-intent return URL
const DEFAULT_CLIENT_URL: &str = "http://localhost:8080";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Publishable key (pk_test_... or pk_live_...), handed to the browser
    pub publishable_key: String,

    /// Where redirect-based authentication returns to after a charge
    pub return_url: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    /// - `STRIPE_PUBLISHABLE_KEY`
    ///
    /// Optional:
    /// - `CLIENT_URL` (return URL base, default `http://localhost:8080`)
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| {
            PaymentError::Configuration("STRIPE_SECRET_KEY not set".to_string())
        })?;

        let publishable_key = env::var("STRIPE_PUBLISHABLE_KEY").map_err(|_| {
            PaymentError::Configuration("STRIPE_PUBLISHABLE_KEY not set".to_string())
        })?;

        let client_url = env::var("CLIENT_URL").unwrap_or_else(|_| DEFAULT_CLIENT_URL.to_string());

        let config = Self::new(secret_key, publishable_key).with_client_url(&client_url);
        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(secret_key: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            publishable_key: publishable_key.into(),
            return_url: format!("{}/payment-complete", DEFAULT_CLIENT_URL),
            api_base_url: "https://api.stripe.com".to_string(),
            api_version: "2023-10-16".to_string(),
        }
    }

    /// Validate key formats
    pub fn validate(&self) -> Result<(), PaymentError> {
        if !self.secret_key.starts_with("sk_test_") && !self.secret_key.starts_with("sk_live_") {
            return Err(PaymentError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        if !self.publishable_key.starts_with("pk_test_")
            && !self.publishable_key.starts_with("pk_live_")
        {
            return Err(PaymentError::Configuration(
                "STRIPE_PUBLISHABLE_KEY must start with pk_test_ or pk_live_".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: derive the return URL from the browser app's base URL
    pub fn with_client_url(mut self, client_url: &str) -> Self {
        self.return_url = format!("{}/payment-complete", client_url.trim_end_matches('/'));
        self
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = StripeConfig::new("sk_test_abc123", "pk_test_xyz789");
        assert!(config.validate().is_ok());
        assert!(config.is_test_mode());

        let config = StripeConfig::new("sk_live_abc123", "pk_live_xyz789");
        assert!(config.validate().is_ok());
        assert!(!config.is_test_mode());

        let config = StripeConfig::new("rk_test_abc123", "pk_test_xyz789");
        assert!(config.validate().is_err());

        let config = StripeConfig::new("sk_test_abc123", "xyz789");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new("sk_test_abc123", "pk_test_xyz789");
        assert_eq!(config.auth_header(), "Bearer sk_test_abc123");
    }

    #[test]
    fn test_return_url() {
        let config = StripeConfig::new("sk_test_abc123", "pk_test_xyz789");
        assert_eq!(config.return_url, "http://localhost:8080/payment-complete");

        let config = config.with_client_url("https://shop.example.com/");
        assert_eq!(config.return_url, "https://shop.example.com/payment-complete");
    }

    #[test]
    fn test_from_env_missing_key() {
        env::remove_var("STRIPE_SECRET_KEY");

        let result = StripeConfig::from_env();
        assert!(matches!(result, Err(PaymentError::Configuration(_))));
    }
}
