//! # Application State
//!
//! Shared state for the Axum application.
//! The provider handle is built once at startup and reused by every request.

use crate::error::ErrorPolicy;
use cardflow_core::BoxedPaymentProvider;
use cardflow_stripe::StripeProvider;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, production)
    pub environment: String,
    /// Browser origin allowed to call the API cross-origin
    pub allowed_origin: String,
    /// Built browser assets served in production
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            allowed_origin: std::env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8081,
            environment: "development".to_string(),
            allowed_origin: "http://localhost:9000".to_string(),
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider handle
    pub provider: BoxedPaymentProvider,
    /// Key the browser initializes the hosted card form with
    pub publishable_key: Arc<str>,
    /// Error translation policy
    pub errors: ErrorPolicy,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state around an existing provider
    pub fn new(
        config: AppConfig,
        provider: BoxedPaymentProvider,
        publishable_key: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            provider,
            publishable_key: publishable_key.into(),
            errors: ErrorPolicy::new(!config.is_production()),
            config,
        }
    }

    /// Build state from the environment with the Stripe provider.
    /// Fails when the Stripe credentials are missing or malformed.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let stripe = StripeProvider::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
        let publishable_key = stripe.publishable_key().to_string();

        Ok(Self::new(config, Arc::new(stripe), publishable_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("ENVIRONMENT");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert!(!config.is_production());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_socket_addr() {
        let config = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };

        assert!(config.socket_addr().is_err());
    }
}
