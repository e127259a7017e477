//! # cardflow-stripe
//!
//! Stripe implementation of `cardflow_core::PaymentProvider`.
//!
//! Talks to the Stripe REST API directly with form-encoded requests:
//! customers, setup intents, payment intents and payment methods.
//! The hosted card form (Stripe.js Payment Element) runs in the browser and
//! is not part of this crate.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cardflow_stripe::StripeProvider;
//! use cardflow_core::{NewCustomer, PaymentProvider};
//!
//! // Fails fast when STRIPE_SECRET_KEY / STRIPE_PUBLISHABLE_KEY are missing
//! let provider = StripeProvider::from_env()?;
//!
//! let customer = provider.create_customer(&NewCustomer::new("a@b.com")).await?;
//! let setup = provider.create_setup_intent(Some(&customer.id)).await?;
//!
//! // Hand setup.client_secret to the browser
//! ```

pub mod client;
pub mod config;
mod types;

// Re-exports
pub use client::StripeProvider;
pub use config::StripeConfig;
