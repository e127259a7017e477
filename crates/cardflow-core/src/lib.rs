//! # cardflow-core
//!
//! Core contract types and traits for the cardflow save-and-charge relay.
//!
//! This crate provides:
//! - The JSON contract shared by the relay service and the browser workflow
//! - `PaymentProvider` trait for implementing payment providers
//! - `Amount` for decimal-to-minor-unit conversion
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cardflow_core::{Amount, NewCustomer, PaymentIntentParams, PaymentProvider};
//!
//! let customer = provider.create_customer(&NewCustomer::new("a@b.com")).await?;
//! let setup = provider.create_setup_intent(Some(&customer.id)).await?;
//!
//! // ... the browser saves a card with setup.client_secret ...
//!
//! let methods = provider.list_card_payment_methods(&customer.id).await?;
//! let params = PaymentIntentParams::new(Amount::from_major(10.00)?, &methods[0].id)
//!     .with_customer(&customer.id);
//! let intent = provider.create_payment_intent(&params).await?;
//! ```

pub mod amount;
pub mod contract;
pub mod error;
pub mod model;
pub mod provider;

// Re-exports for convenience
pub use amount::Amount;
pub use contract::{
    CardSummary, CreateCustomerRequest, CreatePaymentIntentRequest, CreateSetupIntentRequest,
    CustomerCreated, DetachResult, ErrorDetail, ErrorEnvelope, HealthStatus, PaymentIntentCreated,
    PaymentMethodList, PaymentMethodSummary, PublishableConfig, SetupIntentCreated,
    DEFAULT_CURRENCY,
};
pub use error::{PaymentError, PaymentResult};
pub use model::{Customer, NewCustomer, PaymentIntent, PaymentIntentParams, SetupIntent};
pub use provider::{BoxedPaymentProvider, PaymentProvider};
