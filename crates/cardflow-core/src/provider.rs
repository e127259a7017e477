//! # Payment Provider Trait
//!
//! The seam between the relay service and a hosted payment provider.
//! Implementations: Stripe (`cardflow-stripe`), test doubles.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentProvider (trait)                    │
//! │  ├── create_customer()                                      │
//! │  ├── create_setup_intent()                                  │
//! │  ├── create_payment_intent()                                │
//! │  ├── list_card_payment_methods()                            │
//! │  └── detach_payment_method()                                │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │StripeProvider │
//!                    └───────────────┘
//! ```
//!
//! The relay never checks that a payment method belongs to a customer;
//! that authorization is the provider's.

use crate::contract::PaymentMethodSummary;
use crate::error::PaymentResult;
use crate::model::{Customer, NewCustomer, PaymentIntent, PaymentIntentParams, SetupIntent};
use async_trait::async_trait;
use std::sync::Arc;

/// Server-side operations the relay forwards to the provider.
///
/// Implementations must be stateless per call so a single handle can be
/// shared by every request for the life of the process.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer identity.
    async fn create_customer(&self, customer: &NewCustomer) -> PaymentResult<Customer>;

    /// Create a setup intent for saving a card for off-session use.
    ///
    /// # Arguments
    /// * `customer_id` - Attach the saved card to this customer when given
    async fn create_setup_intent(&self, customer_id: Option<&str>) -> PaymentResult<SetupIntent>;

    /// Create and immediately confirm a payment intent against a saved method.
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> PaymentResult<PaymentIntent>;

    /// List the customer's saved payment methods of type "card".
    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> PaymentResult<Vec<PaymentMethodSummary>>;

    /// Detach (remove) a saved payment method from its customer.
    async fn detach_payment_method(&self, payment_method_id: &str) -> PaymentResult<()>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared provider handle (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;
