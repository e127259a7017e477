//! # Provider Objects
//!
//! The subset of the provider's customer and intent objects the relay
//! needs. The provider owns their lifecycle; nothing here is persisted.

use crate::amount::Amount;
use crate::contract::DEFAULT_CURRENCY;
use serde::{Deserialize, Serialize};

/// Parameters for creating a customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub email: String,
    pub name: Option<String>,
}

impl NewCustomer {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A provider-side customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A setup intent scoping one card-save operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupIntent {
    pub id: String,
    pub client_secret: String,
    pub status: String,
}

/// Parameters for charging a saved payment method
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntentParams {
    pub amount: Amount,
    pub currency: String,
    pub payment_method_id: String,
    pub customer_id: Option<String>,
}

impl PaymentIntentParams {
    pub fn new(amount: Amount, payment_method_id: impl Into<String>) -> Self {
        Self {
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            payment_method_id: payment_method_id.into(),
            customer_id: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }
}

/// A payment intent after creation and confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: String,
}

impl PaymentIntent {
    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}
