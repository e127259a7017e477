//! # Relay Contract
//!
//! JSON bodies exchanged between the browser workflow and the relay service.
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency used when a payment-intent request names none
pub const DEFAULT_CURRENCY: &str = "usd";

/// `GET /api/stripe/config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishableConfig {
    pub publishable_key: String,
}

/// `POST /api/stripe/customer` request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `POST /api/stripe/customer` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreated {
    pub customer_id: String,
    pub email: Option<String>,
}

/// `POST /api/stripe/create-setup-intent` request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetupIntentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// `POST /api/stripe/create-setup-intent` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupIntentCreated {
    pub client_secret: String,
    pub setup_intent_id: String,
}

/// `POST /api/stripe/create-payment-intent` request
///
/// `amount` is in decimal major units; the relay converts it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// `POST /api/stripe/create-payment-intent` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentCreated {
    pub client_secret: Option<String>,
    pub status: String,
}

/// Card details safe to show in the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub brand: String,
    pub last4: String,
    pub exp_month: u8,
    pub exp_year: u16,
}

impl CardSummary {
    /// Brand label, e.g. "VISA"
    pub fn brand_label(&self) -> String {
        self.brand.to_uppercase()
    }

    /// Masked card number, e.g. "•••• •••• •••• 4242"
    pub fn masked_number(&self) -> String {
        format!("•••• •••• •••• {}", self.last4)
    }

    /// Expiry as "12/2030"
    pub fn expiry(&self) -> String {
        format!("{}/{}", self.exp_month, self.exp_year)
    }
}

/// One saved payment method, reshaped from the provider's object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    pub card: Option<CardSummary>,
}

impl PaymentMethodSummary {
    /// Payment method of type "card"
    pub fn card(id: impl Into<String>, card: CardSummary) -> Self {
        Self {
            id: id.into(),
            method_type: "card".to_string(),
            card: Some(card),
        }
    }

    pub fn is_card(&self) -> bool {
        self.method_type == "card"
    }
}

/// `GET /api/stripe/customer/{customerId}/payment-methods` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodList {
    pub payment_methods: Vec<PaymentMethodSummary>,
}

/// `DELETE /api/stripe/payment-method/{paymentMethodId}` response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetachResult {
    pub success: bool,
}

/// `GET /api/health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Body of every non-2xx relay response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                stack,
            },
        }
    }
}
