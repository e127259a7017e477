//! Stripe API objects, trimmed to the fields the relay reads.

use cardflow_core::{CardSummary, Customer, PaymentIntent, PaymentMethodSummary, SetupIntent};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct StripeCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<StripeCustomer> for Customer {
    fn from(customer: StripeCustomer) -> Self {
        Customer {
            id: customer.id,
            email: customer.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StripeSetupIntent {
    pub id: String,
    pub client_secret: String,
    pub status: String,
}

impl From<StripeSetupIntent> for SetupIntent {
    fn from(intent: StripeSetupIntent) -> Self {
        SetupIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            status: intent.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StripePaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: String,
}

impl From<StripePaymentIntent> for PaymentIntent {
    fn from(intent: StripePaymentIntent) -> Self {
        PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            status: intent.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StripePaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    #[serde(default)]
    pub card: Option<StripeCard>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StripeCard {
    pub brand: String,
    pub last4: String,
    pub exp_month: u8,
    pub exp_year: u16,
}

impl From<StripePaymentMethod> for PaymentMethodSummary {
    fn from(method: StripePaymentMethod) -> Self {
        PaymentMethodSummary {
            id: method.id,
            method_type: method.method_type,
            card: method.card.map(|card| CardSummary {
                brand: card.brand,
                last4: card.last4,
                exp_month: card.exp_month,
                exp_year: card.exp_year,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StripeList<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StripeErrorResponse {
    pub error: StripeError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StripeError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_method_reshape() {
        let raw = json!({
            "id": "pm_1",
            "object": "payment_method",
            "type": "card",
            "billing_details": {"email": null},
            "card": {
                "brand": "visa",
                "last4": "4242",
                "exp_month": 12,
                "exp_year": 2030,
                "funding": "credit",
                "country": "US"
            },
            "customer": "cus_1"
        });

        let method: StripePaymentMethod = serde_json::from_value(raw).unwrap();
        let summary = PaymentMethodSummary::from(method);

        assert_eq!(summary.id, "pm_1");
        assert!(summary.is_card());
        let card = summary.card.unwrap();
        assert_eq!(card.last4, "4242");
        assert_eq!(card.exp_month, 12);
        assert_eq!(card.exp_year, 2030);
    }

    #[test]
    fn test_error_envelope_parse() {
        let raw = json!({
            "error": {
                "code": "resource_missing",
                "message": "No such customer: 'cus_missing'",
                "param": "customer",
                "type": "invalid_request_error"
            }
        });

        let parsed: StripeErrorResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.error.code.as_deref(), Some("resource_missing"));
        assert_eq!(
            parsed.error.message.as_deref(),
            Some("No such customer: 'cus_missing'")
        );
    }
}
