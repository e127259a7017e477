//! # Workflow State
//!
//! The whole save → display → charge → replace UI lives in one
//! [`WorkflowState`] value. Each variant carries exactly the data its stage
//! needs, so "form shown" and "method loaded" can never both be true.

use cardflow_core::PaymentMethodSummary;
use serde::Serialize;

/// Provider status that counts as a successful charge
const SUCCEEDED: &str = "succeeded";

/// Where the customer is in the save-and-charge workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    /// No customer yet
    Idle { error: Option<String> },

    /// A setup intent has been requested for the customer
    AwaitingSecret {
        customer_id: String,
        /// Saved method being replaced, if the user is changing cards
        replacing: Option<PaymentMethodSummary>,
        error: Option<String>,
    },

    /// The hosted card form is mounted with a fresh client secret
    CollectingCard {
        customer_id: String,
        client_secret: String,
        replacing: Option<PaymentMethodSummary>,
        error: Option<String>,
    },

    /// One saved method is on display and can be charged
    MethodLoaded {
        customer_id: String,
        method: PaymentMethodSummary,
        /// Outcome of the last charge attempt
        status: Option<ChargeStatus>,
        /// Last removal failure
        error: Option<String>,
    },

    /// A charge against the saved method is in flight
    Charging {
        customer_id: String,
        method: PaymentMethodSummary,
    },
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::Idle { error: None }
    }
}

impl WorkflowState {
    pub fn customer_id(&self) -> Option<&str> {
        match self {
            Self::Idle { .. } => None,
            Self::AwaitingSecret { customer_id, .. }
            | Self::CollectingCard { customer_id, .. }
            | Self::MethodLoaded { customer_id, .. }
            | Self::Charging { customer_id, .. } => Some(customer_id),
        }
    }

    /// Saved method currently shown or being replaced
    pub fn saved_method(&self) -> Option<&PaymentMethodSummary> {
        match self {
            Self::Idle { .. } => None,
            Self::AwaitingSecret { replacing, .. } | Self::CollectingCard { replacing, .. } => {
                replacing.as_ref()
            }
            Self::MethodLoaded { method, .. } | Self::Charging { method, .. } => Some(method),
        }
    }

    pub fn can_charge(&self) -> bool {
        matches!(self, Self::MethodLoaded { .. })
    }

    pub fn form_visible(&self) -> bool {
        matches!(self, Self::CollectingCard { .. })
    }

    pub fn is_replacing(&self) -> bool {
        matches!(
            self,
            Self::AwaitingSecret {
                replacing: Some(_),
                ..
            } | Self::CollectingCard {
                replacing: Some(_),
                ..
            }
        )
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Idle { error }
            | Self::AwaitingSecret { error, .. }
            | Self::CollectingCard { error, .. }
            | Self::MethodLoaded { error, .. } => error.as_deref(),
            Self::Charging { .. } => None,
        }
    }

    /// Stage name used by the browser for rendering
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "idle",
            Self::AwaitingSecret { .. } => "awaiting-secret",
            Self::CollectingCard { .. } => "collecting-card",
            Self::MethodLoaded { .. } => "method-loaded",
            Self::Charging { .. } => "charging",
        }
    }
}

/// Outcome of a charge, as shown next to the charge button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeStatus {
    Processing,
    Succeeded,
    /// Declined, incomplete or errored, with the detail kept for logs
    Failed { detail: String },
}

impl ChargeStatus {
    /// Map the provider's payment-intent status
    pub fn from_provider_status(status: &str) -> Self {
        if status == SUCCEEDED {
            Self::Succeeded
        } else {
            Self::Failed {
                detail: format!("Payment ended with status {}", status),
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Processing => "Processing...",
            Self::Succeeded => "✅ Payment successful!",
            Self::Failed { .. } => "❌ Payment failed.",
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Failed { detail } => Some(detail),
            _ => None,
        }
    }
}

/// Saved card lines for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub payment_method_id: String,
    pub brand: String,
    pub masked_number: String,
    pub expiry: String,
}

impl CardView {
    fn from_method(method: &PaymentMethodSummary) -> Option<Self> {
        let card = method.card.as_ref()?;
        Some(Self {
            payment_method_id: method.id.clone(),
            brand: card.brand_label(),
            masked_number: card.masked_number(),
            expiry: card.expiry(),
        })
    }
}

/// Serializable render model handed to the page after every transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
    pub stage: &'static str,
    pub customer_id: Option<String>,
    pub card: Option<CardView>,
    pub form_visible: bool,
    pub replacing: bool,
    pub can_charge: bool,
    pub status: Option<&'static str>,
    pub status_detail: Option<String>,
    pub error: Option<String>,
}

impl From<&WorkflowState> for WorkflowView {
    fn from(state: &WorkflowState) -> Self {
        let charge = match state {
            WorkflowState::MethodLoaded { status, .. } => status.clone(),
            WorkflowState::Charging { .. } => Some(ChargeStatus::Processing),
            _ => None,
        };

        Self {
            stage: state.stage(),
            customer_id: state.customer_id().map(String::from),
            card: state.saved_method().and_then(CardView::from_method),
            form_visible: state.form_visible(),
            replacing: state.is_replacing(),
            can_charge: state.can_charge(),
            status: charge.as_ref().map(ChargeStatus::message),
            status_detail: charge.as_ref().and_then(|c| c.detail().map(String::from)),
            error: state.error().map(String::from),
        }
    }
}

impl Default for WorkflowView {
    fn default() -> Self {
        Self::from(&WorkflowState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardflow_core::CardSummary;

    fn visa() -> PaymentMethodSummary {
        PaymentMethodSummary::card(
            "pm_1",
            CardSummary {
                brand: "visa".to_string(),
                last4: "4242".to_string(),
                exp_month: 12,
                exp_year: 2030,
            },
        )
    }

    #[test]
    fn test_idle_has_nothing() {
        let state = WorkflowState::default();
        assert_eq!(state.customer_id(), None);
        assert!(state.saved_method().is_none());
        assert!(!state.can_charge());
        assert!(!state.form_visible());
    }

    #[test]
    fn test_form_and_method_are_exclusive() {
        let collecting = WorkflowState::CollectingCard {
            customer_id: "cus_1".into(),
            client_secret: "seti_1_secret".into(),
            replacing: None,
            error: None,
        };
        assert!(collecting.form_visible());
        assert!(!collecting.can_charge());

        let loaded = WorkflowState::MethodLoaded {
            customer_id: "cus_1".into(),
            method: visa(),
            status: None,
            error: None,
        };
        assert!(!loaded.form_visible());
        assert!(loaded.can_charge());
    }

    #[test]
    fn test_charge_status_messages() {
        assert_eq!(
            ChargeStatus::from_provider_status("succeeded").message(),
            "✅ Payment successful!"
        );

        let declined = ChargeStatus::from_provider_status("requires_action");
        assert_eq!(declined.message(), "❌ Payment failed.");
        assert_eq!(
            declined.detail(),
            Some("Payment ended with status requires_action")
        );

        assert_eq!(ChargeStatus::Processing.message(), "Processing...");
    }

    #[test]
    fn test_view_of_loaded_method() {
        let state = WorkflowState::MethodLoaded {
            customer_id: "cus_1".into(),
            method: visa(),
            status: Some(ChargeStatus::Succeeded),
            error: None,
        };

        let view = WorkflowView::from(&state);
        assert_eq!(view.stage, "method-loaded");
        assert_eq!(view.customer_id.as_deref(), Some("cus_1"));
        assert_eq!(view.status, Some("✅ Payment successful!"));

        let card = view.card.unwrap();
        assert_eq!(card.brand, "VISA");
        assert_eq!(card.masked_number, "•••• •••• •••• 4242");
        assert_eq!(card.expiry, "12/2030");
    }

    #[test]
    fn test_view_while_replacing_keeps_card() {
        let state = WorkflowState::CollectingCard {
            customer_id: "cus_1".into(),
            client_secret: "seti_2_secret".into(),
            replacing: Some(visa()),
            error: None,
        };

        let view = WorkflowView::from(&state);
        assert!(view.form_visible);
        assert!(view.replacing);
        assert!(view.card.is_some());
        assert!(!view.can_charge);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let view = WorkflowView::from(&WorkflowState::Charging {
            customer_id: "cus_1".into(),
            method: visa(),
        });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["stage"], "charging");
        assert_eq!(json["formVisible"], false);
        assert_eq!(json["canCharge"], false);
        assert_eq!(json["status"], "Processing...");
        assert_eq!(json["card"]["maskedNumber"], "•••• •••• •••• 4242");
    }
}
