//! # Workflow Controller
//!
//! Applies user actions to the [`WorkflowState`], calling the relay and the
//! hosted card form in strict sequence. Every dependent request takes its
//! input from the step before it, never from state written by another task.

use crate::relay::RelayClient;
use crate::widget::{CardWidget, WidgetOutcome};
use crate::workflow::{ChargeStatus, WorkflowState, WorkflowView};
use cardflow_core::{
    Amount, CreateCustomerRequest, CreatePaymentIntentRequest, PaymentMethodSummary,
    DEFAULT_CURRENCY,
};
use thiserror::Error;

/// Customer created on first save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub email: String,
    pub name: String,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            email: "User@example.com".to_string(),
            name: "User Customer".to_string(),
        }
    }
}

/// User intents the page can dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadConfig,
    StartSaveFlow,
    SubmitCard,
    ChangeCard,
    CancelChange,
    RemoveCard,
    /// Charge the saved method; `amount` is the operator's decimal input
    Charge { amount: String },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::LoadConfig => "load-config",
            Self::StartSaveFlow => "start-save-flow",
            Self::SubmitCard => "submit-card",
            Self::ChangeCard => "change-card",
            Self::CancelChange => "cancel-change",
            Self::RemoveCard => "remove-card",
            Self::Charge { .. } => "charge",
        }
    }
}

/// Actions rejected before any relay call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Cannot {action} while {stage}")]
    NotAllowed {
        action: &'static str,
        stage: &'static str,
    },

    #[error("Another action is still in progress")]
    Busy,

    #[error("Failed to load payment configuration: {0}")]
    Config(String),

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),
}

type Observer = Box<dyn Fn(&WorkflowState)>;

/// Save → display → charge → replace controller
pub struct Workflow<R, W> {
    relay: R,
    widget: W,
    profile: CustomerProfile,
    publishable_key: Option<String>,
    state: WorkflowState,
    observer: Option<Observer>,
}

impl<R: RelayClient, W: CardWidget> Workflow<R, W> {
    pub fn new(relay: R, widget: W) -> Self {
        Self {
            relay,
            widget,
            profile: CustomerProfile::default(),
            publishable_key: None,
            state: WorkflowState::default(),
            observer: None,
        }
    }

    pub fn with_profile(mut self, profile: CustomerProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Called after every state change
    pub fn with_observer(mut self, observer: impl Fn(&WorkflowState) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn view(&self) -> WorkflowView {
        WorkflowView::from(&self.state)
    }

    pub fn publishable_key(&self) -> Option<&str> {
        self.publishable_key.as_deref()
    }

    pub async fn apply(&mut self, action: Action) -> Result<(), WorkflowError> {
        match action {
            Action::LoadConfig => self.load_config().await.map(|_| ()),
            Action::StartSaveFlow => self.start_save_flow().await,
            Action::SubmitCard => self.submit_card().await,
            Action::ChangeCard => self.change_card().await,
            Action::CancelChange => self.cancel_change(),
            Action::RemoveCard => self.remove_card().await,
            Action::Charge { amount } => self.charge(&amount).await,
        }
    }

    fn transition(&mut self, next: WorkflowState) {
        self.state = next;
        if let Some(observer) = &self.observer {
            observer(&self.state);
        }
    }

    fn not_allowed(&self, action: &Action) -> WorkflowError {
        WorkflowError::NotAllowed {
            action: action.name(),
            stage: self.state.stage(),
        }
    }

    /// Fetch the publishable key once; later calls reuse it
    async fn load_config(&mut self) -> Result<String, WorkflowError> {
        if let Some(key) = &self.publishable_key {
            return Ok(key.clone());
        }

        let config = self
            .relay
            .config()
            .await
            .map_err(|e| WorkflowError::Config(e.to_string()))?;

        self.publishable_key = Some(config.publishable_key.clone());
        Ok(config.publishable_key)
    }

    async fn start_save_flow(&mut self) -> Result<(), WorkflowError> {
        if self.state.can_charge() {
            return self.change_card().await;
        }

        let replacing = match &self.state {
            WorkflowState::Idle { .. } => None,
            WorkflowState::AwaitingSecret { replacing, .. } => replacing.clone(),
            _ => return Err(self.not_allowed(&Action::StartSaveFlow)),
        };

        self.load_config().await?;

        let customer_id = match self.state.customer_id() {
            Some(id) => id.to_string(),
            None => {
                let request = CreateCustomerRequest {
                    email: Some(self.profile.email.clone()),
                    name: Some(self.profile.name.clone()),
                };
                match self.relay.create_customer(&request).await {
                    Ok(created) => created.customer_id,
                    Err(_) => {
                        self.transition(WorkflowState::Idle {
                            error: Some("Failed to create customer".to_string()),
                        });
                        return Ok(());
                    }
                }
            }
        };

        self.request_secret(customer_id, replacing).await
    }

    /// Ask for a fresh setup intent and mount the form with it
    async fn request_secret(
        &mut self,
        customer_id: String,
        replacing: Option<PaymentMethodSummary>,
    ) -> Result<(), WorkflowError> {
        let publishable_key = self.load_config().await?;

        self.transition(WorkflowState::AwaitingSecret {
            customer_id: customer_id.clone(),
            replacing: replacing.clone(),
            error: None,
        });

        let client_secret = match self.relay.create_setup_intent(&customer_id).await {
            Ok(intent) => intent.client_secret,
            Err(_) => {
                self.transition(WorkflowState::AwaitingSecret {
                    customer_id,
                    replacing,
                    error: Some("Failed to start card setup".to_string()),
                });
                return Ok(());
            }
        };

        if let Err(e) = self.widget.mount(&publishable_key, &client_secret) {
            self.transition(WorkflowState::AwaitingSecret {
                customer_id,
                replacing,
                error: Some(format!("Failed to load card form: {}", e)),
            });
            return Ok(());
        }

        self.transition(WorkflowState::CollectingCard {
            customer_id,
            client_secret,
            replacing,
            error: None,
        });
        Ok(())
    }

    async fn submit_card(&mut self) -> Result<(), WorkflowError> {
        let WorkflowState::CollectingCard {
            customer_id,
            client_secret,
            replacing,
            ..
        } = self.state.clone()
        else {
            return Err(self.not_allowed(&Action::SubmitCard));
        };

        match self.widget.confirm().await {
            WidgetOutcome::Confirmed => {
                self.widget.unmount();
                self.reload_methods(customer_id).await
            }
            WidgetOutcome::Failed(message) => {
                self.transition(WorkflowState::CollectingCard {
                    customer_id,
                    client_secret,
                    replacing,
                    error: Some(message),
                });
                Ok(())
            }
        }
    }

    /// Show the first saved method, or go back to the card form when none
    async fn reload_methods(&mut self, customer_id: String) -> Result<(), WorkflowError> {
        match self.relay.list_payment_methods(&customer_id).await {
            Ok(list) => match list.payment_methods.into_iter().next() {
                Some(method) => {
                    self.transition(WorkflowState::MethodLoaded {
                        customer_id,
                        method,
                        status: None,
                        error: None,
                    });
                    Ok(())
                }
                None => self.request_secret(customer_id, None).await,
            },
            Err(_) => {
                self.transition(WorkflowState::AwaitingSecret {
                    customer_id,
                    replacing: None,
                    error: Some("Failed to load payment methods".to_string()),
                });
                Ok(())
            }
        }
    }

    async fn change_card(&mut self) -> Result<(), WorkflowError> {
        let WorkflowState::MethodLoaded {
            customer_id,
            method,
            ..
        } = self.state.clone()
        else {
            return Err(self.not_allowed(&Action::ChangeCard));
        };

        self.request_secret(customer_id, Some(method)).await
    }

    fn cancel_change(&mut self) -> Result<(), WorkflowError> {
        let (customer_id, method) = match &self.state {
            WorkflowState::AwaitingSecret {
                customer_id,
                replacing: Some(method),
                ..
            }
            | WorkflowState::CollectingCard {
                customer_id,
                replacing: Some(method),
                ..
            } => (customer_id.clone(), method.clone()),
            _ => return Err(self.not_allowed(&Action::CancelChange)),
        };

        self.widget.unmount();
        self.transition(WorkflowState::MethodLoaded {
            customer_id,
            method,
            status: None,
            error: None,
        });
        Ok(())
    }

    async fn remove_card(&mut self) -> Result<(), WorkflowError> {
        let WorkflowState::MethodLoaded {
            customer_id,
            method,
            status,
            ..
        } = self.state.clone()
        else {
            return Err(self.not_allowed(&Action::RemoveCard));
        };

        match self.relay.detach_payment_method(&method.id).await {
            Ok(_) => self.reload_methods(customer_id).await,
            Err(_) => {
                self.transition(WorkflowState::MethodLoaded {
                    customer_id,
                    method,
                    status,
                    error: Some("Failed to remove card".to_string()),
                });
                Ok(())
            }
        }
    }

    async fn charge(&mut self, amount: &str) -> Result<(), WorkflowError> {
        let WorkflowState::MethodLoaded {
            customer_id,
            method,
            ..
        } = self.state.clone()
        else {
            return Err(self.not_allowed(&Action::Charge {
                amount: amount.to_string(),
            }));
        };

        let major: f64 = amount
            .trim()
            .parse()
            .map_err(|_| WorkflowError::InvalidAmount(amount.to_string()))?;
        Amount::from_major(major).map_err(|_| WorkflowError::InvalidAmount(amount.to_string()))?;

        self.transition(WorkflowState::Charging {
            customer_id: customer_id.clone(),
            method: method.clone(),
        });

        let request = CreatePaymentIntentRequest {
            amount: Some(major),
            payment_method_id: Some(method.id.clone()),
            customer_id: Some(customer_id.clone()),
            currency: Some(DEFAULT_CURRENCY.to_string()),
        };

        let status = match self.relay.create_payment_intent(&request).await {
            Ok(intent) => ChargeStatus::from_provider_status(&intent.status),
            Err(e) => ChargeStatus::Failed {
                detail: e.to_string(),
            },
        };

        self.transition(WorkflowState::MethodLoaded {
            customer_id,
            method,
            status: Some(status),
            error: None,
        });
        Ok(())
    }
}
