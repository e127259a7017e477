//! # Relay Client
//!
//! Browser-side client for the `/api/stripe` relay endpoints.

use async_trait::async_trait;
use cardflow_core::{
    CreateCustomerRequest, CreatePaymentIntentRequest, CreateSetupIntentRequest,
    CustomerCreated, DetachResult, ErrorEnvelope, PaymentIntentCreated, PaymentMethodList,
    PublishableConfig, SetupIntentCreated,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Relay call failures
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response carrying the relay's error envelope
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

pub type RelayResult<T> = Result<T, RelayError>;

/// One method per relay endpoint
#[async_trait(?Send)]
pub trait RelayClient {
    async fn config(&self) -> RelayResult<PublishableConfig>;

    async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
    ) -> RelayResult<CustomerCreated>;

    async fn create_setup_intent(&self, customer_id: &str) -> RelayResult<SetupIntentCreated>;

    async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntentRequest,
    ) -> RelayResult<PaymentIntentCreated>;

    async fn list_payment_methods(&self, customer_id: &str) -> RelayResult<PaymentMethodList>;

    async fn detach_payment_method(&self, payment_method_id: &str) -> RelayResult<DetachResult>;
}

/// `reqwest`-backed relay client rooted at the page origin
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/stripe{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> RelayResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| RelayError::Decode(e.to_string()));
        }

        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", status));

        Err(RelayError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait(?Send)]
impl RelayClient for HttpRelayClient {
    async fn config(&self) -> RelayResult<PublishableConfig> {
        let response = self.client.get(self.url("/config")).send().await?;
        Self::decode(response).await
    }

    async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
    ) -> RelayResult<CustomerCreated> {
        let response = self
            .client
            .post(self.url("/customer"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_setup_intent(&self, customer_id: &str) -> RelayResult<SetupIntentCreated> {
        let request = CreateSetupIntentRequest {
            customer_id: Some(customer_id.to_string()),
        };
        let response = self
            .client
            .post(self.url("/create-setup-intent"))
            .json(&request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntentRequest,
    ) -> RelayResult<PaymentIntentCreated> {
        let response = self
            .client
            .post(self.url("/create-payment-intent"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_payment_methods(&self, customer_id: &str) -> RelayResult<PaymentMethodList> {
        let path = format!("/customer/{}/payment-methods", customer_id);
        let response = self.client.get(self.url(&path)).send().await?;
        Self::decode(response).await
    }

    async fn detach_payment_method(&self, payment_method_id: &str) -> RelayResult<DetachResult> {
        let path = format!("/payment-method/{}", payment_method_id);
        let response = self.client.delete(self.url(&path)).send().await?;
        Self::decode(response).await
    }
}
