//! # Stripe Provider
//!
//! `PaymentProvider` over the Stripe REST API.
//! One instance (and its connection pool) is built at startup and shared
//! by every request.

use crate::config::StripeConfig;
use crate::types::{
    StripeCustomer, StripeErrorResponse, StripeList, StripePaymentIntent, StripePaymentMethod,
    StripeSetupIntent,
};
use async_trait::async_trait;
use cardflow_core::{
    Customer, NewCustomer, PaymentError, PaymentIntent, PaymentIntentParams,
    PaymentMethodSummary, PaymentProvider, PaymentResult, SetupIntent,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const PROVIDER: &str = "stripe";

/// Stripe implementation of the provider seam
pub struct StripeProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        if config.is_test_mode() {
            info!("Stripe provider using test-mode keys");
        } else {
            warn!("Stripe provider using live keys");
        }

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// The key the browser initializes Stripe.js with
    pub fn publishable_key(&self) -> &str {
        &self.config.publishable_key
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/v1/{}", self.config.api_base_url, path);
        self.client
            .request(method, url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
    }

    /// Send a request and decode the Stripe object or error envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> PaymentResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                let err = error_response.error;
                debug!(
                    "Stripe error detail: type={:?}, code={:?}",
                    err.error_type, err.code
                );
                if let Some(message) = err.message {
                    return Err(PaymentError::provider(PROVIDER, message));
                }
            }

            return Err(PaymentError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self, customer))]
    async fn create_customer(&self, customer: &NewCustomer) -> PaymentResult<Customer> {
        let mut form_params: Vec<(&str, String)> = vec![("email", customer.email.clone())];
        if let Some(ref name) = customer.name {
            form_params.push(("name", name.clone()));
        }

        let created: StripeCustomer = self
            .send(self.request(Method::POST, "customers").form(&form_params))
            .await?;

        info!("Created Stripe customer: id={}", created.id);
        Ok(created.into())
    }

    #[instrument(skip(self))]
    async fn create_setup_intent(&self, customer_id: Option<&str>) -> PaymentResult<SetupIntent> {
        let mut form_params: Vec<(&str, String)> = vec![
            ("payment_method_types[0]", "card".to_string()),
            ("usage", "off_session".to_string()),
        ];
        if let Some(cid) = customer_id {
            form_params.push(("customer", cid.to_string()));
        }

        let intent: StripeSetupIntent = self
            .send(self.request(Method::POST, "setup_intents").form(&form_params))
            .await?;

        info!("Created Stripe setup intent: id={}", intent.id);
        Ok(intent.into())
    }

    #[instrument(skip(self, params), fields(amount = params.amount.minor_units(), currency = %params.currency))]
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> PaymentResult<PaymentIntent> {
        let mut form_params: Vec<(&str, String)> = vec![
            ("amount", params.amount.minor_units().to_string()),
            ("currency", params.currency.clone()),
            ("payment_method", params.payment_method_id.clone()),
            ("confirmation_method", "manual".to_string()),
            ("confirm", "true".to_string()),
            ("return_url", self.config.return_url.clone()),
        ];
        if let Some(ref cid) = params.customer_id {
            form_params.push(("customer", cid.clone()));
        }

        let intent: StripePaymentIntent = self
            .send(self.request(Method::POST, "payment_intents").form(&form_params))
            .await?;

        info!(
            "Created Stripe payment intent: id={}, status={}",
            intent.id, intent.status
        );
        Ok(intent.into())
    }

    #[instrument(skip(self))]
    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> PaymentResult<Vec<PaymentMethodSummary>> {
        let list: StripeList<StripePaymentMethod> = self
            .send(
                self.request(Method::GET, "payment_methods")
                    .query(&[("customer", customer_id), ("type", "card")]),
            )
            .await?;

        let methods: Vec<PaymentMethodSummary> = list
            .data
            .into_iter()
            .map(PaymentMethodSummary::from)
            .filter(PaymentMethodSummary::is_card)
            .collect();

        debug!("Listed {} card payment methods", methods.len());
        Ok(methods)
    }

    #[instrument(skip(self))]
    async fn detach_payment_method(&self, payment_method_id: &str) -> PaymentResult<()> {
        let path = format!("payment_methods/{}/detach", payment_method_id);
        let detached: StripePaymentMethod = self.send(self.request(Method::POST, &path)).await?;

        info!("Detached Stripe payment method: id={}", detached.id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardflow_core::Amount;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider_for(server: &MockServer) -> StripeProvider {
        let config = StripeConfig::new("sk_test_abc123", "pk_test_xyz789")
            .with_api_base_url(server.uri());
        StripeProvider::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_create_customer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .and(header("Authorization", "Bearer sk_test_abc123"))
            .and(header("Stripe-Version", "2023-10-16"))
            .and(body_string_contains("email=a%40b.com"))
            .and(body_string_contains("name=A+B"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cus_123",
                "object": "customer",
                "email": "a@b.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let customer = provider
            .create_customer(&NewCustomer::new("a@b.com").with_name("A B"))
            .await
            .unwrap();

        assert_eq!(customer.id, "cus_123");
        assert_eq!(customer.email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_create_setup_intent_for_customer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/setup_intents"))
            .and(body_string_contains("customer=cus_123"))
            .and(body_string_contains("usage=off_session"))
            .and(body_string_contains("payment_method_types%5B0%5D=card"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "seti_1",
                "object": "setup_intent",
                "client_secret": "seti_1_secret_abc",
                "status": "requires_payment_method"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let intent = provider.create_setup_intent(Some("cus_123")).await.unwrap();

        assert_eq!(intent.id, "seti_1");
        assert_eq!(intent.client_secret, "seti_1_secret_abc");
    }

    #[tokio::test]
    async fn test_create_payment_intent_sends_minor_units() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(body_string_contains("amount=1000"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("payment_method=pm_1"))
            .and(body_string_contains("confirmation_method=manual"))
            .and(body_string_contains("confirm=true"))
            .and(body_string_contains("customer=cus_123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_1",
                "object": "payment_intent",
                "client_secret": "pi_1_secret_abc",
                "status": "succeeded"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let params = PaymentIntentParams::new(Amount::from_major(10.00).unwrap(), "pm_1")
            .with_customer("cus_123");
        let intent = provider.create_payment_intent(&params).await.unwrap();

        assert!(intent.is_succeeded());
        assert_eq!(intent.client_secret.as_deref(), Some("pi_1_secret_abc"));
    }

    #[tokio::test]
    async fn test_list_card_payment_methods() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payment_methods"))
            .and(query_param("customer", "cus_123"))
            .and(query_param("type", "card"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "has_more": false,
                "data": [
                    {
                        "id": "pm_1",
                        "type": "card",
                        "card": {"brand": "visa", "last4": "4242", "exp_month": 12, "exp_year": 2030}
                    },
                    {
                        "id": "pm_2",
                        "type": "link"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let methods = provider.list_card_payment_methods("cus_123").await.unwrap();

        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].id, "pm_1");
        assert_eq!(methods[0].card.as_ref().unwrap().brand, "visa");
    }

    #[tokio::test]
    async fn test_detach_payment_method() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_methods/pm_1/detach"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pm_1",
                "type": "card",
                "customer": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        provider.detach_payment_method("pm_1").await.unwrap();
    }

    #[tokio::test]
    async fn test_stripe_error_message_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({
                "error": {
                    "type": "card_error",
                    "code": "card_declined",
                    "message": "Your card was declined."
                }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let params = PaymentIntentParams::new(Amount::from_minor(1000), "pm_1");
        let err = provider.create_payment_intent(&params).await.unwrap_err();

        assert!(matches!(err, PaymentError::ProviderError { .. }));
        assert_eq!(err.to_string(), "Your card was declined.");
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payment_methods"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider.list_card_payment_methods("cus_123").await.unwrap_err();

        assert!(err.to_string().contains("HTTP 500"));
    }
}
