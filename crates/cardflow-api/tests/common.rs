//! Common test utilities for relay integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use async_trait::async_trait;
use axum_test::TestServer;
use cardflow_api::{create_router, AppConfig, AppState};
use cardflow_core::{
    CardSummary, Customer, NewCustomer, PaymentError, PaymentIntent, PaymentIntentParams,
    PaymentMethodSummary, PaymentProvider, PaymentResult, SetupIntent,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const PUBLISHABLE_KEY: &str = "pk_test_relay";

/// In-memory provider recording every call it receives
#[derive(Default)]
pub struct FakeProvider {
    inner: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    next_id: u32,
    customers: HashMap<String, Vec<PaymentMethodSummary>>,
    charges: Vec<PaymentIntentParams>,
    setup_customers: Vec<Option<String>>,
    decline_charges: bool,
}

impl FakeProvider {
    pub fn visa() -> PaymentMethodSummary {
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

    /// Simulate the hosted form saving a card for the customer
    pub fn save_card(&self, customer_id: &str, method: PaymentMethodSummary) {
        let mut state = self.inner.lock().unwrap();
        state
            .customers
            .entry(customer_id.to_string())
            .or_default()
            .push(method);
    }

    pub fn decline_charges(&self) {
        self.inner.lock().unwrap().decline_charges = true;
    }

    pub fn charges(&self) -> Vec<PaymentIntentParams> {
        self.inner.lock().unwrap().charges.clone()
    }

    pub fn customer_count(&self) -> usize {
        self.inner.lock().unwrap().customers.len()
    }

    pub fn setup_customers(&self) -> Vec<Option<String>> {
        self.inner.lock().unwrap().setup_customers.clone()
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn create_customer(&self, customer: &NewCustomer) -> PaymentResult<Customer> {
        let mut state = self.inner.lock().unwrap();
        state.next_id += 1;
        let id = format!("cus_{}", state.next_id);
        state.customers.insert(id.clone(), Vec::new());
        Ok(Customer {
            id,
            email: Some(customer.email.clone()),
        })
    }

    async fn create_setup_intent(&self, customer_id: Option<&str>) -> PaymentResult<SetupIntent> {
        let mut state = self.inner.lock().unwrap();
        if let Some(cid) = customer_id {
            if !state.customers.contains_key(cid) {
                return Err(PaymentError::provider(
                    "fake",
                    format!("No such customer: '{}'", cid),
                ));
            }
        }
        state.next_id += 1;
        state.setup_customers.push(customer_id.map(String::from));
        let id = format!("seti_{}", state.next_id);
        Ok(SetupIntent {
            client_secret: format!("{}_secret", id),
            id,
            status: "requires_payment_method".to_string(),
        })
    }

    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> PaymentResult<PaymentIntent> {
        let mut state = self.inner.lock().unwrap();
        state.charges.push(params.clone());
        if state.decline_charges {
            return Err(PaymentError::provider("fake", "Your card was declined."));
        }
        state.next_id += 1;
        let id = format!("pi_{}", state.next_id);
        Ok(PaymentIntent {
            client_secret: Some(format!("{}_secret", id)),
            id,
            status: "succeeded".to_string(),
        })
    }

    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> PaymentResult<Vec<PaymentMethodSummary>> {
        let state = self.inner.lock().unwrap();
        state
            .customers
            .get(customer_id)
            .cloned()
            .ok_or_else(|| {
                PaymentError::provider("fake", format!("No such customer: '{}'", customer_id))
            })
    }

    async fn detach_payment_method(&self, payment_method_id: &str) -> PaymentResult<()> {
        let mut state = self.inner.lock().unwrap();
        for methods in state.customers.values_mut() {
            if let Some(pos) = methods.iter().position(|m| m.id == payment_method_id) {
                methods.remove(pos);
                return Ok(());
            }
        }
        Err(PaymentError::provider(
            "fake",
            format!("No such PaymentMethod: '{}'", payment_method_id),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Test harness: router over a fake provider
pub struct TestHarness {
    pub server: TestServer,
    pub provider: Arc<FakeProvider>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn production() -> Self {
        Self::with_config(AppConfig {
            environment: "production".to_string(),
            static_dir: std::env::temp_dir().join("cardflow-missing-static"),
            ..AppConfig::default()
        })
    }

    pub fn with_config(config: AppConfig) -> Self {
        let provider = Arc::new(FakeProvider::default());
        let state = AppState::new(config, provider.clone(), PUBLISHABLE_KEY);
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self { server, provider }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
