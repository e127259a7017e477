//! # Request Handlers
//!
//! Axum request handlers for the relay API.
//! Each handler validates required fields, calls the provider and reshapes
//! the result into the flat JSON contract from `cardflow_core::contract`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, Uri},
    Json,
};
use cardflow_core::{
    Amount, CreateCustomerRequest, CreatePaymentIntentRequest, CreateSetupIntentRequest,
    CustomerCreated, DetachResult, HealthStatus, NewCustomer, PaymentError,
    PaymentIntentCreated, PaymentIntentParams, PaymentMethodList, PublishableConfig,
    SetupIntentCreated, DEFAULT_CURRENCY,
};
use tracing::{info, instrument, warn};

/// Treat missing and empty strings alike, as the browser sends both
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(message: &str) -> PaymentError {
    PaymentError::InvalidRequest(message.to_string())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

/// Publishable key for client-side initialization of the hosted card form
pub async fn config(State(state): State<AppState>) -> Json<PublishableConfig> {
    Json(PublishableConfig {
        publishable_key: state.publishable_key.to_string(),
    })
}

/// Create a customer
#[instrument(skip(state, body))]
pub async fn create_customer(
    State(state): State<AppState>,
    body: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<Json<CustomerCreated>, ApiError> {
    const OPERATION: &str = "create customer";

    let Json(request) = body.map_err(|e| state.errors.relay(OPERATION, &e))?;

    let email = non_empty(request.email)
        .ok_or_else(|| state.errors.relay(OPERATION, &required("Email is required")))?;

    let mut customer = NewCustomer::new(email);
    if let Some(name) = non_empty(request.name) {
        customer = customer.with_name(name);
    }

    let created = state
        .provider
        .create_customer(&customer)
        .await
        .map_err(|e| state.errors.relay(OPERATION, &e))?;

    info!("Created customer: {}", created.id);

    Ok(Json(CustomerCreated {
        customer_id: created.id,
        email: created.email,
    }))
}

/// Create a setup intent for saving a card without charging it
#[instrument(skip(state, body))]
pub async fn create_setup_intent(
    State(state): State<AppState>,
    body: Result<Json<CreateSetupIntentRequest>, JsonRejection>,
) -> Result<Json<SetupIntentCreated>, ApiError> {
    const OPERATION: &str = "create setup intent";

    // Every field is optional, so a bare POST is an empty request
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateSetupIntentRequest::default(),
        Err(e) => return Err(state.errors.relay(OPERATION, &e)),
    };
    let customer_id = non_empty(request.customer_id);

    let intent = state
        .provider
        .create_setup_intent(customer_id.as_deref())
        .await
        .map_err(|e| state.errors.relay(OPERATION, &e))?;

    info!(
        "Created setup intent: {} (customer={:?})",
        intent.id, customer_id
    );

    Ok(Json(SetupIntentCreated {
        client_secret: intent.client_secret,
        setup_intent_id: intent.id,
    }))
}

/// Charge a saved payment method.
///
/// `amount` arrives in decimal major units and is sent to the provider in
/// minor units. Nothing reaches the provider unless both the amount and the
/// payment method id are present.
#[instrument(skip(state, body))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    body: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<PaymentIntentCreated>, ApiError> {
    const OPERATION: &str = "create payment intent";

    let Json(request) = body.map_err(|e| state.errors.relay(OPERATION, &e))?;

    let (amount, payment_method_id) = match (
        request.amount.filter(|a| *a != 0.0),
        non_empty(request.payment_method_id),
    ) {
        (Some(amount), Some(pm)) => (amount, pm),
        _ => {
            return Err(state.errors.relay(
                OPERATION,
                &required("Amount and payment method ID are required"),
            ))
        }
    };

    let amount = Amount::from_major(amount).map_err(|e| state.errors.relay(OPERATION, &e))?;
    let currency = non_empty(request.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let mut params = PaymentIntentParams::new(amount, payment_method_id).with_currency(currency);
    if let Some(cid) = non_empty(request.customer_id) {
        params = params.with_customer(cid);
    }

    info!(
        "Charging {} ({} minor units) to {}",
        params.amount,
        params.amount.minor_units(),
        params.payment_method_id
    );

    let intent = state
        .provider
        .create_payment_intent(&params)
        .await
        .map_err(|e| state.errors.relay(OPERATION, &e))?;

    if intent.is_succeeded() {
        info!("Payment intent {} succeeded", intent.id);
    } else {
        warn!("Payment intent {} ended in status {}", intent.id, intent.status);
    }

    Ok(Json(PaymentIntentCreated {
        client_secret: intent.client_secret,
        status: intent.status,
    }))
}

/// List a customer's saved card payment methods
#[instrument(skip(state))]
pub async fn list_payment_methods(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<PaymentMethodList>, ApiError> {
    const OPERATION: &str = "retrieve payment methods";

    let payment_methods = state
        .provider
        .list_card_payment_methods(&customer_id)
        .await
        .map_err(|e| state.errors.relay(OPERATION, &e))?;

    info!(
        "Customer {} has {} saved card(s)",
        customer_id,
        payment_methods.len()
    );

    Ok(Json(PaymentMethodList { payment_methods }))
}

/// Detach (remove) a saved payment method
#[instrument(skip(state))]
pub async fn detach_payment_method(
    State(state): State<AppState>,
    Path(payment_method_id): Path<String>,
) -> Result<Json<DetachResult>, ApiError> {
    const OPERATION: &str = "remove payment method";

    state
        .provider
        .detach_payment_method(&payment_method_id)
        .await
        .map_err(|e| state.errors.relay(OPERATION, &e))?;

    info!("Removed payment method {}", payment_method_id);

    Ok(Json(DetachResult { success: true }))
}

/// JSON 404 for unknown API routes
pub async fn not_found(State(state): State<AppState>, method: Method, uri: Uri) -> ApiError {
    warn!("No route for {} {}", method, uri.path());
    state.errors.not_found("Route not found")
}
