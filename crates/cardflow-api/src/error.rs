//! # Relay Errors
//!
//! Every failing operation funnels through [`ErrorPolicy::relay`], which wraps
//! the cause with the name of the operation and marks it a client error.
//! [`ApiError`]'s `IntoResponse` is the single responder that formats the
//! `{ error: { message, stack? } }` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cardflow_core::ErrorEnvelope;
use std::error::Error as StdError;
use std::fmt::Write as _;
use thiserror::Error;
use tracing::error;

/// Prefix forced onto any error that mentions payment processing
pub const PAYMENT_ERROR_PREFIX: &str = "Payment processing error: ";

/// Error returned by relay handlers
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
    /// Source chain, logged always and exposed only outside production
    chain: String,
    expose_chain: bool,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status,
            chain: message.clone(),
            message,
            expose_chain: false,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Status and message after the payment-processing rewrite
    fn resolved(&self) -> (StatusCode, String) {
        if mentions_payment(&self.message) {
            (
                StatusCode::BAD_REQUEST,
                format!("{}{}", PAYMENT_ERROR_PREFIX, self.message),
            )
        } else {
            (self.status, self.message.clone())
        }
    }
}

/// Blunt heuristic: any message naming the provider or a payment is a
/// payment-processing failure.
fn mentions_payment(message: &str) -> bool {
    message.contains("stripe") || message.contains("payment")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.resolved();

        error!(status = %status, "Error: {}", message);
        error!("Stack: {}", self.chain);

        let stack = self.expose_chain.then_some(self.chain);
        (status, Json(ErrorEnvelope::new(message, stack))).into_response()
    }
}

/// Translates operation failures into [`ApiError`]s
#[derive(Debug, Clone, Copy)]
pub struct ErrorPolicy {
    expose_stack: bool,
}

impl ErrorPolicy {
    pub fn new(expose_stack: bool) -> Self {
        Self { expose_stack }
    }

    /// Wrap a failure of `operation` as a 400 client error.
    pub fn relay<E>(&self, operation: &str, err: &E) -> ApiError
    where
        E: StdError + ?Sized,
    {
        let message = format!("Failed to {}: {}", operation, err);
        ApiError {
            status: StatusCode::BAD_REQUEST,
            chain: source_chain(&message, err),
            message,
            expose_chain: self.expose_stack,
        }
    }

    /// Resource-not-found error in the standard envelope
    pub fn not_found(&self, message: impl Into<String>) -> ApiError {
        let mut err = ApiError::not_found(message);
        err.expose_chain = self.expose_stack;
        err
    }
}

fn source_chain<E>(head: &str, err: &E) -> String
where
    E: StdError + ?Sized,
{
    let mut chain = head.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(chain, "\n    caused by: {}", cause);
        source = cause.source();
    }
    chain
}
