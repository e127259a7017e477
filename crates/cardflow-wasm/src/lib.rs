//! # cardflow-wasm
//!
//! Browser workflow for cardflow-rs.
//!
//! This crate provides:
//! - The save → display → charge → replace state machine
//! - A relay client for the `/api/stripe` endpoints
//! - Stripe.js bindings for the hosted card form (wasm32 only)
//! - Amount helpers for the charge input
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

pub mod controller;
pub mod relay;
pub mod widget;
pub mod workflow;

#[cfg(target_arch = "wasm32")]
pub mod browser;

use cardflow_core::Amount;
use wasm_bindgen::prelude::*;

pub use controller::{Action, CustomerProfile, Workflow, WorkflowError};
pub use relay::{HttpRelayClient, RelayClient, RelayError};
pub use widget::{CardWidget, WidgetError, WidgetOutcome};
pub use workflow::{ChargeStatus, WorkflowState, WorkflowView};

/// Format minor units for display (e.g., 1000 → "$10.00")
#[wasm_bindgen]
pub fn format_amount(minor_units: i64) -> String {
    Amount::from_minor(minor_units).display()
}

/// Minor units the relay will charge for a decimal amount
#[wasm_bindgen]
pub fn minor_units(amount: f64) -> Result<i64, JsValue> {
    Amount::from_major(amount)
        .map(|a| a.minor_units())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1000), "$10.00");
        assert_eq!(format_amount(51), "$0.51");
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(minor_units(10.00).ok(), Some(1000));
        assert_eq!(minor_units(0.505).ok(), Some(51));
    }

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
