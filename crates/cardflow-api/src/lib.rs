//! # cardflow-api
//!
//! HTTP relay between the browser workflow and the payment provider.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The six `/api/stripe` relay operations
//! - A single error translator and responder
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/health` | Health check |
//! | GET | `/api/stripe/config` | Publishable key |
//! | POST | `/api/stripe/customer` | Create customer |
//! | POST | `/api/stripe/create-setup-intent` | Create setup intent |
//! | POST | `/api/stripe/create-payment-intent` | Charge a saved method |
//! | GET | `/api/stripe/customer/{id}/payment-methods` | List saved cards |
//! | DELETE | `/api/stripe/payment-method/{id}` | Remove a saved card |

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorPolicy};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
