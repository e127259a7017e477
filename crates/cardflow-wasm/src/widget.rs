//! Boundary to the hosted card form.
//!
//! Card numbers never touch this crate: the widget collects them in the
//! provider's iframe and confirms the setup intent itself.

use async_trait::async_trait;
use thiserror::Error;

/// Path the provider redirects to when confirmation needs a full page load
pub const RETURN_PATH: &str = "/payment-complete";

/// The hosted form could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct WidgetError(pub String);

/// Result of submitting the hosted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    /// The setup intent succeeded and the card is saved
    Confirmed,
    /// Validation, authentication or provider failure, as shown to the user
    Failed(String),
}

#[async_trait(?Send)]
pub trait CardWidget {
    /// Mount the hosted form for a setup intent
    fn mount(&mut self, publishable_key: &str, client_secret: &str) -> Result<(), WidgetError>;

    /// Confirm the setup intent with whatever the user entered
    async fn confirm(&mut self) -> WidgetOutcome;

    /// Tear the hosted form down. No-op when nothing is mounted.
    fn unmount(&mut self);
}
