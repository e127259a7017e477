//! # Amounts
//!
//! Charge amounts arrive from the browser as decimal major units (`10.00`)
//! and leave for the provider as integer minor units (`1000`).

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// Minor units per major unit. Only two-decimal currencies are relayed.
const MINOR_PER_MAJOR: f64 = 100.0;

/// A positive charge amount held in minor units (cents for USD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    minor: i64,
}

impl Amount {
    /// Convert a decimal major-unit amount.
    ///
    /// Rounds half away from zero (`f64::round`), which for the positive
    /// amounts accepted here matches JavaScript's `Math.round(a * 100)`.
    pub fn from_major(amount: f64) -> PaymentResult<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PaymentError::InvalidRequest(
                "Amount must be a positive number".to_string(),
            ));
        }

        let minor = (amount * MINOR_PER_MAJOR).round();
        if minor < 1.0 || minor > i64::MAX as f64 {
            return Err(PaymentError::InvalidRequest(format!(
                "Amount out of range: {}",
                amount
            )));
        }

        Ok(Self {
            minor: minor as i64,
        })
    }

    /// Create from minor units directly
    pub fn from_minor(minor: i64) -> Self {
        Self { minor }
    }

    /// Amount in the provider's minor-unit integer
    pub fn minor_units(&self) -> i64 {
        self.minor
    }

    /// Decimal major-unit value
    pub fn as_major(&self) -> f64 {
        self.minor as f64 / MINOR_PER_MAJOR
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        format!("${:.2}", self.as_major())
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_amount() {
        assert_eq!(Amount::from_major(10.00).unwrap().minor_units(), 1000);
        assert_eq!(Amount::from_major(19.99).unwrap().minor_units(), 1999);
    }

    #[test]
    fn test_half_cent_rounds_up() {
        // 0.505 * 100 is exactly 50.5 in binary floating point
        assert_eq!(Amount::from_major(0.505).unwrap().minor_units(), 51);
        assert_eq!(Amount::from_major(0.125).unwrap().minor_units(), 13);
    }

    #[test]
    fn test_representation_error_is_not_corrected() {
        // 1.005 * 100 evaluates to 100.49999999999999
        assert_eq!(Amount::from_major(1.005).unwrap().minor_units(), 100);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(Amount::from_major(0.0).is_err());
        assert!(Amount::from_major(-5.0).is_err());
        assert!(Amount::from_major(f64::NAN).is_err());
        assert!(Amount::from_major(f64::INFINITY).is_err());
        // rounds to zero cents
        assert!(Amount::from_major(0.004).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_major(10.0).unwrap().display(), "$10.00");
        assert_eq!(Amount::from_minor(5).to_string(), "$0.05");
    }
}
