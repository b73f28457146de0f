//! # Error Types
//!
//! Domain error types for rez-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rez-core (this file)                                                   │
//! │  └── ValidationError  - a bill input breaks a business rule             │
//! │                                                                         │
//! │  rez-checkout                                                           │
//! │  └── CheckoutError    - config, transport, API and validation failures │
//! │                                                                         │
//! │  Flow: ValidationError → CheckoutError → checkout screen                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `compute_bill` itself has no error path. These errors come from the
//! validating façade and the field validators.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::money::Money;
use crate::types::CoinKind;

/// A bill input that violates a business rule.
///
/// Every variant carries enough context for the checkout screen to tell the
/// user what to change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Cart has more line items than allowed.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item subtotal is below the store's minimum order.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: ₹80, store minimum ₹99
    ///      │
    ///      ▼
    /// BelowMinimumOrder { subtotal: ₹80.00, minimum: ₹99.00 }
    ///      │
    ///      ▼
    /// UI shows: "Add ₹19.00 more to place this order"
    /// ```
    #[error("Order subtotal {subtotal} is below the store minimum of {minimum}")]
    BelowMinimumOrder { subtotal: Money, minimum: Money },

    /// Promo requires a larger item subtotal.
    #[error("Promo {code} requires a minimum order of {min_order_value}, cart is {subtotal}")]
    PromoNotApplicable {
        code: String,
        min_order_value: Money,
        subtotal: Money,
    },

    /// Promo is past its expiry.
    #[error("Promo {code} expired at {expired_at}")]
    PromoExpired {
        code: String,
        expired_at: DateTime<Utc>,
    },

    /// More coins requested than the pool holds.
    #[error("Insufficient {kind} coins: available {available}, requested {requested}")]
    InsufficientCoins {
        kind: CoinKind,
        available: Money,
        requested: Money,
    },

    /// Coin usage exceeds the pool's share of the order value.
    #[error("{kind} coins can cover at most {cap} of this order, requested {requested}")]
    CoinUsageCapExceeded {
        kind: CoinKind,
        cap: Money,
        requested: Money,
    },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::InsufficientCoins {
            kind: CoinKind::Rez,
            available: Money::from_major(40),
            requested: Money::from_major(50),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient rez coins: available ₹40.00, requested ₹50.00"
        );

        let err = ValidationError::BelowMinimumOrder {
            subtotal: Money::from_major(80),
            minimum: Money::from_major(99),
        };
        assert_eq!(
            err.to_string(),
            "Order subtotal ₹80.00 is below the store minimum of ₹99.00"
        );
    }

    #[test]
    fn test_field_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        };
        assert_eq!(err.to_string(), "tax_rate must be between 0 and 10000");
    }
}
