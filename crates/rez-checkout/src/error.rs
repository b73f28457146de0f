//! # Checkout Error Types
//!
//! Error types for checkout operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Protocol            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  DeserializationFailed  │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  SerializationFailed    │ │
//! │  │  ConfigLoad/Save│  │  HttpStatus     │  │  CartFileUnreadable     │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Business                                                       │   │
//! │  │  Validation (rez-core) · PromoRejected · PaymentDeclined · Empty│   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rez_core::ValidationError;
use thiserror::Error;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Checkout error type covering every failure the checkout screen surfaces.
#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid checkout configuration.
    #[error("Invalid checkout configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Could not reach the checkout API.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request did not complete in time.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// API answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// Failed to serialize a request or file.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Failed to decode a response or file.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Cart file could not be read.
    #[error("Failed to read cart file {path}: {message}")]
    CartFileUnreadable { path: String, message: String },

    // =========================================================================
    // Business Errors
    // =========================================================================
    /// Bill inputs broke a business rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Promo validation endpoint refused the code.
    #[error("Promo code {code} rejected: {reason}")]
    PromoRejected { code: String, reason: String },

    /// Payment endpoint declined the charge.
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::DeserializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for CheckoutError {
    fn from(err: url::ParseError) -> Self {
        CheckoutError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for CheckoutError {
    fn from(err: std::io::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CheckoutError {
    fn from(err: toml::ser::Error) -> Self {
        CheckoutError::ConfigSaveFailed(err.to_string())
    }
}

impl From<reqwest::Error> for CheckoutError {
    fn from(err: reqwest::Error) -> Self {
        // Per-attempt timeouts are enforced by the retry helper; a reqwest
        // timeout here can only be the connect timeout.
        if let Some(status) = err.status() {
            CheckoutError::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            CheckoutError::DeserializationFailed(err.to_string())
        } else {
            CheckoutError::ConnectionFailed(err.to_string())
        }
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl CheckoutError {
    /// Returns true if the request can be retried.
    ///
    /// ## Retryable Errors
    /// - Connection failures and timeouts
    /// - 5xx responses and 429 Too Many Requests
    ///
    /// ## Non-Retryable Errors
    /// - Configuration, protocol and business errors
    /// - Other 4xx responses
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::ConnectionFailed(_) | CheckoutError::Timeout(_) => true,
            CheckoutError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::InvalidConfig(_)
                | CheckoutError::InvalidUrl(_)
                | CheckoutError::ConfigLoadFailed(_)
                | CheckoutError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the user can fix this by changing the cart, promo or coins.
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            CheckoutError::Validation(_)
                | CheckoutError::PromoRejected { .. }
                | CheckoutError::PaymentDeclined(_)
                | CheckoutError::EmptyCart
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rez_core::Money;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::ConnectionFailed("reset".into()).is_retryable());
        assert!(CheckoutError::Timeout(10).is_retryable());
        assert!(CheckoutError::HttpStatus {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
        assert!(CheckoutError::HttpStatus {
            status: 429,
            message: "slow down".into()
        }
        .is_retryable());

        assert!(!CheckoutError::HttpStatus {
            status: 400,
            message: "bad request".into()
        }
        .is_retryable());
        assert!(!CheckoutError::PaymentDeclined("card".into()).is_retryable());
        assert!(!CheckoutError::InvalidConfig("bad".into()).is_retryable());
    }

    #[test]
    fn test_validation_converts() {
        let err: CheckoutError = ValidationError::BelowMinimumOrder {
            subtotal: Money::from_major(80),
            minimum: Money::from_major(99),
        }
        .into();

        assert!(matches!(err, CheckoutError::Validation(_)));
        assert!(err.is_user_fixable());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = CheckoutError::PromoRejected {
            code: "SAVE15".into(),
            reason: "Minimum order ₹80".into(),
        };
        assert_eq!(err.to_string(), "Promo code SAVE15 rejected: Minimum order ₹80");
    }
}
