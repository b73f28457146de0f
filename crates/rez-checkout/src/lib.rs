//! # rez-checkout: Checkout Orchestration for ReZ
//!
//! This crate wraps the pure calculator in `rez-core` with the plumbing a
//! checkout screen needs: a session holding the cart, promo and coin
//! sliders, a client for the promo-validation and payment endpoints, retry
//! with backoff, and layered configuration.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Orchestration                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   CheckoutSession (session.rs)                   │  │
//! │  │                                                                  │  │
//! │  │  items + store + promo + coin usage + wallet + BillingConfig     │  │
//! │  │  bill() / validated_bill() delegate to rez-core                  │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ apply_promo() / pay()                   │
//! │                               ▼                                         │
//! │  ┌────────────────────────────────────┐  ┌────────────────────────┐    │
//! │  │     CheckoutApi (api.rs)           │  │  CheckoutConfig        │    │
//! │  │                                    │  │  (config.rs)           │    │
//! │  │  HttpCheckoutApi: reqwest + JSON   │◄─│                        │    │
//! │  │  POST promo/validate, payments     │  │  defaults → TOML →     │    │
//! │  └─────────────────┬──────────────────┘  │  REZ_* env → validate  │    │
//! │                    │                     └────────────────────────┘    │
//! │                    ▼                                                    │
//! │  ┌────────────────────────────────────┐                                │
//! │  │     with_retry (retry.rs)          │                                │
//! │  │  per-attempt timeout, exponential  │                                │
//! │  │  backoff on retryable errors       │                                │
//! │  └────────────────────────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`session`] - `CheckoutSession` and `PaymentReceipt`
//! - [`api`] - Endpoint contracts, the `CheckoutApi` trait, the HTTP client
//! - [`retry`] - Timeout + backoff wrapper for network calls
//! - [`config`] - API and billing settings
//! - [`cart_file`] - Cart JSON files priced by the `rez-bill` binary
//! - [`error`] - Checkout error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chrono::Utc;
//! use rez_checkout::{CheckoutConfig, CheckoutSession, HttpCheckoutApi, PaymentMethod};
//! use rez_core::{CoinKind, CoinWallet, Money, StoreTerms};
//!
//! let config = CheckoutConfig::load_or_default(None);
//! let api = HttpCheckoutApi::new(&config.api)?;
//!
//! let mut session = CheckoutSession::new(items, StoreTerms::default(), wallet, config.billing_config());
//! session.apply_promo(&api, "FIRST10", Utc::now()).await?;
//! session.set_coin_usage(CoinKind::Rez, Money::from_major(20));
//!
//! let receipt = session.pay(&api, PaymentMethod::Upi, Utc::now()).await?;
//! println!("Order: {:?}", receipt.order_id);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod cart_file;
pub mod config;
pub mod error;
pub mod retry;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{
    CheckoutApi, HttpCheckoutApi, PaymentMethod, PaymentRequest, PaymentResponse, PromoValidationRequest,
    PromoValidationResponse,
};
pub use cart_file::CartFile;
pub use config::{ApiSettings, BillingSettings, CheckoutConfig};
pub use error::{CheckoutError, CheckoutResult};
pub use retry::{with_retry, RetryPolicy};
pub use session::{CheckoutSession, PaymentReceipt};
