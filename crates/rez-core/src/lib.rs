//! # rez-core: Pure Checkout Billing Logic
//!
//! This crate prices a checkout bill. It contains the calculator, its
//! configuration, the domain types and the business-rule validation, as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ReZ Checkout Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile client (checkout screen)              │   │
//! │  │     Cart ──► Promo code ──► Coin sliders ──► Pay               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 rez-checkout (session, API client)              │   │
//! │  │     apply_promo, set_coin_usage, pay, retry/backoff             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ rez-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ │   │
//! │  │   │  types  │ │  money  │ │  bill   │ │  coins  │ │validation│ │   │
//! │  │   │LineItem │ │  Money  │ │compute_ │ │CoinPool │ │ façade   │ │   │
//! │  │   │PromoCode│ │  Rate   │ │  bill   │ │ caps    │ │  rules   │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, store terms, promo codes, coin usage, bill summary
//! - [`money`] - Money in minor units with whole-unit rounding
//! - [`config`] - Injectable billing rates and fees
//! - [`bill`] - The bill calculator
//! - [`coins`] - Coin balances and redemption caps
//! - [`validation`] - Business rules and the validating façade
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use rez_core::{compute_bill, BillingConfig, LineItem, Money, PromoCode, Rate, StoreTerms};
//!
//! let items = vec![
//!     LineItem::new(Money::from_major(75), 1, Rate::from_bps(1000)),
//!     LineItem::new(Money::from_major(25), 1, Rate::from_bps(1000)),
//! ];
//! let first10 = PromoCode::fixed("FIRST10", Money::from_major(10), Money::from_major(50));
//!
//! let bill = compute_bill(&items, &StoreTerms::default(), Some(&first10), None, &BillingConfig::default());
//! assert_eq!(bill.total_payable, Money::from_major(102));
//! assert_eq!(bill.savings, Money::from_major(10));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod coins;
pub mod config;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bill::compute_bill;
pub use coins::{CoinPool, CoinWallet};
pub use config::BillingConfig;
pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use types::*;
pub use validation::validated_compute_bill;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest single amount (price, fee, promo value, coin amount) the
/// validating façade accepts: ₹100 crore.
///
/// With `MAX_CART_ITEMS` and `MAX_ITEM_QUANTITY` this keeps every bill total
/// far inside `i64` paise.
pub const MAX_AMOUNT: Money = Money::from_major(1_000_000_000);
