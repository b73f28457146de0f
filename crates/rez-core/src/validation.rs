//! # Validation Module
//!
//! Business rules the checkout must satisfy before a bill is charged, and the
//! validating façade around the calculator.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Rules Are Enforced                           │
//! │                                                                         │
//! │  compute_bill()            prices anything, never fails                │
//! │       ▲                                                                 │
//! │       │ only after every check passes                                   │
//! │       │                                                                 │
//! │  validated_compute_bill()  THIS MODULE                                  │
//! │  ├── line items (quantity, price, cashback %)                          │
//! │  ├── cart size                                                          │
//! │  ├── store terms and minimum order                                      │
//! │  ├── promo: min order value, expiry, discount value                    │
//! │  └── coins: non-negative, balance, usage cap                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::Utc;
//! use rez_core::validation::validated_compute_bill;
//! use rez_core::{BillRequest, BillingConfig, LineItem, Money, PromoCode, Rate};
//!
//! let request = BillRequest {
//!     items: vec![LineItem::new(Money::from_major(40), 1, Rate::zero())],
//!     promo: Some(PromoCode::fixed("FIRST10", Money::from_major(10), Money::from_major(50))),
//!     ..BillRequest::default()
//! };
//!
//! // ₹40 is below the promo's ₹50 minimum
//! let result = validated_compute_bill(&request, None, &BillingConfig::default(), Utc::now());
//! assert!(result.is_err());
//! ```

use chrono::{DateTime, Utc};

use crate::bill::compute_bill;
use crate::coins::CoinWallet;
use crate::config::BillingConfig;
use crate::money::Money;
use crate::types::{
    BillRequest, BillSummary, CoinKind, CoinUsage, LineItem, PromoCode, PromoDiscount, Rate, StoreTerms,
};
use crate::{MAX_AMOUNT, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

pub use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates that an amount is not negative. Zero is allowed.
///
/// ```rust
/// use rez_core::validation::validate_non_negative;
/// use rez_core::Money;
///
/// assert!(validate_non_negative("price", Money::zero()).is_ok());
/// assert!(validate_non_negative("price", Money::from_minor(-1)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an input amount: not negative and at most [`MAX_AMOUNT`].
///
/// Applied to every amount before it is multiplied or summed, so the
/// calculator never overflows on input that passed validation.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    validate_non_negative(field, amount)?;

    if amount > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT.minor(),
        });
    }

    Ok(())
}

/// Validates a rate is within 0-100%.
pub fn validate_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    if !rate.is_valid_percentage() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: Rate::BPS_SCALE as i64,
        });
    }

    Ok(())
}

/// Validates cart size (number of line items).
pub fn validate_cart_size(items: usize) -> ValidationResult<()> {
    if items > MAX_CART_ITEMS {
        return Err(ValidationError::CartTooLarge {
            max: MAX_CART_ITEMS,
        });
    }

    Ok(())
}

/// Validates one cart line.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_quantity(item.quantity)?;
    validate_amount("price", item.price)?;
    validate_rate("cashback_percentage", item.cashback_percentage)
}

/// Validates store terms and the minimum order.
///
/// An empty cart is not held to the minimum; there is nothing to order yet.
pub fn validate_store_terms(store: &StoreTerms, item_total: Money, has_items: bool) -> ValidationResult<()> {
    validate_amount("delivery_fee", store.delivery_fee)?;
    validate_amount("minimum_order", store.minimum_order)?;

    if has_items && item_total < store.minimum_order {
        return Err(ValidationError::BelowMinimumOrder {
            subtotal: item_total,
            minimum: store.minimum_order,
        });
    }

    Ok(())
}

/// Validates that a promo can be applied to a cart of `item_total` at `now`.
pub fn validate_promo(promo: &PromoCode, item_total: Money, now: DateTime<Utc>) -> ValidationResult<()> {
    match promo.discount {
        PromoDiscount::Fixed { amount } => validate_amount("discount_value", amount)?,
        PromoDiscount::Percentage { rate } | PromoDiscount::Cashback { rate } => {
            validate_rate("discount_value", rate)?
        }
    }
    if let Some(cap) = promo.max_discount {
        validate_amount("max_discount", cap)?;
    }

    if let Some(expired_at) = promo.valid_until.filter(|_| promo.is_expired_at(now)) {
        return Err(ValidationError::PromoExpired {
            code: promo.code.clone(),
            expired_at,
        });
    }

    if !promo.is_applicable_to(item_total) {
        return Err(ValidationError::PromoNotApplicable {
            code: promo.code.clone(),
            min_order_value: promo.min_order_value,
            subtotal: item_total,
        });
    }

    Ok(())
}

/// Validates coin usage, against the wallet when one is supplied.
pub fn validate_coin_usage(
    usage: &CoinUsage,
    wallet: Option<&CoinWallet>,
    item_total: Money,
) -> ValidationResult<()> {
    for kind in CoinKind::ALL {
        validate_amount(&format!("{kind} coins"), usage.get(kind))?;
    }

    match wallet {
        Some(wallet) => wallet.check(usage, item_total),
        None => Ok(()),
    }
}

// =============================================================================
// Validating Façade
// =============================================================================

/// Checks every business rule, then prices the request with [`compute_bill`].
///
/// ## User Workflow
/// ```text
/// Tap "Pay ₹102"
///      │
///      ▼
/// validated_compute_bill() ← THIS FUNCTION
///      │
///      ├── promo below minimum?  → PromoNotApplicable
///      ├── coins over balance?   → InsufficientCoins
///      │
///      └── OK → BillSummary.total_payable sent to the payment endpoint
/// ```
pub fn validated_compute_bill(
    request: &BillRequest,
    wallet: Option<&CoinWallet>,
    config: &BillingConfig,
    now: DateTime<Utc>,
) -> ValidationResult<BillSummary> {
    config.validate()?;

    validate_cart_size(request.items.len())?;
    for item in &request.items {
        validate_line_item(item)?;
    }

    let item_total = request.item_total();
    validate_store_terms(&request.store, item_total, !request.items.is_empty())?;

    if let Some(promo) = &request.promo {
        validate_promo(promo, item_total, now)?;
    }

    if let Some(usage) = &request.coin_usage {
        validate_coin_usage(usage, wallet, item_total)?;
    }

    Ok(compute_bill(
        &request.items,
        &request.store,
        request.promo.as_ref(),
        request.coin_usage.as_ref(),
        config,
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
