//! # Bill Calculator
//!
//! Turns a cart, store terms, an optional promo and optional coin usage into
//! an itemized [`BillSummary`].
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         compute_bill()                                  │
//! │                                                                         │
//! │   1. item_total          = Σ price × quantity                           │
//! │   2. get_and_item_total  = round(item_total × service charge)          │
//! │   3. delivery_fee        = store.delivery_fee                           │
//! │   4. platform_fee        = config.platform_fee                          │
//! │   5. taxes               = round(item_total × tax rate)                │
//! │   6. promo_discount      = FIXED flat | PERCENTAGE capped | else 0      │
//! │   7. coin_discount       = rez + promo + store_promo                    │
//! │   8. subtotal            = 1 + 2 + 3 + 4 + 5                            │
//! │   9. after discounts     = 8 − 6 − 7                                    │
//! │  10. round_off           = round(9) − 9                                 │
//! │  11. total_payable       = max(0, 9 + 10)                               │
//! │  12. cashback_earned     = round(Σ line × cashback %)   (gross prices) │
//! │  13. savings             = round(6 + 7)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 9-11 depend on every earlier total, so the order is fixed.
//!
//! ## Trust Model
//! The calculator never fails. It does not check the store minimum, promo
//! applicability or coin balances; it prices whatever it is given. Use
//! [`crate::validation::validated_compute_bill`] when those rules must hold.
//!
//! ## Example
//! ```rust
//! use rez_core::{compute_bill, BillingConfig, LineItem, Money, Rate, StoreTerms};
//!
//! let items = vec![
//!     LineItem::new(Money::from_major(75), 1, Rate::from_bps(1000)),
//!     LineItem::new(Money::from_major(25), 1, Rate::from_bps(1000)),
//! ];
//! let bill = compute_bill(&items, &StoreTerms::default(), None, None, &BillingConfig::default());
//!
//! assert_eq!(bill.item_total, Money::from_major(100));
//! assert_eq!(bill.total_payable, Money::from_major(112));
//! assert_eq!(bill.cashback_earned, Money::from_major(10));
//! ```

use crate::config::BillingConfig;
use crate::money::Money;
use crate::types::{BillRequest, BillSummary, CoinUsage, LineItem, PromoCode, PromoDiscount, StoreTerms};

/// Computes the itemized bill. Pure and deterministic.
pub fn compute_bill(
    items: &[LineItem],
    store: &StoreTerms,
    promo: Option<&PromoCode>,
    coin_usage: Option<&CoinUsage>,
    config: &BillingConfig,
) -> BillSummary {
    let item_total: Money = items.iter().map(LineItem::line_total).sum();
    let get_and_item_total = item_total.apply_rate_rounded(config.service_charge_rate);
    let delivery_fee = store.delivery_fee;
    let platform_fee = config.platform_fee;
    let taxes = item_total.apply_rate_rounded(config.tax_rate);

    let promo_discount = promo.map_or(Money::zero(), |p| promo_discount(p, item_total));
    let coin_discount = coin_usage.map_or(Money::zero(), CoinUsage::total);

    let subtotal_before_discounts =
        item_total + get_and_item_total + delivery_fee + platform_fee + taxes;
    let total_after_discounts = subtotal_before_discounts - promo_discount - coin_discount;

    let round_off = total_after_discounts.round_to_major() - total_after_discounts;
    let total_payable = (total_after_discounts + round_off).max(Money::zero());

    BillSummary {
        item_total,
        get_and_item_total,
        delivery_fee,
        platform_fee,
        taxes,
        promo_discount,
        coin_discount,
        subtotal_before_discounts,
        total_after_discounts,
        round_off,
        total_payable,
        cashback_earned: cashback_earned(items),
        savings: (promo_discount + coin_discount).round_to_major(),
    }
}

/// Discount a promo yields on the given item total.
///
/// Applicability (`min_order_value`, expiry) is not checked here.
pub fn promo_discount(promo: &PromoCode, item_total: Money) -> Money {
    match promo.discount {
        PromoDiscount::Fixed { amount } => amount,
        PromoDiscount::Percentage { rate } => {
            let raw = item_total.apply_rate_rounded(rate);
            match promo.max_discount {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        }
        PromoDiscount::Cashback { .. } => Money::zero(),
    }
}

/// Cashback on gross line prices, rounded once over the whole cart.
pub fn cashback_earned(items: &[LineItem]) -> Money {
    let raw: i128 = items
        .iter()
        .map(|item| item.line_total().minor() as i128 * item.cashback_percentage.bps() as i128)
        .sum();
    Money::round_rate_product(raw)
}

impl BillRequest {
    /// Prices this request with [`compute_bill`].
    pub fn compute(&self, config: &BillingConfig) -> BillSummary {
        compute_bill(
            &self.items,
            &self.store,
            self.promo.as_ref(),
            self.coin_usage.as_ref(),
            config,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
