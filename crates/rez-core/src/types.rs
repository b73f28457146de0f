//! # Domain Types
//!
//! The inputs and output of a checkout bill.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Bill Inputs                                  │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐         │
//! │  │    LineItem     │  │   StoreTerms    │  │   PromoCode     │         │
//! │  │  ─────────────  │  │  ─────────────  │  │  ─────────────  │         │
//! │  │  price          │  │  delivery_fee   │  │  code           │         │
//! │  │  quantity       │  │  minimum_order  │  │  discount       │         │
//! │  │  cashback %     │  └─────────────────┘  │  max_discount   │         │
//! │  └─────────────────┘                       │  min_order_value│         │
//! │                                            └─────────────────┘         │
//! │  ┌─────────────────┐                                                   │
//! │  │   CoinUsage     │      compute_bill(...) ──► BillSummary           │
//! │  │  rez / promo /  │                                                   │
//! │  │  store_promo    │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire names are camelCase to match the mobile client and the checkout API.
//! Money fields are serialized in minor units (paise), rates as percentages.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// ## Why Basis Points?
/// `500` bps = 5% tax, `1250` bps = 12.5% cashback. Integer bps keep every
/// rate exact, the same way `Money` keeps amounts exact.
///
/// ## Wire Format
/// On the wire a rate is a plain percentage (0-100), as the mobile client
/// and the checkout API send it:
/// ```text
/// "cashbackPercentage": 10     ↔  Rate(1000)
/// "discountValue": 12.5        ↔  Rate(1250)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Basis points in 100%.
    pub const BPS_SCALE: u32 = 10_000;

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage, e.g. `12.5` → 1250 bps.
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True if the rate is within 0-100%.
    #[inline]
    pub const fn is_valid_percentage(&self) -> bool {
        self.0 <= Self::BPS_SCALE
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u32(self.0 / 100)
        } else {
            serializer.serialize_f64(self.percentage())
        }
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pct = f64::deserialize(deserializer)?;
        if !pct.is_finite() || pct < 0.0 {
            return Err(de::Error::custom(format!(
                "percentage must be a non-negative number, got {pct}"
            )));
        }
        Ok(Rate::from_percentage(pct))
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One purchasable unit in the cart.
///
/// Snapshot of the product at the time it was added, so a later price change
/// on the catalogue does not reprice a cart that is already at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalogue product id, if the caller tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Unit price.
    pub price: Money,

    /// Units in the cart (>= 1).
    pub quantity: i64,

    /// Share of the gross line price credited back as cashback.
    #[serde(default)]
    pub cashback_percentage: Rate,
}

impl LineItem {
    /// Creates an anonymous line item.
    pub fn new(price: Money, quantity: i64, cashback_percentage: Rate) -> Self {
        LineItem {
            product_id: None,
            name: None,
            price,
            quantity,
            cashback_percentage,
        }
    }

    /// Attaches a product id and display name.
    pub fn with_product(mut self, product_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self.name = Some(name.into());
        self
    }

    /// Price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Store Terms
// =============================================================================

/// Delivery terms of the merchant the cart is bought from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreTerms {
    /// Charged verbatim on every bill.
    #[serde(default)]
    pub delivery_fee: Money,

    /// Smallest item subtotal the store accepts. Not enforced by the
    /// calculator; see `validation::validated_compute_bill`.
    #[serde(default)]
    pub minimum_order: Money,
}

// =============================================================================
// Promo Code
// =============================================================================

/// How a promo code discounts the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "discountType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoDiscount {
    /// Flat amount off.
    Fixed {
        #[serde(rename = "discountValue")]
        amount: Money,
    },
    /// Percentage of the item total, capped by `PromoCode::max_discount`.
    Percentage {
        #[serde(rename = "discountValue")]
        rate: Rate,
    },
    /// Credited as coins after the order; no discount at checkout.
    Cashback {
        #[serde(rename = "discountValue")]
        rate: Rate,
    },
}

/// A promo code as returned by the promo validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    /// The code the user typed, e.g. `FIRST10`.
    pub code: String,

    #[serde(flatten)]
    pub discount: PromoDiscount,

    /// Upper bound on a percentage discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Money>,

    /// Item subtotal required for the promo to apply.
    #[serde(default)]
    pub min_order_value: Money,

    /// Expiry instant, if the promo has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub valid_until: Option<DateTime<Utc>>,
}

impl PromoCode {
    /// Creates a flat-discount promo.
    pub fn fixed(code: impl Into<String>, amount: Money, min_order_value: Money) -> Self {
        PromoCode {
            code: code.into(),
            discount: PromoDiscount::Fixed { amount },
            max_discount: None,
            min_order_value,
            valid_until: None,
        }
    }

    /// Creates a percentage promo with an optional cap.
    pub fn percentage(
        code: impl Into<String>,
        rate: Rate,
        max_discount: Option<Money>,
        min_order_value: Money,
    ) -> Self {
        PromoCode {
            code: code.into(),
            discount: PromoDiscount::Percentage { rate },
            max_discount,
            min_order_value,
            valid_until: None,
        }
    }

    /// Creates a cashback promo.
    pub fn cashback(code: impl Into<String>, rate: Rate, min_order_value: Money) -> Self {
        PromoCode {
            code: code.into(),
            discount: PromoDiscount::Cashback { rate },
            max_discount: None,
            min_order_value,
            valid_until: None,
        }
    }

    /// Sets the expiry instant.
    pub fn valid_until(mut self, at: DateTime<Utc>) -> Self {
        self.valid_until = Some(at);
        self
    }

    /// True if the item subtotal meets the promo's minimum.
    #[inline]
    pub fn is_applicable_to(&self, item_total: Money) -> bool {
        item_total >= self.min_order_value
    }

    /// True if the promo has expired at `now`.
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| now > until)
    }
}

// =============================================================================
// Coins
// =============================================================================

/// The three independently tracked coin balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CoinKind {
    /// Platform-wide ReZ coins.
    Rez,
    /// Coins granted by platform promotions.
    Promo,
    /// Coins granted by a single store, spendable only there.
    StorePromo,
}

impl CoinKind {
    pub const ALL: [CoinKind; 3] = [CoinKind::Rez, CoinKind::Promo, CoinKind::StorePromo];
}

impl std::fmt::Display for CoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoinKind::Rez => write!(f, "rez"),
            CoinKind::Promo => write!(f, "promo"),
            CoinKind::StorePromo => write!(f, "storePromo"),
        }
    }
}

/// Coin amounts the user chose to redeem, in money value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CoinUsage {
    #[serde(default)]
    pub rez: Money,
    #[serde(default)]
    pub promo: Money,
    #[serde(default)]
    pub store_promo: Money,
}

impl CoinUsage {
    /// Amount redeemed from one pool.
    pub fn get(&self, kind: CoinKind) -> Money {
        match kind {
            CoinKind::Rez => self.rez,
            CoinKind::Promo => self.promo,
            CoinKind::StorePromo => self.store_promo,
        }
    }

    /// Sets the amount redeemed from one pool.
    pub fn set(&mut self, kind: CoinKind, amount: Money) {
        match kind {
            CoinKind::Rez => self.rez = amount,
            CoinKind::Promo => self.promo = amount,
            CoinKind::StorePromo => self.store_promo = amount,
        }
    }

    /// Sum across all pools.
    pub fn total(&self) -> Money {
        self.rez + self.promo + self.store_promo
    }
}

// =============================================================================
// Bill Request / Summary
// =============================================================================

/// Everything needed to price a cart, in one value.
///
/// This is also the shape of the cart files read by the `rez-bill` binary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub store: StoreTerms,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo: Option<PromoCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_usage: Option<CoinUsage>,
}

impl BillRequest {
    /// Sum of line totals.
    pub fn item_total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

/// The itemized bill.
///
/// Derived from the inputs on every change and never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    /// Σ price × quantity.
    pub item_total: Money,
    /// Service charge on the item total.
    pub get_and_item_total: Money,
    pub delivery_fee: Money,
    pub platform_fee: Money,
    pub taxes: Money,
    pub promo_discount: Money,
    pub coin_discount: Money,
    /// Items plus every fee, before any discount.
    pub subtotal_before_discounts: Money,
    /// May be negative or fractional; see `round_off`.
    pub total_after_discounts: Money,
    /// Adjustment that brings `total_after_discounts` to a whole unit.
    pub round_off: Money,
    /// What the user pays. Never negative.
    pub total_payable: Money,
    /// Credited after purchase, from gross item prices.
    pub cashback_earned: Money,
    /// Promo plus coin discounts, rounded.
    pub savings: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rate_from_percentage() {
        let rate = Rate::from_percentage(12.5);
        assert_eq!(rate.bps(), 1250);
        assert!((rate.percentage() - 12.5).abs() < 0.001);
        assert!(rate.is_valid_percentage());
        assert!(!Rate::from_bps(10_001).is_valid_percentage());
    }

    #[test]
    fn test_rate_wire_format_is_percentage() {
        assert_eq!(serde_json::to_value(Rate::from_bps(1000)).unwrap(), 10);
        assert_eq!(serde_json::to_value(Rate::from_bps(1250)).unwrap(), 12.5);

        assert_eq!(serde_json::from_str::<Rate>("10").unwrap(), Rate::from_bps(1000));
        assert_eq!(serde_json::from_str::<Rate>("12.5").unwrap(), Rate::from_bps(1250));
        assert_eq!(serde_json::from_str::<Rate>("0.01").unwrap(), Rate::from_bps(1));
        assert!(serde_json::from_str::<Rate>("-5").is_err());
    }

    #[test]
    fn test_checkout_scenario_from_client_json() {
        // Prices in paise, percentages as the client sends them
        let json = r#"{
            "items": [
                { "price": 7500, "quantity": 1, "cashbackPercentage": 10 },
                { "price": 2500, "quantity": 1, "cashbackPercentage": 10 }
            ],
            "store": { "deliveryFee": 0, "minimumOrder": 0 },
            "promo": {
                "code": "SAVE15",
                "discountType": "PERCENTAGE",
                "discountValue": 15,
                "maxDiscount": 2000,
                "minOrderValue": 8000
            }
        }"#;
        let request: BillRequest = serde_json::from_str(json).unwrap();
        let bill = request.compute(&crate::config::BillingConfig::default());

        assert_eq!(bill.item_total, Money::from_major(100));
        assert_eq!(bill.promo_discount, Money::from_major(15));
        assert_eq!(bill.cashback_earned, Money::from_major(10));
        assert_eq!(bill.total_payable, Money::from_major(97));
    }

    #[test]
    fn test_line_total() {
        let item = LineItem::new(Money::from_major(25), 3, Rate::from_bps(1000));
        assert_eq!(item.line_total(), Money::from_major(75));
    }

    #[test]
    fn test_coin_usage_accessors() {
        let mut usage = CoinUsage::default();
        usage.set(CoinKind::StorePromo, Money::from_major(7));
        usage.set(CoinKind::Rez, Money::from_major(3));

        assert_eq!(usage.get(CoinKind::StorePromo), Money::from_major(7));
        assert_eq!(usage.get(CoinKind::Promo), Money::zero());
        assert_eq!(usage.total(), Money::from_major(10));
    }

    #[test]
    fn test_promo_wire_format() {
        let json = r#"{
            "code": "SAVE15",
            "discountType": "PERCENTAGE",
            "discountValue": 15,
            "maxDiscount": 2000,
            "minOrderValue": 8000
        }"#;
        let promo: PromoCode = serde_json::from_str(json).unwrap();

        assert_eq!(promo.code, "SAVE15");
        assert_eq!(
            promo.discount,
            PromoDiscount::Percentage {
                rate: Rate::from_bps(1500)
            }
        );
        assert_eq!(promo.max_discount, Some(Money::from_major(20)));
        assert_eq!(promo.min_order_value, Money::from_major(80));
        assert!(promo.valid_until.is_none());

        let back = serde_json::to_value(&promo).unwrap();
        assert_eq!(back["discountType"], "PERCENTAGE");
        assert_eq!(back["discountValue"], 15);
    }

    #[test]
    fn test_promo_applicability_and_expiry() {
        let until = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
        let promo = PromoCode::fixed("FIRST10", Money::from_major(10), Money::from_major(50))
            .valid_until(until);

        assert!(promo.is_applicable_to(Money::from_major(50)));
        assert!(!promo.is_applicable_to(Money::from_minor(4999)));

        assert!(!promo.is_expired_at(until));
        assert!(promo.is_expired_at(until + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_bill_request_defaults_from_sparse_json() {
        let json = r#"{ "items": [ { "price": 7500, "quantity": 1 } ] }"#;
        let request: BillRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.items.len(), 1);
        assert!(request.items[0].cashback_percentage.is_zero());
        assert_eq!(request.store, StoreTerms::default());
        assert!(request.promo.is_none());
        assert_eq!(request.item_total(), Money::from_major(75));
    }
}
