//! # Money Module
//!
//! Provides the `Money` type used for every amount on a checkout bill.
//!
//! ## Minor Units, Whole-Unit Rounding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HOW A BILL IS ROUNDED                                                  │
//! │                                                                         │
//! │  Storage:   i64 count of paise (100 paise = ₹1)                         │
//! │             ₹10.50 → 1050                                               │
//! │                                                                         │
//! │  Bill lines (service charge, taxes, % promo, cashback, total)          │
//! │  are rounded to a WHOLE rupee, half-up:                                 │
//! │             ₹5.49 → ₹5     ₹5.50 → ₹6     -₹2.50 → -₹2                 │
//! │                                                                         │
//! │  Intermediate products (amount × rate) are computed in i128 and        │
//! │  rounded exactly once, so no fraction is lost between steps.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rez_core::money::Money;
//!
//! let price = Money::from_major(75);
//! let total = price + Money::from_major(25);
//! assert_eq!(total.major(), 100);
//!
//! // ₹10.50 rounds up to ₹11
//! assert_eq!(Money::from_minor(1050).round_to_major(), Money::from_major(11));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

/// Minor units per major unit (paise per rupee).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts and round-off lines can be negative
/// - **Single field tuple struct**: zero-cost wrapper, serialized as a bare number
///
/// ## Where Money Flows
/// ```text
/// LineItem.price × quantity ──► item_total ──┬──► service charge / taxes
///                                            ├──► promo discount
///                                            └──► coin usage caps
///
/// subtotal − discounts ──► round_to_major() ──► total_payable
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a value from minor units (paise).
    ///
    /// ```rust
    /// use rez_core::money::Money;
    ///
    /// let fee = Money::from_minor(1999); // ₹19.99
    /// assert_eq!(fee.minor(), 1999);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a value from whole major units (rupees).
    ///
    /// ```rust
    /// use rez_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(2).minor(), 200);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Creates a value from major and minor parts.
    ///
    /// For negative amounts only the major part carries the sign:
    /// `from_major_minor(-5, 50)` is -₹5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major-unit portion, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns true if the value is a whole number of major units.
    #[inline]
    pub const fn is_whole(&self) -> bool {
        self.0 % MINOR_PER_MAJOR == 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies by a quantity.
    ///
    /// ```rust
    /// use rez_core::money::Money;
    ///
    /// let line = Money::from_major(25).multiply_quantity(3);
    /// assert_eq!(line, Money::from_major(75));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Rounds to the nearest whole major unit, half-up (toward +∞).
    ///
    /// ```rust
    /// use rez_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(549).round_to_major(), Money::from_major(5));
    /// assert_eq!(Money::from_minor(550).round_to_major(), Money::from_major(6));
    /// assert_eq!(Money::from_minor(-250).round_to_major(), Money::from_major(-2));
    /// ```
    pub fn round_to_major(&self) -> Money {
        let major = round_half_up(self.0 as i128, MINOR_PER_MAJOR as i128);
        Money::from_minor(major as i64 * MINOR_PER_MAJOR)
    }

    /// Applies a rate and rounds the result to a whole major unit.
    ///
    /// This is the rounding every percentage line on the bill uses
    /// (service charge, taxes, percentage promos).
    ///
    /// ```rust
    /// use rez_core::money::Money;
    /// use rez_core::types::Rate;
    ///
    /// let item_total = Money::from_major(100);
    /// let tax = item_total.apply_rate_rounded(Rate::from_bps(500)); // 5%
    /// assert_eq!(tax, Money::from_major(5));
    ///
    /// // 5% of ₹109 = ₹5.45 → ₹5
    /// assert_eq!(Money::from_major(109).apply_rate_rounded(Rate::from_bps(500)), Money::from_major(5));
    /// ```
    pub fn apply_rate_rounded(&self, rate: Rate) -> Money {
        Money::round_rate_product(self.0 as i128 * rate.bps() as i128)
    }

    /// Applies a rate and truncates toward zero to a whole minor unit.
    ///
    /// Used for caps, where rounding up would allow more than the limit.
    pub fn apply_rate_floor(&self, rate: Rate) -> Money {
        let scaled = self.0 as i128 * rate.bps() as i128;
        Money::from_minor((scaled / Rate::BPS_SCALE as i128) as i64)
    }

    /// Rounds an accumulated `minor × bps` product to a whole major unit.
    ///
    /// Callers that sum several rate products (cashback across line items)
    /// accumulate the raw products and round once through this.
    pub fn round_rate_product(minor_bps: i128) -> Money {
        let denominator = Rate::BPS_SCALE as i128 * MINOR_PER_MAJOR as i128;
        let major = round_half_up(minor_bps, denominator);
        Money::from_minor(major as i64 * MINOR_PER_MAJOR)
    }
}

/// `floor(numerator / denominator + 1/2)` for a positive denominator.
fn round_half_up(numerator: i128, denominator: i128) -> i128 {
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug display, e.g. `₹112.00`. UI formatting is done by the frontend.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor_and_major() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);

        assert_eq!(Money::from_major(112).minor(), 11200);
        assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(1099)), "₹10.99");
        assert_eq!(format!("{}", Money::from_major(5)), "₹5.00");
        assert_eq!(format!("{}", Money::from_minor(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::zero()), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(10);
        let b = Money::from_major(5);

        assert_eq!((a + b).major(), 15);
        assert_eq!((a - b).major(), 5);
        assert_eq!((a * 3).major(), 30);
        assert_eq!((-a).major(), -10);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.major(), 20);
    }

    #[test]
    fn test_round_to_major_is_half_up() {
        assert_eq!(Money::from_minor(1049).round_to_major().minor(), 1000);
        assert_eq!(Money::from_minor(1050).round_to_major().minor(), 1100);
        assert_eq!(Money::from_minor(1000).round_to_major().minor(), 1000);
        // Half-up moves toward +∞ for negatives too
        assert_eq!(Money::from_minor(-250).round_to_major().minor(), -200);
        assert_eq!(Money::from_minor(-251).round_to_major().minor(), -300);
    }

    #[test]
    fn test_apply_rate_rounded() {
        let five_percent = Rate::from_bps(500);
        assert_eq!(Money::from_major(100).apply_rate_rounded(five_percent).major(), 5);
        // ₹110 × 5% = ₹5.50 → ₹6
        assert_eq!(Money::from_major(110).apply_rate_rounded(five_percent).major(), 6);
        // ₹9 × 5% = ₹0.45 → ₹0
        assert_eq!(Money::from_major(9).apply_rate_rounded(five_percent).major(), 0);
        assert!(Money::zero().apply_rate_rounded(five_percent).is_zero());
    }

    #[test]
    fn test_apply_rate_floor() {
        // ₹99.99 × 20% = ₹19.998 → ₹19.99
        let cap = Money::from_minor(9999).apply_rate_floor(Rate::from_bps(2000));
        assert_eq!(cap.minor(), 1999);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_minor(1).is_positive());
        assert!(Money::from_minor(-1).is_negative());
        assert!(Money::from_major(3).is_whole());
        assert!(!Money::from_minor(301).is_whole());
        assert_eq!(Money::from_minor(-301).abs().minor(), 301);
    }
}
