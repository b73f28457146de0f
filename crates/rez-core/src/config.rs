//! # Billing Configuration
//!
//! Rates and fixed fees the bill calculator applies.
//!
//! Passed into `compute_bill` by value, so a region or merchant can run
//! different rates. Loading from TOML and the environment lives in
//! `rez-checkout`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Rate;
use crate::validation::{validate_amount, validate_rate, ValidationResult};

/// Default service charge ("get and item" surcharge): 5%.
pub const DEFAULT_SERVICE_CHARGE_BPS: u32 = 500;

/// Default tax rate: 5%.
pub const DEFAULT_TAX_BPS: u32 = 500;

/// Default platform fee: ₹2 per order.
pub const DEFAULT_PLATFORM_FEE: Money = Money::from_major(2);

/// Rates and fees injected into the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillingConfig {
    /// Surcharge on the item total.
    pub service_charge_rate: Rate,

    /// Tax on the item total.
    pub tax_rate: Rate,

    /// Flat fee per order, regardless of size.
    pub platform_fee: Money,
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            service_charge_rate: Rate::from_bps(DEFAULT_SERVICE_CHARGE_BPS),
            tax_rate: Rate::from_bps(DEFAULT_TAX_BPS),
            platform_fee: DEFAULT_PLATFORM_FEE,
        }
    }
}

impl BillingConfig {
    /// Rates must be 0-100% and the platform fee a valid amount.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_rate("service_charge_rate", self.service_charge_rate)?;
        validate_rate("tax_rate", self.tax_rate)?;

        validate_amount("platform_fee", self.platform_fee)
    }
}
