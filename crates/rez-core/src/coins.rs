//! # Coin Redemption
//!
//! Balances and usage caps for the three coin pools.
//!
//! ## Redemption Limits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A pool can cover at most:                                             │
//! │                                                                         │
//! │     min( balance , floor(item_total × max_usage) )                      │
//! │                                                                         │
//! │  Example: balance ₹300, max_usage 20%, item_total ₹500                  │
//! │           → min(₹300, ₹100) = ₹100                                      │
//! │                                                                         │
//! │  cap()   : slider input, clamps silently                                │
//! │  check() : pay button, rejects with a ValidationError                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{CoinKind, CoinUsage, Rate};

/// One coin balance and the share of an order it may cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CoinPool {
    /// Available balance, in money value.
    pub balance: Money,

    /// Maximum share of the item total this pool may offset.
    pub max_usage: Rate,
}

impl CoinPool {
    pub fn new(balance: Money, max_usage: Rate) -> Self {
        CoinPool { balance, max_usage }
    }

    /// The usage cap on an order of `item_total`, ignoring the balance.
    pub fn usage_cap(&self, item_total: Money) -> Money {
        item_total.apply_rate_floor(self.max_usage).max(Money::zero())
    }

    /// The most this pool can redeem against an order of `item_total`.
    pub fn max_redeemable(&self, item_total: Money) -> Money {
        self.balance.min(self.usage_cap(item_total)).max(Money::zero())
    }
}

/// The user's coin balances, as supplied by the wallet service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CoinWallet {
    #[serde(default)]
    pub rez: CoinPool,
    #[serde(default)]
    pub promo: CoinPool,
    #[serde(default)]
    pub store_promo: CoinPool,
}

impl CoinWallet {
    pub fn pool(&self, kind: CoinKind) -> &CoinPool {
        match kind {
            CoinKind::Rez => &self.rez,
            CoinKind::Promo => &self.promo,
            CoinKind::StorePromo => &self.store_promo,
        }
    }

    /// Clamps each requested amount into `[0, max_redeemable]`.
    pub fn cap(&self, requested: &CoinUsage, item_total: Money) -> CoinUsage {
        let mut capped = CoinUsage::default();
        for kind in CoinKind::ALL {
            let limit = self.pool(kind).max_redeemable(item_total);
            let amount = requested.get(kind).max(Money::zero()).min(limit);
            capped.set(kind, amount);
        }
        capped
    }

    /// Rejects usage above any pool's balance or usage cap.
    pub fn check(&self, usage: &CoinUsage, item_total: Money) -> ValidationResult<()> {
        for kind in CoinKind::ALL {
            let pool = self.pool(kind);
            let requested = usage.get(kind);

            if requested > pool.balance {
                return Err(ValidationError::InsufficientCoins {
                    kind,
                    available: pool.balance,
                    requested,
                });
            }

            let cap = pool.usage_cap(item_total);
            if requested > cap {
                return Err(ValidationError::CoinUsageCapExceeded {
                    kind,
                    cap,
                    requested,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet() -> CoinWallet {
        CoinWallet {
            rez: CoinPool::new(Money::from_major(300), Rate::from_bps(2000)),
            promo: CoinPool::new(Money::from_major(15), Rate::from_bps(5000)),
            store_promo: CoinPool::default(),
        }
    }

    #[test]
    fn test_max_redeemable() {
        let wallet = wallet();
        let item_total = Money::from_major(500);

        // Capped by percentage
        assert_eq!(wallet.rez.max_redeemable(item_total), Money::from_major(100));
        // Capped by balance
        assert_eq!(wallet.promo.max_redeemable(item_total), Money::from_major(15));
        // Empty pool
        assert_eq!(wallet.store_promo.max_redeemable(item_total), Money::zero());
    }

    #[test]
    fn test_cap_clamps_each_pool() {
        let requested = CoinUsage {
            rez: Money::from_major(250),
            promo: Money::from_major(-5),
            store_promo: Money::from_major(1),
        };
        let capped = wallet().cap(&requested, Money::from_major(500));

        assert_eq!(capped.rez, Money::from_major(100));
        assert_eq!(capped.promo, Money::zero());
        assert_eq!(capped.store_promo, Money::zero());
    }

    #[test]
    fn test_check() {
        let wallet = wallet();
        let item_total = Money::from_major(500);

        let ok = CoinUsage {
            rez: Money::from_major(100),
            promo: Money::from_major(15),
            store_promo: Money::zero(),
        };
        assert!(wallet.check(&ok, item_total).is_ok());

        let over_balance = CoinUsage {
            promo: Money::from_major(16),
            ..CoinUsage::default()
        };
        assert!(matches!(
            wallet.check(&over_balance, item_total),
            Err(ValidationError::InsufficientCoins {
                kind: CoinKind::Promo,
                ..
            })
        ));

        let over_cap = CoinUsage {
            rez: Money::from_minor(10_001),
            ..CoinUsage::default()
        };
        assert!(matches!(
            wallet.check(&over_cap, item_total),
            Err(ValidationError::CoinUsageCapExceeded {
                kind: CoinKind::Rez,
                ..
            })
        ));
    }
}
