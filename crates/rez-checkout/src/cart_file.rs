//! # Cart Files
//!
//! Prices a cart stored as JSON, for the `rez-bill` binary and for
//! reproducing a customer's bill from a support ticket.
//!
//! Money is in paise, percentages are 0-100.
//!
//! ```json
//! {
//!   "items": [ { "price": 7500, "quantity": 1, "cashbackPercentage": 10 } ],
//!   "store": { "deliveryFee": 0, "minimumOrder": 0 },
//!   "promo": { "code": "FIRST10", "discountType": "FIXED", "discountValue": 1000, "minOrderValue": 5000 },
//!   "coinUsage": { "rez": 0 },
//!   "wallet": { "rez": { "balance": 50000, "maxUsage": 20 } }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use rez_core::{validated_compute_bill, BillRequest, BillSummary, BillingConfig, CoinWallet};

use crate::error::{CheckoutError, CheckoutResult};

/// A bill request plus the wallet used to validate coin usage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartFile {
    #[serde(flatten)]
    pub request: BillRequest,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<CoinWallet>,
}

impl CartFile {
    pub fn from_json(json: &str) -> CheckoutResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn read(path: &Path) -> CheckoutResult<Self> {
        debug!(?path, "Reading cart file");
        let contents = std::fs::read_to_string(path).map_err(|e| CheckoutError::CartFileUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Prices the cart. With `validate`, business rules are checked first.
    pub fn price(&self, config: &BillingConfig, validate: bool, now: DateTime<Utc>) -> CheckoutResult<BillSummary> {
        if validate {
            Ok(validated_compute_bill(&self.request, self.wallet.as_ref(), config, now)?)
        } else {
            Ok(self.request.compute(config))
        }
    }
}
