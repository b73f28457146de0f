//! # Checkout Session
//!
//! The state behind one checkout screen: the cart, the applied promo, the
//! coin sliders, and the bill recomputed from them.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Session Operations                          │
//! │                                                                         │
//! │  User Action             Session Method          State Change           │
//! │  ───────────             ──────────────          ────────────           │
//! │                                                                         │
//! │  Edit cart ─────────────► set_items() ──────────► items, coins re-capped│
//! │                                                                         │
//! │  Enter promo ───────────► apply_promo() ────────► promo (after API OK)  │
//! │                                                                         │
//! │  Remove promo ──────────► remove_promo() ───────► promo = None          │
//! │                                                                         │
//! │  Drag coin slider ──────► set_coin_usage() ─────► coin_usage (capped)   │
//! │                                                                         │
//! │  View bill ─────────────► bill() ───────────────► (read only)           │
//! │                                                                         │
//! │  Tap Pay ───────────────► pay() ────────────────► (read only, API call) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `bill()` is the pure calculator and is cheap enough to call on every
//! change. `pay()` goes through the validating façade first.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use rez_core::validation::validate_promo;
use rez_core::{
    validated_compute_bill, BillRequest, BillSummary, BillingConfig, CoinKind, CoinUsage, CoinWallet,
    LineItem, Money, PromoCode, StoreTerms,
};

use crate::api::{CheckoutApi, PaymentMethod, PaymentRequest, PromoValidationRequest};
use crate::error::{CheckoutError, CheckoutResult};

/// Outcome of a successful payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub transaction_id: Option<String>,
    pub order_id: Option<String>,
    /// The bill that was charged.
    pub bill: BillSummary,
}

/// One checkout in progress.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    store_id: Option<String>,
    request: BillRequest,
    wallet: CoinWallet,
    config: BillingConfig,
}

impl CheckoutSession {
    /// Starts a session with no promo and no coins applied.
    pub fn new(items: Vec<LineItem>, store: StoreTerms, wallet: CoinWallet, config: BillingConfig) -> Self {
        CheckoutSession {
            store_id: None,
            request: BillRequest {
                items,
                store,
                promo: None,
                coin_usage: None,
            },
            wallet,
            config,
        }
    }

    /// Tags requests with the merchant's id.
    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    pub fn items(&self) -> &[LineItem] {
        &self.request.items
    }

    pub fn promo(&self) -> Option<&PromoCode> {
        self.request.promo.as_ref()
    }

    pub fn coin_usage(&self) -> CoinUsage {
        self.request.coin_usage.unwrap_or_default()
    }

    pub fn item_total(&self) -> Money {
        self.request.item_total()
    }

    /// The current bill. Never fails.
    pub fn bill(&self) -> BillSummary {
        self.request.compute(&self.config)
    }

    /// The current bill, after every business rule has been checked.
    pub fn validated_bill(&self, now: DateTime<Utc>) -> CheckoutResult<BillSummary> {
        Ok(validated_compute_bill(&self.request, Some(&self.wallet), &self.config, now)?)
    }

    /// Replaces the cart. Coin usage is re-capped against the new total.
    pub fn set_items(&mut self, items: Vec<LineItem>) {
        self.request.items = items;
        if let Some(usage) = self.request.coin_usage {
            self.request.coin_usage = Some(self.wallet.cap(&usage, self.item_total()));
        }
    }

    /// Sets how much of one coin pool to redeem, clamped to what the pool
    /// allows on this order. Returns the amount actually applied.
    pub fn set_coin_usage(&mut self, kind: CoinKind, amount: Money) -> Money {
        let mut requested = self.coin_usage();
        requested.set(kind, amount);

        let capped = self.wallet.cap(&requested, self.item_total());
        let applied = capped.get(kind);
        if applied != amount {
            info!(%kind, requested = %amount, applied = %applied, "Coin usage capped");
        }

        self.request.coin_usage = Some(capped);
        applied
    }

    /// Validates `code` with the backend and applies it.
    ///
    /// A rejected code leaves the previously applied promo in place.
    pub async fn apply_promo<A>(&mut self, api: &A, code: &str, now: DateTime<Utc>) -> CheckoutResult<&PromoCode>
    where
        A: CheckoutApi + ?Sized,
    {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(CheckoutError::PromoRejected {
                code,
                reason: "Please enter a promo code".into(),
            });
        }

        let request = PromoValidationRequest {
            code: code.clone(),
            items: self.request.items.clone(),
            item_total: self.item_total(),
            store_id: self.store_id.clone(),
        };
        let response = api.validate_promo(&request).await?;

        if !response.is_valid {
            let reason = response.error.unwrap_or_else(|| "Invalid promo code".into());
            warn!(code = %code, reason = %reason, "Promo rejected by server");
            return Err(CheckoutError::PromoRejected { code, reason });
        }

        let promo = response.promo_code.ok_or_else(|| {
            CheckoutError::DeserializationFailed("valid promo response without promoCode".into())
        })?;

        // The server checked the code; the minimum order and expiry are
        // checked again against the cart as it is now.
        validate_promo(&promo, self.item_total(), now)?;

        info!(code = %promo.code, "Promo applied");
        Ok(&*self.request.promo.insert(promo))
    }

    /// Removes the applied promo, returning it.
    pub fn remove_promo(&mut self) -> Option<PromoCode> {
        self.request.promo.take()
    }

    /// Validates the bill and charges `total_payable`.
    pub async fn pay<A>(&self, api: &A, method: PaymentMethod, now: DateTime<Utc>) -> CheckoutResult<PaymentReceipt>
    where
        A: CheckoutApi + ?Sized,
    {
        if self.request.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let bill = self.validated_bill(now)?;
        let request = PaymentRequest {
            payment_method: method,
            amount: bill.total_payable,
            idempotency_key: Uuid::new_v4().to_string(),
            bill,
            promo_code: self.request.promo.as_ref().map(|p| p.code.clone()),
            coin_usage: self.coin_usage(),
            store_id: self.store_id.clone(),
        };

        info!(
            amount = %bill.total_payable,
            method = ?method,
            key = %request.idempotency_key,
            "Submitting payment"
        );
        let response = api.process_payment(&request).await?;

        if !response.success {
            let reason = response.error.unwrap_or_else(|| "Payment failed".into());
            warn!(reason = %reason, "Payment declined");
            return Err(CheckoutError::PaymentDeclined(reason));
        }

        info!(
            transaction_id = ?response.transaction_id,
            order_id = ?response.order_id,
            "Payment completed"
        );
        Ok(PaymentReceipt {
            transaction_id: response.transaction_id,
            order_id: response.order_id,
            bill,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PaymentResponse, PromoValidationResponse};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use rez_core::{CoinPool, Rate, ValidationError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory backend: knows a fixed set of promos, records payments.
    #[derive(Default)]
    struct FakeApi {
        promos: HashMap<String, PromoCode>,
        decline_payments: bool,
        payments: Mutex<Vec<PaymentRequest>>,
    }

    impl FakeApi {
        fn with_promos() -> Self {
            let mut promos = HashMap::new();
            promos.insert(
                "FIRST10".to_string(),
                PromoCode::fixed("FIRST10", Money::from_major(10), Money::from_major(50)),
            );
            promos.insert(
                "SAVE15".to_string(),
                PromoCode::percentage("SAVE15", Rate::from_bps(1500), Some(Money::from_major(20)), Money::from_major(80)),
            );
            promos.insert(
                "BIGSPEND".to_string(),
                PromoCode::fixed("BIGSPEND", Money::from_major(100), Money::from_major(1000)),
            );
            FakeApi {
                promos,
                ..FakeApi::default()
            }
        }
    }

    #[async_trait]
    impl CheckoutApi for FakeApi {
        async fn validate_promo(&self, request: &PromoValidationRequest) -> CheckoutResult<PromoValidationResponse> {
            Ok(match self.promos.get(&request.code) {
                Some(promo) => PromoValidationResponse {
                    is_valid: true,
                    promo_code: Some(promo.clone()),
                    error: None,
                },
                None => PromoValidationResponse {
                    is_valid: false,
                    promo_code: None,
                    error: Some("Invalid promo code".into()),
                },
            })
        }

        async fn process_payment(&self, request: &PaymentRequest) -> CheckoutResult<PaymentResponse> {
            self.payments.lock().unwrap().push(request.clone());
            if self.decline_payments {
                return Ok(PaymentResponse {
                    success: false,
                    transaction_id: None,
                    order_id: None,
                    error: Some("Card declined".into()),
                });
            }
            Ok(PaymentResponse {
                success: true,
                transaction_id: Some("txn_1".into()),
                order_id: Some("ord_1".into()),
                error: None,
            })
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn session() -> CheckoutSession {
        let items = vec![
            LineItem::new(Money::from_major(75), 1, Rate::from_bps(1000)).with_product("p-1", "Headphones"),
            LineItem::new(Money::from_major(25), 1, Rate::from_bps(1000)).with_product("p-2", "Cable"),
        ];
        let wallet = CoinWallet {
            rez: CoinPool::new(Money::from_major(500), Rate::from_bps(2000)),
            promo: CoinPool::new(Money::from_major(5), Rate::from_bps(10_000)),
            store_promo: CoinPool::default(),
        };
        CheckoutSession::new(items, StoreTerms::default(), wallet, BillingConfig::default())
            .with_store_id("store-42")
    }

    #[tokio::test]
    async fn test_apply_promo_reprices_bill() {
        let api = FakeApi::with_promos();
        let mut session = session();
        assert_eq!(session.bill().total_payable, Money::from_major(112));

        session.apply_promo(&api, " first10 ", now()).await.unwrap();
        assert_eq!(session.promo().unwrap().code, "FIRST10");
        assert_eq!(session.bill().total_payable, Money::from_major(102));

        session.apply_promo(&api, "SAVE15", now()).await.unwrap();
        assert_eq!(session.bill().total_payable, Money::from_major(97));
    }

    #[tokio::test]
    async fn test_rejected_promo_keeps_previous() {
        let api = FakeApi::with_promos();
        let mut session = session();
        session.apply_promo(&api, "FIRST10", now()).await.unwrap();

        let err = session.apply_promo(&api, "NOPE", now()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::PromoRejected { .. }));
        assert_eq!(session.promo().unwrap().code, "FIRST10");

        let err = session.apply_promo(&api, "   ", now()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::PromoRejected { .. }));
    }

    #[tokio::test]
    async fn test_promo_below_minimum_is_rejected_locally() {
        let api = FakeApi::with_promos();
        let mut session = session();

        let err = session.apply_promo(&api, "BIGSPEND", now()).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::PromoNotApplicable { .. })
        ));
        assert!(session.promo().is_none());
    }

    #[test]
    fn test_coin_usage_is_capped() {
        let mut session = session();

        // 20% of ₹100
        let applied = session.set_coin_usage(CoinKind::Rez, Money::from_major(150));
        assert_eq!(applied, Money::from_major(20));

        // Balance of ₹5
        let applied = session.set_coin_usage(CoinKind::Promo, Money::from_major(50));
        assert_eq!(applied, Money::from_major(5));

        assert_eq!(session.bill().coin_discount, Money::from_major(25));
        assert_eq!(session.bill().total_payable, Money::from_major(87));
        assert_eq!(session.bill().cashback_earned, Money::from_major(10));
    }

    #[test]
    fn test_shrinking_cart_recaps_coins() {
        let mut session = session();
        session.set_coin_usage(CoinKind::Rez, Money::from_major(20));

        session.set_items(vec![LineItem::new(Money::from_major(50), 1, Rate::zero())]);
        assert_eq!(session.coin_usage().rez, Money::from_major(10));
    }

    #[tokio::test]
    async fn test_pay_charges_total_payable() {
        let api = FakeApi::with_promos();
        let mut session = session();
        session.apply_promo(&api, "FIRST10", now()).await.unwrap();
        session.set_coin_usage(CoinKind::Promo, Money::from_major(5));

        let receipt = session.pay(&api, PaymentMethod::Upi, now()).await.unwrap();
        assert_eq!(receipt.transaction_id.as_deref(), Some("txn_1"));
        assert_eq!(receipt.order_id.as_deref(), Some("ord_1"));
        assert_eq!(receipt.bill.total_payable, Money::from_major(97));

        let payments = api.payments.lock().unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, Money::from_major(97));
        assert_eq!(payments[0].promo_code.as_deref(), Some("FIRST10"));
        assert_eq!(payments[0].store_id.as_deref(), Some("store-42"));
        assert!(!payments[0].idempotency_key.is_empty());
    }

    #[tokio::test]
    async fn test_pay_surfaces_decline() {
        let api = FakeApi {
            decline_payments: true,
            ..FakeApi::with_promos()
        };

        let err = session().pay(&api, PaymentMethod::Card, now()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::PaymentDeclined(ref reason) if reason == "Card declined"));
        assert!(err.is_user_fixable());
    }

    #[tokio::test]
    async fn test_pay_validates_before_calling_api() {
        let api = FakeApi::with_promos();

        let mut session = session();
        session.set_items(Vec::new());
        assert!(matches!(
            session.pay(&api, PaymentMethod::Upi, now()).await,
            Err(CheckoutError::EmptyCart)
        ));

        let mut session = CheckoutSession::new(
            vec![LineItem::new(Money::from_major(40), 1, Rate::zero())],
            StoreTerms {
                delivery_fee: Money::from_major(30),
                minimum_order: Money::from_major(99),
            },
            CoinWallet::default(),
            BillingConfig::default(),
        );
        assert!(matches!(
            session.pay(&api, PaymentMethod::Upi, now()).await,
            Err(CheckoutError::Validation(ValidationError::BelowMinimumOrder { .. }))
        ));

        session.set_items(vec![LineItem::new(Money::from_major(120), 1, Rate::zero())]);
        assert!(session.pay(&api, PaymentMethod::Upi, now()).await.is_ok());
        assert_eq!(api.payments.lock().unwrap().len(), 1);
    }
}
