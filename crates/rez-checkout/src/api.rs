//! # Checkout API Client
//!
//! Request/response contracts for the two backend endpoints the checkout
//! screen calls, and an HTTP client for them.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST {base}/promo/validate                                             │
//! │    → { code, items, itemTotal, storeId? }                               │
//! │    ← { isValid, promoCode?, error? }                                    │
//! │                                                                         │
//! │  POST {base}/payments                                                   │
//! │    → { paymentMethod, amount, idempotencyKey, bill, promoCode?, ... }   │
//! │    ← { success, transactionId?, orderId?, error? }                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend owns the business logic behind these endpoints; this module
//! only speaks the contract. Money travels in minor units.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use rez_core::{BillSummary, CoinUsage, LineItem, Money, PromoCode};

use crate::config::ApiSettings;
use crate::error::{CheckoutError, CheckoutResult};
use crate::retry::{with_retry, RetryPolicy};

// =============================================================================
// Promo Validation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoValidationRequest {
    pub code: String,
    pub items: Vec<LineItem>,
    pub item_total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoValidationResponse {
    pub is_valid: bool,
    #[serde(default)]
    pub promo_code: Option<PromoCode>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Payment
// =============================================================================

/// How the user pays the remaining `total_payable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    Card,
    NetBanking,
    CashOnDelivery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payment_method: PaymentMethod,
    /// The bill's `total_payable`.
    pub amount: Money,
    /// Same key on every retry of one payment.
    pub idempotency_key: String,
    pub bill: BillSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub coin_usage: CoinUsage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub success: bool,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// API Trait
// =============================================================================

/// The checkout backend, as seen from the client.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    async fn validate_promo(&self, request: &PromoValidationRequest) -> CheckoutResult<PromoValidationResponse>;

    async fn process_payment(&self, request: &PaymentRequest) -> CheckoutResult<PaymentResponse>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// `CheckoutApi` over JSON/HTTP with retry and backoff.
#[derive(Debug, Clone)]
pub struct HttpCheckoutApi {
    client: reqwest::Client,
    base_url: Url,
    policy: RetryPolicy,
}

impl HttpCheckoutApi {
    pub fn new(settings: &ApiSettings) -> CheckoutResult<Self> {
        let mut base_url = Url::parse(&settings.base_url)?;
        // Url::join drops the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CheckoutError::InvalidConfig(e.to_string()))?;

        Ok(HttpCheckoutApi {
            client,
            base_url,
            policy: settings.retry_policy(),
        })
    }

    /// Full URL of an endpoint below the base URL.
    pub fn endpoint(&self, path: &str) -> CheckoutResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B, operation: &str) -> CheckoutResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned + Send,
    {
        let url = self.endpoint(path)?;
        let client = &self.client;
        let url = &url;

        debug!(%url, operation, "POST");
        with_retry(&self.policy, operation, || async move {
            let response = client.post(url.clone()).json(body).send().await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(CheckoutError::HttpStatus {
                    status: status.as_u16(),
                    message,
                });
            }

            Ok(response.json::<R>().await?)
        })
        .await
    }
}

#[async_trait]
impl CheckoutApi for HttpCheckoutApi {
    async fn validate_promo(&self, request: &PromoValidationRequest) -> CheckoutResult<PromoValidationResponse> {
        self.post_json("promo/validate", request, "validate_promo").await
    }

    async fn process_payment(&self, request: &PaymentRequest) -> CheckoutResult<PaymentResponse> {
        self.post_json("payments", request, "process_payment").await
    }
}
