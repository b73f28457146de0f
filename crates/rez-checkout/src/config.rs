//! # Checkout Configuration
//!
//! Configuration for the checkout API client and the billing rates.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     REZ_API_URL=https://api.rez.money/v1                               │
//! │     REZ_TAX_BPS=500                                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/checkout/checkout.toml (Linux)                           │
//! │     ~/Library/Application Support/money.rez.checkout/... (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     5% service charge, 5% tax, ₹2 platform fee                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [api]
//! base_url = "https://api.rez.money/v1"
//! timeout_secs = 15
//! max_retries = 3
//! initial_backoff_ms = 500
//! max_backoff_secs = 10
//!
//! [billing]
//! service_charge_bps = 500
//! tax_bps = 500
//! platform_fee_minor = 200
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use rez_core::{BillingConfig, Money, Rate};

use crate::error::{CheckoutError, CheckoutResult};
use crate::retry::RetryPolicy;

// =============================================================================
// API Settings
// =============================================================================

/// Settings for the remote checkout API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL the promo and payment endpoints hang off.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-attempt request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries after the first attempt. 0 disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff between attempts (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff between attempts (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5001/api".to_string()
}
fn default_timeout() -> u64 {
    15
}
fn default_max_retries() -> u32 {
    3
}
fn default_initial_backoff() -> u64 {
    500
}
fn default_max_backoff() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl ApiSettings {
    /// Retry policy for requests made with these settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            attempt_timeout: Duration::from_secs(self.timeout_secs),
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_secs(self.max_backoff_secs),
        }
    }
}

// =============================================================================
// Billing Settings
// =============================================================================

/// Billing rates as stored on disk (plain integers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSettings {
    /// Service charge in basis points.
    #[serde(default = "default_service_charge")]
    pub service_charge_bps: u32,

    /// Tax rate in basis points.
    #[serde(default = "default_tax")]
    pub tax_bps: u32,

    /// Platform fee in minor units (paise).
    #[serde(default = "default_platform_fee")]
    pub platform_fee_minor: i64,
}

fn default_service_charge() -> u32 {
    rez_core::config::DEFAULT_SERVICE_CHARGE_BPS
}
fn default_tax() -> u32 {
    rez_core::config::DEFAULT_TAX_BPS
}
fn default_platform_fee() -> i64 {
    rez_core::config::DEFAULT_PLATFORM_FEE.minor()
}

impl Default for BillingSettings {
    fn default() -> Self {
        BillingSettings {
            service_charge_bps: default_service_charge(),
            tax_bps: default_tax(),
            platform_fee_minor: default_platform_fee(),
        }
    }
}

impl From<&BillingSettings> for BillingConfig {
    fn from(settings: &BillingSettings) -> Self {
        BillingConfig {
            service_charge_rate: Rate::from_bps(settings.service_charge_bps),
            tax_rate: Rate::from_bps(settings.tax_bps),
            platform_fee: Money::from_minor(settings.platform_fee_minor),
        }
    }
}

// =============================================================================
// Main Checkout Configuration
// =============================================================================

/// Complete checkout configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub billing: BillingSettings,
}

impl CheckoutConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (checkout.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CheckoutResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CheckoutResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CheckoutError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Checkout config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CheckoutResult<()> {
        let url = url::Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CheckoutError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(CheckoutError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        self.billing_config()
            .validate()
            .map_err(|e| CheckoutError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// The calculator configuration these settings describe.
    pub fn billing_config(&self) -> BillingConfig {
        BillingConfig::from(&self.billing)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("REZ_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = env_parse::<u64>("REZ_API_TIMEOUT_SECS") {
            self.api.timeout_secs = secs;
        }

        if let Some(retries) = env_parse::<u32>("REZ_API_MAX_RETRIES") {
            self.api.max_retries = retries;
        }

        if let Some(bps) = env_parse::<u32>("REZ_SERVICE_CHARGE_BPS") {
            debug!(bps, "Overriding service charge from environment");
            self.billing.service_charge_bps = bps;
        }

        if let Some(bps) = env_parse::<u32>("REZ_TAX_BPS") {
            debug!(bps, "Overriding tax rate from environment");
            self.billing.tax_bps = bps;
        }

        if let Some(fee) = env_parse::<i64>("REZ_PLATFORM_FEE") {
            self.billing.platform_fee_minor = fee;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("money", "rez", "checkout")
            .map(|dirs| dirs.config_dir().join("checkout.toml"))
    }
}

/// Reads and parses an environment variable, warning on garbage.
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}
