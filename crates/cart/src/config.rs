//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `NEXUS_CART_DIR` - Directory holding the cart snapshot (default: .nexus-market)
//! - `NEXUS_CART_KEY` - Snapshot key within the directory (default: cart)
//! - `NEXUS_SHIPPING_FLAT_RATE` - Flat shipping per order (default: 120)
//! - `NEXUS_TAX_FLAT_AMOUNT` - Flat tax per order (default: 0)
//! - `NEXUS_CURRENCY` - ISO 4217 display currency (default: BDT)

use std::path::PathBuf;
use std::str::FromStr;

use nexus_market_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::checkout::PricingConfig;
use crate::storage::validate_key;
use crate::store::DEFAULT_CART_KEY;

const DEFAULT_CART_DIR: &str = ".nexus-market";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory acting as the storage origin
    pub storage_dir: PathBuf,
    /// Key of the snapshot slot
    pub cart_key: String,
    /// Checkout charges and currency
    pub pricing: PricingConfig,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_CART_DIR),
            cart_key: DEFAULT_CART_KEY.to_string(),
            pricing: PricingConfig::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_dir = lookup("NEXUS_CART_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_CART_DIR), PathBuf::from);

        let cart_key = lookup("NEXUS_CART_KEY").unwrap_or_else(|| DEFAULT_CART_KEY.to_string());
        validate_key(&cart_key)
            .map_err(|e| ConfigError::InvalidEnvVar("NEXUS_CART_KEY".to_string(), e.to_string()))?;

        let shipping_flat_rate = parse_amount(&lookup, "NEXUS_SHIPPING_FLAT_RATE")?
            .unwrap_or_else(|| Price::from_units(PricingConfig::DEFAULT_SHIPPING));
        let tax_flat_amount = parse_amount(&lookup, "NEXUS_TAX_FLAT_AMOUNT")?.unwrap_or(Price::ZERO);
        let currency = match lookup("NEXUS_CURRENCY") {
            Some(raw) => CurrencyCode::from_str(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar("NEXUS_CURRENCY".to_string(), e))?,
            None => CurrencyCode::default(),
        };

        Ok(Self {
            storage_dir,
            cart_key,
            pricing: PricingConfig {
                shipping_flat_rate,
                tax_flat_amount,
                currency,
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional non-negative decimal amount.
fn parse_amount<F>(lookup: &F, key: &str) -> Result<Option<Price>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    let amount = Decimal::from_str(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    let price = Price::new(amount);
    if price.is_negative() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(Some(price))
}
