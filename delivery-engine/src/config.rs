//! Workspace-wide configuration
//!
//! One TOML file carries every engine's section; missing sections and keys
//! fall back to defaults.
//!
//! ```toml
//! [matching]
//! max_candidates = 5
//!
//! [pricing]
//! minimum_fare = "1200"
//!
//! [settlement.retry]
//! max_retries = 5
//! ```

use crate::{Error, Result};
use matching_engine::MatchingConfig;
use pricing_engine::PricingConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use settlement::SettlementConfig;
use std::path::Path;
use std::str::FromStr;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Matching limits and scoring weights
    pub matching: MatchingConfig,

    /// Fare policy
    pub pricing: PricingConfig,

    /// Commission, tax, retry and payout schedule
    pub settlement: SettlementConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "giller-core".to_string(),
            matching: MatchingConfig::default(),
            pricing: PricingConfig::default(),
            settlement: SettlementConfig::default(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults overridden by `GILLER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load defaults overridden by whatever `lookup` returns per variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(name) = lookup("GILLER_SERVICE_NAME") {
            config.service_name = name;
        }

        override_with(&lookup, "GILLER_MAX_CANDIDATES", &mut config.matching.max_candidates)?;
        override_with(
            &lookup,
            "GILLER_MAX_NEARBY_STATION_KM",
            &mut config.matching.max_nearby_station_km,
        )?;
        override_with(
            &lookup,
            "GILLER_MAX_TRANSFER_ROUTES",
            &mut config.matching.max_transfer_routes,
        )?;
        override_with::<Decimal, _>(&lookup, "GILLER_MINIMUM_FARE", &mut config.pricing.minimum_fare)?;
        override_with::<Decimal, _>(
            &lookup,
            "GILLER_SERVICE_FEE_RATE",
            &mut config.pricing.service_fee_rate,
        )?;
        override_with::<Decimal, _>(&lookup, "GILLER_TAX_RATE", &mut config.settlement.tax_rate)?;
        override_with(&lookup, "GILLER_MAX_RETRIES", &mut config.settlement.retry.max_retries)?;
        override_with(
            &lookup,
            "GILLER_BATCH_CONCURRENCY",
            &mut config.settlement.batch_concurrency,
        )?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.matching.validate()?;
        self.pricing.validate()?;
        self.settlement.validate()?;
        Ok(())
    }
}

fn override_with<T, F>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e)))?;
    }
    Ok(())
}
