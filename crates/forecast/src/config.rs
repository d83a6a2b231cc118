//! Tunable constants of the forecasting model.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use adplan_core::{DomainError, DomainResult};

use crate::index::SYNTHETIC_BASE_PRICE;

pub const BASE_PRICE_ENV: &str = "ADPLAN_BASE_PRICE";
pub const SYNTHETIC_BASE_PRICE_ENV: &str = "ADPLAN_SYNTHETIC_BASE_PRICE";
pub const REACH_FACTOR_ENV: &str = "ADPLAN_REACH_FACTOR";

/// Forecasting model parameters.
///
/// Defaults reproduce the documented model. Prices are per 1000 delivered units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Base price when the index was built from real tables.
    pub base_price: f64,
    /// Base price when the index is the synthetic fallback.
    pub synthetic_base_price: f64,

    pub network_premium: f64,
    pub geographic_premium: f64,
    pub content_premium: f64,

    /// Resolver confidence when no targeted dimension is known to the index.
    pub untargeted_confidence: f64,
    /// Contribution of a targeted dimension the index has never seen.
    pub unknown_dimension_confidence: f64,
    /// Per-dimension confidence is `min(cap, floor + records / records_per_confidence_unit)`.
    pub record_confidence_floor: f64,
    pub record_confidence_cap: f64,
    pub records_per_confidence_unit: f64,

    pub real_data_confidence: f64,
    pub synthetic_data_confidence: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,

    /// Share of delivered impressions assumed to reach unique viewers.
    pub reach_factor: f64,
    /// Target-frequency adjustments never push reach below `base * reach_floor_ratio`.
    pub reach_floor_ratio: f64,

    /// Cycled across periods to spread the inventory ceiling over the timeline.
    pub seasonal_multipliers: Vec<f64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_price: 12.0,
            synthetic_base_price: SYNTHETIC_BASE_PRICE,
            network_premium: 1.20,
            geographic_premium: 1.10,
            content_premium: 1.15,
            untargeted_confidence: 0.85,
            unknown_dimension_confidence: 0.6,
            record_confidence_floor: 0.5,
            record_confidence_cap: 0.95,
            records_per_confidence_unit: 1000.0,
            real_data_confidence: 0.85,
            synthetic_data_confidence: 0.65,
            min_confidence: 0.6,
            max_confidence: 0.98,
            reach_factor: 0.65,
            reach_floor_ratio: 0.7,
            seasonal_multipliers: vec![0.85, 1.15],
        }
    }
}

impl ForecastConfig {
    /// Defaults overridden from `ADPLAN_*` environment variables.
    ///
    /// Unparsable or out-of-range values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ForecastConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = parse_override::<f64>(&lookup, BASE_PRICE_ENV, |v| *v > 0.0) {
            cfg.base_price = v;
        }
        if let Some(v) = parse_override::<f64>(&lookup, SYNTHETIC_BASE_PRICE_ENV, |v| *v > 0.0) {
            cfg.synthetic_base_price = v;
        }
        if let Some(v) =
            parse_override::<f64>(&lookup, REACH_FACTOR_ENV, |v| *v > 0.0 && *v <= 1.0)
        {
            cfg.reach_factor = v;
        }

        cfg
    }

    /// Check the parameters are usable by the model.
    pub fn validate(&self) -> DomainResult<()> {
        let positive = [
            ("base_price", self.base_price),
            ("synthetic_base_price", self.synthetic_base_price),
            ("network_premium", self.network_premium),
            ("geographic_premium", self.geographic_premium),
            ("content_premium", self.content_premium),
            ("records_per_confidence_unit", self.records_per_confidence_unit),
            ("reach_factor", self.reach_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DomainError::validation(format!(
                    "{name} must be a finite positive number (got {value})"
                )));
            }
        }

        if self.reach_factor > 1.0 {
            return Err(DomainError::validation("reach_factor must be <= 1.0"));
        }
        if !(0.0..=1.0).contains(&self.reach_floor_ratio) {
            return Err(DomainError::validation("reach_floor_ratio must be within [0, 1]"));
        }
        if !(0.0 <= self.min_confidence
            && self.min_confidence <= self.max_confidence
            && self.max_confidence <= 1.0)
        {
            return Err(DomainError::invariant(
                "confidence bounds must satisfy 0 <= min <= max <= 1",
            ));
        }
        if self.seasonal_multipliers.is_empty()
            || self
                .seasonal_multipliers
                .iter()
                .any(|m| !(m.is_finite() && *m > 0.0))
        {
            return Err(DomainError::validation(
                "seasonal_multipliers must be non-empty and strictly positive",
            ));
        }

        Ok(())
    }
}

fn parse_override<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    accept: impl Fn(&T) -> bool,
) -> Option<T>
where
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) if accept(&v) => Some(v),
        _ => {
            warn!(key, value = %raw, "ignoring invalid configuration override");
            None
        }
    }
}
