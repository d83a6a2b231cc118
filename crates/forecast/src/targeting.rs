//! Targeting criteria and their resolution against the aggregate index.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use adplan_core::ValueObject;

use crate::config::ForecastConfig;
use crate::index::{AggregateIndex, DataSource};

/// Requested values per targeting dimension.
///
/// An empty value set means "dimension considered but unconstrained".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetingCriteria(BTreeMap<String, BTreeSet<String>>);

impl ValueObject for TargetingCriteria {}

impl TargetingCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`TargetingCriteria::insert`].
    pub fn with<I, V>(mut self, dimension: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(dimension, values);
        self
    }

    /// Add values to a dimension (creating it when absent).
    pub fn insert<I, V>(&mut self, dimension: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.0
            .entry(dimension.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn values(&self, dimension: &str) -> Option<&BTreeSet<String>> {
        self.0.get(dimension)
    }

    /// Dimensions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0.iter().map(|(d, v)| (d.as_str(), v))
    }
}

impl<D, I, V> FromIterator<(D, I)> for TargetingCriteria
where
    D: Into<String>,
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (D, I)>>(iter: T) -> Self {
        let mut criteria = Self::new();
        for (dimension, values) in iter {
            criteria.insert(dimension, values);
        }
        criteria
    }
}

/// Pricing class of a targeting dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    Network,
    Geographic,
    Content,
    Other,
}

impl DimensionKind {
    pub fn classify(dimension: &str) -> Self {
        match dimension.trim().to_ascii_lowercase().as_str() {
            "network" => DimensionKind::Network,
            "zip" | "geo" | "dma" | "metro" | "region" | "state" | "city" | "country" => {
                DimensionKind::Geographic
            }
            "genre" | "content" => DimensionKind::Content,
            _ => DimensionKind::Other,
        }
    }

    pub fn premium(self, config: &ForecastConfig) -> f64 {
        match self {
            DimensionKind::Network => config.network_premium,
            DimensionKind::Geographic => config.geographic_premium,
            DimensionKind::Content => config.content_premium,
            DimensionKind::Other => 1.0,
        }
    }
}

/// How one targeted dimension contributed to the resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionBreakdown {
    pub dimension: String,
    pub kind: DimensionKind,
    /// Whether the fill-rate table has records for this dimension.
    pub known: bool,
    pub value_count: usize,
    /// Dimension-level fill rate (ignoring the requested values).
    pub fill_rate: f64,
    /// Fill rate entering the weighted mix for the requested values.
    pub fill_contribution: f64,
    pub weight: f64,
    pub inventory_contribution: u64,
    /// Multiplier applied to the price (1.0 when no values are requested).
    pub premium: f64,
    pub confidence: f64,
}

/// Output of [`TargetingResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub combined_fill_rate: f64,
    pub inventory_ceiling: u64,
    /// Price per 1000 units before fill-rate and inventory constraints.
    pub price_estimate: f64,
    pub confidence: f64,
    pub breakdown: Vec<DimensionBreakdown>,
}

/// Combines multi-dimension targeting into a single supply estimate.
///
/// Deterministic and infallible: unknown dimensions and values resolve through
/// the index fallbacks.
#[derive(Debug, Clone, Copy)]
pub struct TargetingResolver<'a> {
    index: &'a AggregateIndex,
    config: &'a ForecastConfig,
}

impl<'a> TargetingResolver<'a> {
    pub fn new(index: &'a AggregateIndex, config: &'a ForecastConfig) -> Self {
        Self { index, config }
    }

    pub fn resolve(&self, criteria: &TargetingCriteria) -> Resolution {
        let base_price = self.base_price();

        if criteria.is_empty() {
            return Resolution {
                combined_fill_rate: self.index.global_fill_rate(),
                inventory_ceiling: self.index.total_inventory(),
                price_estimate: base_price,
                confidence: self.config.untargeted_confidence,
                breakdown: Vec::new(),
            };
        }

        let breakdown: Vec<DimensionBreakdown> = criteria
            .iter()
            .map(|(dimension, values)| self.resolve_dimension(dimension, values))
            .collect();

        let (weighted, weights) = breakdown.iter().fold((0.0, 0.0), |(sum, w), d| {
            (sum + d.fill_contribution * d.weight, w + d.weight)
        });
        let combined_fill_rate = weighted / weights;

        // Dimensions constrain the same pool simultaneously: the scarcest one binds.
        let inventory_ceiling = breakdown
            .iter()
            .map(|d| d.inventory_contribution)
            .min()
            .unwrap_or_else(|| self.index.total_inventory());

        let price_estimate = breakdown.iter().fold(base_price, |price, d| price * d.premium);

        let confidence = if breakdown.iter().any(|d| d.known) {
            breakdown.iter().map(|d| d.confidence).sum::<f64>() / breakdown.len() as f64
        } else {
            self.config.untargeted_confidence
        };

        Resolution {
            combined_fill_rate,
            inventory_ceiling,
            price_estimate,
            confidence,
            breakdown,
        }
    }

    fn base_price(&self) -> f64 {
        match self.index.data_source() {
            DataSource::Real => self.config.base_price,
            DataSource::Synthetic => self.config.synthetic_base_price,
        }
    }

    fn resolve_dimension(&self, dimension: &str, values: &BTreeSet<String>) -> DimensionBreakdown {
        let kind = DimensionKind::classify(dimension);
        let aggregate = self.index.dimension(dimension);

        let (fill_contribution, inventory_contribution) = if values.is_empty() {
            (
                self.index.fill_rate_for(dimension, None),
                self.index.dimension_inventory(dimension),
            )
        } else {
            let fill_sum: f64 = values
                .iter()
                .map(|v| self.index.fill_rate_for(dimension, Some(v)))
                .sum();
            let inventory = values.iter().fold(0u64, |acc, v| {
                acc.saturating_add(self.index.inventory_for(dimension, Some(v)))
            });
            (fill_sum / values.len() as f64, inventory)
        };

        let confidence = match aggregate {
            Some(agg) => (self.config.record_confidence_floor
                + agg.record_count() as f64 / self.config.records_per_confidence_unit)
                .min(self.config.record_confidence_cap),
            None => self.config.unknown_dimension_confidence,
        };

        DimensionBreakdown {
            dimension: dimension.to_string(),
            kind,
            known: aggregate.is_some(),
            value_count: values.len(),
            fill_rate: self.index.fill_rate_for(dimension, None),
            fill_contribution,
            weight: values.len().max(1) as f64,
            inventory_contribution,
            premium: if values.is_empty() { 1.0 } else { kind.premium(self.config) },
            confidence,
        }
    }
}
