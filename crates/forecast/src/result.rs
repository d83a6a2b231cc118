use chrono::NaiveDate;
use serde::Serialize;

use adplan_core::{CampaignId, ValueObject};

use crate::calculator::Projection;
use crate::index::DataSource;
use crate::targeting::DimensionBreakdown;

/// Projected delivery for a campaign or one of its periods.
///
/// Volumes are in units; prices are per 1000 delivered units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub total_inventory_available: f64,
    /// Never exceeds `total_inventory_available`.
    pub forecasted_impressions: f64,
    /// `forecasted_impressions / demanded impressions * 100`, capped at 100.
    pub fill_rate_percent: f64,
    pub effective_price: f64,
    pub estimated_reach: u64,
    pub frequency: f64,
    /// Within the configured bounds (default `[0.6, 0.98]`).
    pub confidence: f64,
}

impl ValueObject for ForecastResult {}

impl ForecastResult {
    pub(crate) fn from_projection(projection: &Projection, confidence: f64) -> Self {
        Self {
            total_inventory_available: projection.inventory_available,
            forecasted_impressions: projection.impressions,
            fill_rate_percent: projection.fill_rate_percent,
            effective_price: projection.effective_price,
            estimated_reach: projection.reach,
            frequency: projection.frequency,
            confidence,
        }
    }
}

/// Projection scoped to a single period's budget allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodForecast {
    /// 1-based period number.
    pub period: u32,
    pub budget: f64,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    /// Expected supply for the week under the seasonal table. Informational;
    /// delivery is capped by `forecast.total_inventory_available`.
    pub seasonal_inventory: f64,
    pub forecast: ForecastResult,
}

/// Derived efficiency figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceBreakdown {
    /// Share of available inventory the campaign is projected to consume.
    pub inventory_utilization_percent: f64,
    /// Spend per 1000 unique viewers reached.
    pub cost_per_thousand_reached: f64,
}

impl PerformanceBreakdown {
    pub(crate) fn from_result(budget: f64, result: &ForecastResult) -> Self {
        let inventory_utilization_percent = if result.total_inventory_available > 0.0 {
            result.forecasted_impressions / result.total_inventory_available * 100.0
        } else {
            0.0
        };
        let cost_per_thousand_reached = if result.estimated_reach > 0 {
            budget / result.estimated_reach as f64 * 1000.0
        } else {
            0.0
        };
        Self {
            inventory_utilization_percent,
            cost_per_thousand_reached,
        }
    }
}

/// Campaign-level forecast with its per-period breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignForecast {
    pub campaign_id: Option<CampaignId>,
    pub budget: f64,
    pub timeline_weeks: u32,
    pub data_source: DataSource,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    /// Campaign totals.
    pub result: ForecastResult,
    pub periods: Vec<PeriodForecast>,
    pub targeting: Vec<DimensionBreakdown>,
    pub performance: PerformanceBreakdown,
}

impl CampaignForecast {
    /// Per-period budget allocations, in period order.
    pub fn allocations(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.budget).collect()
    }
}
