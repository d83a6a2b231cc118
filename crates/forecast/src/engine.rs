use std::sync::Arc;

use tracing::debug;

use crate::calculator::{self, Projection, ProjectionInput, ReachModel};
use crate::confidence;
use crate::config::ForecastConfig;
use crate::index::AggregateIndex;
use crate::pacing::{allocate_budget, distribute_inventory, pace_inventory};
use crate::request::ForecastRequest;
use crate::result::{CampaignForecast, ForecastResult, PerformanceBreakdown, PeriodForecast};
use crate::targeting::{Resolution, TargetingCriteria, TargetingResolver};
use crate::timeline::period_dates;

/// Forecasting entry point.
///
/// Holds the shared, immutable index and the model parameters. `forecast` takes
/// `&self` and touches no mutable state, so one engine can serve any number of
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    index: Arc<AggregateIndex>,
    config: ForecastConfig,
}

impl ForecastEngine {
    pub fn new(index: Arc<AggregateIndex>, config: ForecastConfig) -> Self {
        Self { index, config }
    }

    pub fn with_default_config(index: Arc<AggregateIndex>) -> Self {
        Self::new(index, ForecastConfig::default())
    }

    pub fn index(&self) -> &AggregateIndex {
        &self.index
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn resolve(&self, criteria: &TargetingCriteria) -> Resolution {
        TargetingResolver::new(&self.index, &self.config).resolve(criteria)
    }

    /// Project campaign delivery for `request`.
    ///
    /// The campaign total is one projection of the whole budget against the
    /// resolved inventory ceiling. Periods break it down: each gets its paced
    /// budget and the same share of the ceiling, so period volumes add up to the
    /// campaign's.
    pub fn forecast(&self, request: &ForecastRequest) -> CampaignForecast {
        let weeks = request.timeline_weeks().max(1);
        let span = tracing::debug_span!(
            "forecast",
            campaign = ?request.campaign_id(),
            weeks,
            budget = request.budget()
        );
        let _enter = span.enter();

        let resolution = self.resolve(request.criteria());
        let confidence = confidence::score(resolution.confidence, self.index.data_source(), &self.config);
        let reach_model = ReachModel::from_config(&self.config, request.target_frequency());

        let project = |allocation: f64, inventory_ceiling: f64| {
            calculator::project(
                ProjectionInput {
                    allocation,
                    price_estimate: resolution.price_estimate,
                    fill_rate: resolution.combined_fill_rate,
                    inventory_ceiling,
                },
                &reach_model,
            )
        };

        let totals = project(request.budget(), resolution.inventory_ceiling as f64);
        let result = ForecastResult::from_projection(&totals, confidence);

        let allocations = allocate_budget(request.budget(), weeks);
        let ceilings = pace_inventory(resolution.inventory_ceiling, &allocations);
        let seasonal = distribute_inventory(
            resolution.inventory_ceiling,
            weeks,
            &self.config.seasonal_multipliers,
        );
        let projections: Vec<Projection> = allocations
            .iter()
            .zip(&ceilings)
            .map(|(&allocation, &ceiling)| project(allocation, ceiling))
            .collect();

        let start = request.start_date();
        let periods: Vec<PeriodForecast> = projections
            .iter()
            .zip(&seasonal)
            .zip(1u32..)
            .map(|((projection, &seasonal_inventory), period)| {
                let dates = start.map(|s| period_dates(s, period));
                PeriodForecast {
                    period,
                    budget: projection.budget,
                    starts_on: dates.map(|(first, _)| first),
                    ends_on: dates.map(|(_, last)| last),
                    seasonal_inventory,
                    forecast: ForecastResult::from_projection(projection, confidence),
                }
            })
            .collect();

        debug!(
            ceiling = resolution.inventory_ceiling,
            fill_rate = resolution.combined_fill_rate,
            price_estimate = resolution.price_estimate,
            impressions = result.forecasted_impressions,
            confidence,
            "forecast computed"
        );

        CampaignForecast {
            campaign_id: request.campaign_id(),
            budget: request.budget(),
            timeline_weeks: weeks,
            data_source: self.index.data_source(),
            starts_on: periods.first().and_then(|p| p.starts_on),
            ends_on: periods.last().and_then(|p| p.ends_on),
            performance: PerformanceBreakdown::from_result(request.budget(), &result),
            result,
            periods,
            targeting: resolution.breakdown,
        }
    }
}
