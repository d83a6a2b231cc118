//! Budget → delivery projection under fill-rate and inventory constraints.

use serde::Serialize;

use crate::config::ForecastConfig;

/// Inputs for one projection (a single period, or a whole campaign).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionInput {
    /// Budget allocated to the period.
    pub allocation: f64,
    /// Estimated price per 1000 units.
    pub price_estimate: f64,
    /// Historical fill rate in `[0, 1]`.
    pub fill_rate: f64,
    /// Hard supply cap for the period, in units.
    pub inventory_ceiling: f64,
}

/// Delivery projection.
///
/// `impressions <= inventory_available` holds for every projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub budget: f64,
    pub inventory_available: f64,
    /// Units the budget would buy at the estimated price, ignoring supply.
    pub demanded_impressions: f64,
    pub impressions: f64,
    pub fill_rate_percent: f64,
    /// Realized price per 1000 delivered units.
    pub effective_price: f64,
    pub reach: u64,
    pub frequency: f64,
}

/// Unique-audience model shared by period and campaign projections.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReachModel {
    pub reach_factor: f64,
    pub floor_ratio: f64,
    pub target_frequency: Option<f64>,
}

impl ReachModel {
    pub fn from_config(config: &ForecastConfig, target_frequency: Option<f64>) -> Self {
        Self {
            reach_factor: config.reach_factor,
            floor_ratio: config.reach_floor_ratio,
            target_frequency,
        }
    }

    /// Estimated unique reach for `impressions` delivered units.
    ///
    /// A high frequency target trades reach for repetition; a low one widens reach.
    /// Adjustments never drop reach below `floor_ratio` of the base estimate.
    pub fn reach(&self, impressions: f64) -> u64 {
        let base = impressions.max(0.0) * self.reach_factor;
        let adjusted = match self.target_frequency {
            None => base,
            Some(f) => {
                let factor = if f >= 3.0 {
                    0.85
                } else if f >= 2.5 {
                    0.95
                } else {
                    1.05
                };
                (base * factor).max(base * self.floor_ratio)
            }
        };
        adjusted as u64
    }

    /// Impressions per reached viewer; zero when nobody is reached.
    pub fn frequency(impressions: f64, reach: u64) -> f64 {
        if reach == 0 {
            0.0
        } else {
            impressions / reach as f64
        }
    }
}

/// Project delivery for one budget allocation.
///
/// The inventory ceiling is applied here and only here.
pub fn project(input: ProjectionInput, reach_model: &ReachModel) -> Projection {
    let ProjectionInput {
        allocation,
        price_estimate,
        fill_rate,
        inventory_ceiling,
    } = input;

    let demanded = if price_estimate > 0.0 && allocation > 0.0 {
        allocation / price_estimate * 1000.0
    } else {
        0.0
    };
    let constrained = demanded * fill_rate.clamp(0.0, 1.0);
    let ceiling = inventory_ceiling.max(0.0);
    let impressions = constrained.min(ceiling);

    let fill_rate_percent = fill_rate_percent(impressions, demanded);
    let effective_price = if impressions > 0.0 {
        allocation / impressions * 1000.0
    } else {
        price_estimate
    };

    let reach = reach_model.reach(impressions);

    Projection {
        budget: allocation,
        inventory_available: ceiling,
        demanded_impressions: demanded,
        impressions,
        fill_rate_percent,
        effective_price,
        reach,
        frequency: ReachModel::frequency(impressions, reach),
    }
}

fn fill_rate_percent(delivered: f64, demanded: f64) -> f64 {
    if demanded > 0.0 {
        (delivered / demanded * 100.0).min(100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn model(target_frequency: Option<f64>) -> ReachModel {
        ReachModel::from_config(&ForecastConfig::default(), target_frequency)
    }

    fn input(allocation: f64, fill_rate: f64, inventory_ceiling: f64) -> ProjectionInput {
        ProjectionInput {
            allocation,
            price_estimate: 12.0 * 1.20,
            fill_rate,
            inventory_ceiling,
        }
    }

    #[test]
    fn fill_rate_limits_delivery_below_ceiling() {
        let p = project(input(1_000.0, 0.05, 10_000.0), &model(None));

        assert!((p.demanded_impressions - 69_444.444).abs() < 0.01);
        assert!((p.impressions - 3_472.222).abs() < 0.01);
        assert!((p.fill_rate_percent - 5.0).abs() < 1e-9);
        assert!((p.effective_price - 288.0).abs() < 1e-6);
    }

    #[test]
    fn ceiling_binds_when_supply_is_scarce() {
        let p = project(input(1_000.0, 0.05, 2_000.0), &model(None));

        assert_eq!(p.impressions, 2_000.0);
        assert!((p.fill_rate_percent - 2.88).abs() < 1e-9);
        assert!((p.effective_price - 500.0).abs() < 1e-9);
    }

    #[test]
    fn reach_and_frequency_follow_the_uniqueness_factor() {
        let p = project(input(1_000.0, 0.05, 2_000.0), &model(None));
        assert_eq!(p.reach, 1_300);
        assert!((p.frequency - 2_000.0 / 1_300.0).abs() < 1e-12);
    }

    #[test]
    fn target_frequency_adjusts_reach() {
        let base = 1_300.0;
        let high = project(input(1_000.0, 0.05, 2_000.0), &model(Some(3.5)));
        let mid = project(input(1_000.0, 0.05, 2_000.0), &model(Some(2.7)));
        let low = project(input(1_000.0, 0.05, 2_000.0), &model(Some(1.5)));

        assert_eq!(high.reach, (base * 0.85) as u64);
        assert_eq!(mid.reach, (base * 0.95) as u64);
        assert_eq!(low.reach, (base * 1.05) as u64);
        assert!(high.frequency > mid.frequency && mid.frequency > low.frequency);
    }

    #[test]
    fn reach_never_collapses_below_floor() {
        let aggressive = ReachModel {
            reach_factor: 0.65,
            floor_ratio: 0.9,
            target_frequency: Some(5.0),
        };
        assert_eq!(aggressive.reach(2_000.0), (1_300.0 * 0.9) as u64);
    }

    #[test]
    fn zero_price_and_zero_budget_do_not_divide_by_zero() {
        let zero_price = project(
            ProjectionInput {
                allocation: 1_000.0,
                price_estimate: 0.0,
                fill_rate: 0.5,
                inventory_ceiling: 100.0,
            },
            &model(None),
        );
        assert_eq!(zero_price.impressions, 0.0);
        assert_eq!(zero_price.fill_rate_percent, 0.0);
        assert_eq!(zero_price.effective_price, 0.0);
        assert_eq!(zero_price.reach, 0);
        assert_eq!(zero_price.frequency, 0.0);

        let zero_budget = project(input(0.0, 0.5, 100.0), &model(None));
        assert_eq!(zero_budget.impressions, 0.0);
        assert_eq!(zero_budget.effective_price, 12.0 * 1.20);
    }

    #[test]
    fn zero_ceiling_falls_back_to_estimated_price() {
        let p = project(input(1_000.0, 0.5, 0.0), &model(None));
        assert_eq!(p.impressions, 0.0);
        assert_eq!(p.effective_price, 12.0 * 1.20);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: delivery never exceeds the inventory ceiling.
        #[test]
        fn impressions_never_exceed_ceiling(
            allocation in 0.0f64..1.0e8,
            price in 0.01f64..500.0,
            fill_rate in 0.0f64..=1.0,
            ceiling in 0.0f64..1.0e10,
            target in prop::option::of(0.1f64..10.0),
        ) {
            let p = project(
                ProjectionInput { allocation, price_estimate: price, fill_rate, inventory_ceiling: ceiling },
                &model(target),
            );
            prop_assert!(p.impressions <= p.inventory_available);
            prop_assert!(p.impressions <= ceiling);
            prop_assert!((0.0..=100.0).contains(&p.fill_rate_percent));
            prop_assert!(p.frequency >= 0.0);
            prop_assert!(p.effective_price.is_finite());
        }
    }
}
