//! Spreading a campaign's budget and inventory over its periods.
//!
//! Both curves are fixed tables, not learned from historical pacing.

const RAMP_UP_WEIGHT: f64 = 0.8;
const PEAK_WEIGHT: f64 = 1.1;
const WIND_DOWN_WEIGHT: f64 = 0.9;

/// Unnormalized pacing weights for `periods` periods (at least one).
///
/// Short campaigns (two periods or fewer) pace evenly; longer ones ramp up,
/// peak mid-campaign and wind down.
pub fn pacing_weights(periods: u32) -> Vec<f64> {
    let n = periods.max(1) as usize;
    if n <= 2 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| match i {
            0 => RAMP_UP_WEIGHT,
            i if i == n - 1 => WIND_DOWN_WEIGHT,
            _ => PEAK_WEIGHT,
        })
        .collect()
}

/// Split `budget` into per-period allocations following [`pacing_weights`].
pub fn allocate_budget(budget: f64, periods: u32) -> Vec<f64> {
    split_by_weights(budget, &pacing_weights(periods))
}

/// Share an inventory ceiling between periods in proportion to their budget
/// allocations, so a period's cap binds exactly when the campaign ceiling does.
pub fn pace_inventory(total: u64, allocations: &[f64]) -> Vec<f64> {
    split_by_weights(total as f64, allocations)
}

/// Spread an inventory ceiling over `periods` periods by cycling the seasonal
/// multiplier table. An empty table spreads evenly.
pub fn distribute_inventory(total: u64, periods: u32, multipliers: &[f64]) -> Vec<f64> {
    let n = periods.max(1) as usize;
    let weights: Vec<f64> = if multipliers.is_empty() {
        vec![1.0; n]
    } else {
        (0..n).map(|i| multipliers[i % multipliers.len()]).collect()
    };
    split_by_weights(total as f64, &weights)
}

/// Normalize `weights` and scale them to `total`.
///
/// The last share absorbs the rounding remainder so the parts add back up to `total`.
fn split_by_weights(total: f64, weights: &[f64]) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    if weights.is_empty() || sum <= 0.0 {
        return vec![total];
    }

    let mut parts: Vec<f64> = weights.iter().map(|w| total * w / sum).collect();
    if let Some((last, head)) = parts.split_last_mut() {
        let assigned: f64 = head.iter().sum();
        *last = (total - assigned).max(0.0);
    }
    parts
}
