//! Final confidence score.

use crate::config::ForecastConfig;
use crate::index::DataSource;

/// Confidence attached to the data the index was built from.
pub fn data_source_confidence(source: DataSource, config: &ForecastConfig) -> f64 {
    match source {
        DataSource::Real => config.real_data_confidence,
        DataSource::Synthetic => config.synthetic_data_confidence,
    }
}

/// Mean of resolver and data-source confidence, clamped to the configured bounds.
pub fn score(resolver_confidence: f64, source: DataSource, config: &ForecastConfig) -> f64 {
    let mean = (resolver_confidence + data_source_confidence(source, config)) / 2.0;
    if !mean.is_finite() {
        return config.min_confidence;
    }
    mean.clamp(config.min_confidence, config.max_confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn averages_with_data_source_confidence() {
        let cfg = ForecastConfig::default();
        assert!((score(0.85, DataSource::Real, &cfg) - 0.85).abs() < 1e-12);
        assert!((score(0.85, DataSource::Synthetic, &cfg) - 0.75).abs() < 1e-12);
        assert!((score(0.502, DataSource::Real, &cfg) - 0.676).abs() < 1e-12);
    }

    #[test]
    fn clamps_to_bounds() {
        let cfg = ForecastConfig::default();
        assert_eq!(score(0.0, DataSource::Synthetic, &cfg), 0.6);
        assert_eq!(score(2.0, DataSource::Real, &cfg), 0.98);
        assert_eq!(score(f64::NAN, DataSource::Real, &cfg), 0.6);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the score always lies within [0.6, 0.98].
        #[test]
        fn score_is_bounded(resolver in -10.0f64..10.0, synthetic in any::<bool>()) {
            let cfg = ForecastConfig::default();
            let source = if synthetic { DataSource::Synthetic } else { DataSource::Real };
            let s = score(resolver, source, &cfg);
            prop_assert!((0.6..=0.98).contains(&s));
        }
    }
}
