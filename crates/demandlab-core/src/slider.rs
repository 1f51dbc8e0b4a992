//! Slider range resolution for the analysis-price control.
//!
//! The range pads the observed prices asymmetrically (0.8x below the
//! minimum, 1.2x above the maximum) and is split into equal-width tick
//! intervals. Lookup failures never propagate: the control falls back to a
//! fixed range so it stays usable.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{AnalysisConfig, AnalysisError, GroupedPanelStore, PanelKey};

/// One labelled tick mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderTick {
    pub value: f64,
    pub label: String,
}

/// Numeric range, default position, and tick marks for a price slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub midpoint: f64,
    pub ticks: Vec<SliderTick>,
    /// `true` when the fixed fallback range was served.
    pub fallback: bool,
}

impl SliderRange {
    /// Range over `[min, max]` with `tick_count` marks, endpoints included.
    /// Inner marks are rounded to cents; every mark is kept inside the range.
    pub fn spanning(min: f64, max: f64, tick_count: usize) -> Self {
        let intervals = tick_count.saturating_sub(1).max(1);
        let width = (max - min) / intervals as f64;
        let ticks = (0..=intervals)
            .map(|i| {
                let value = round_cents(min + i as f64 * width).clamp(min, max);
                SliderTick {
                    label: format!("${value:.2}"),
                    value,
                }
            })
            .collect();

        Self {
            min,
            max,
            midpoint: (min + max) / 2.0,
            ticks,
            fallback: false,
        }
    }

    pub fn fallback(config: &AnalysisConfig) -> Self {
        let (min, max) = config.fallback_range;
        Self {
            fallback: true,
            ..Self::spanning(min, max, config.tick_count)
        }
    }
}

/// Padded range for a raw price series. Empty, all-zero, or non-finite
/// input yields the fallback range.
pub fn range_for(prices: &[f64], config: &AnalysisConfig) -> SliderRange {
    let bounds = prices.iter().fold(None, |bounds, &p| match bounds {
        None => Some((p, p)),
        Some((lo, hi)) => Some((f64::min(lo, p), f64::max(hi, p))),
    });

    match bounds {
        Some((observed_min, observed_max)) => range_within(observed_min, observed_max, config),
        None => SliderRange::fallback(config),
    }
}

/// Padded range for already-known observed price extremes.
pub fn range_within(observed_min: f64, observed_max: f64, config: &AnalysisConfig) -> SliderRange {
    let min = config.lower_padding * observed_min;
    let max = config.upper_padding * observed_max;
    if !(min.is_finite() && max.is_finite() && min < max) {
        return SliderRange::fallback(config);
    }

    SliderRange::spanning(min, max, config.tick_count)
}

/// Resolve the range for a selection from its raw row prices, serving the
/// fallback on lookup failure.
pub fn range_for_key(
    store: &GroupedPanelStore,
    key: &PanelKey,
    config: &AnalysisConfig,
) -> SliderRange {
    match store.raw_price_bounds(key) {
        Ok((lo, hi)) => range_within(lo, hi, config),
        Err(error) => {
            log_fallback(&error);
            SliderRange::fallback(config)
        }
    }
}

fn log_fallback(error: &AnalysisError) {
    warn!(code = error.code(), %error, "serving fallback slider range");
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
