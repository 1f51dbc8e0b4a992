//! Behavior-driven tests for the analysis-price slider
//!
//! The slider must always be usable: every input, including unknown
//! selections and degenerate price series, yields an ordered range with
//! five marks inside it.

use demandlab_core::{range_for, range_for_key, AnalysisConfig, SliderRange};
use demandlab_tests::{key, product_rows, row, store};

fn assert_usable(range: &SliderRange) {
    assert!(range.min < range.max, "min {} must be below max {}", range.min, range.max);
    assert_eq!(range.ticks.len(), 5);
    for tick in &range.ticks {
        assert!(
            tick.value >= range.min && tick.value <= range.max,
            "tick {} outside [{}, {}]",
            tick.value,
            range.min,
            range.max
        );
    }
}

// =============================================================================
// Range Shape
// =============================================================================

#[test]
fn any_price_series_yields_an_ordered_range_with_five_marks() {
    // Given: A mix of ordinary, tiny, single-valued and awkward series
    let config = AnalysisConfig::default();
    let cases: [&[f64]; 7] = [
        &[1.0, 2.5, 2.0],
        &[0.01, 0.02],
        &[3.3333],
        &[1.2307, 1.9113, 1.5],
        &[0.0, 0.0, 0.0],
        &[0.0, 4.0],
        &[],
    ];

    for prices in cases {
        // When: The range is resolved
        let range = range_for(prices, &config);

        // Then: It is always usable
        assert_usable(&range);
    }
}

#[test]
fn observed_prices_are_padded_below_and_above() {
    // Given: Observed prices between 1.00 and 2.50
    let range = range_for(&[1.0, 2.5, 2.0], &AnalysisConfig::default());

    // Then: The range runs from 0.8x the minimum to 1.2x the maximum
    assert!((range.min - 0.8).abs() < 1e-12);
    assert!((range.max - 3.0).abs() < 1e-12);
    assert!((range.midpoint - 1.9).abs() < 1e-12);
    assert_eq!(range.ticks[0].label, "$0.80");
    assert_eq!(range.ticks[4].label, "$3.00");
    assert!(!range.fallback);
}

// =============================================================================
// Fallback
// =============================================================================

#[test]
fn when_selection_is_unknown_slider_serves_fallback_range() {
    // Given: A store without the selected product
    let store = store(product_rows("cola", "plastic", &[2.0, 2.5], &[30.0, 25.0]));
    let config = AnalysisConfig::default();

    // When: The range for an unknown selection is requested
    let range = range_for_key(&store, &key("gazoza", "glass"), &config);

    // Then: The fixed fallback is served instead of an error
    assert!(range.fallback);
    assert_eq!((range.min, range.max), (0.5, 5.0));
    assert_usable(&range);
}

#[test]
fn known_selection_uses_its_own_prices() {
    let store = store(product_rows("cola", "plastic", &[2.0, 2.5], &[30.0, 25.0]));

    let range = range_for_key(&store, &key("cola", "plastic"), &AnalysisConfig::default());

    assert!(!range.fallback);
    assert!((range.min - 1.6).abs() < 1e-12);
    assert!((range.max - 3.0).abs() < 1e-12);
}

#[test]
fn same_day_price_spread_widens_the_range() {
    // Given: Two rows on the same day priced 1 and 3, and a later row at 2
    let store = store(vec![
        row(0, "gazoza", "glass", 1.0, 12.0),
        row(0, "gazoza", "glass", 3.0, 8.0),
        row(1, "gazoza", "glass", 2.0, 10.0),
    ]);

    // When: The slider range is resolved for the product
    let range = range_for_key(&store, &key("gazoza", "glass"), &AnalysisConfig::default());

    // Then: Padding applies to the raw extremes, not to the daily means
    assert!(!range.fallback);
    assert!((range.min - 0.8).abs() < 1e-12, "min {}", range.min);
    assert!((range.max - 3.6).abs() < 1e-12, "max {}", range.max);
    assert_usable(&range);
}
