//! Behavior-driven tests for the grouped panel store
//!
//! These tests verify what a caller can look up once raw panel rows have
//! been grouped: per-date mean series, catalog listings and lookup failures.

use demandlab_core::{align, AnalysisError, GroupedPanelStore, PanelRow};
use demandlab_tests::{key, month, name, product_rows, row, store, CITY};

// =============================================================================
// Series Lookup
// =============================================================================

#[test]
fn every_known_selection_returns_equal_length_date_ordered_series() {
    // Given: Rows for three products, deliberately inserted out of date order
    let mut rows = vec![
        row(5, "gazoza", "glass", 1.4, 20.0),
        row(1, "gazoza", "glass", 1.1, 25.0),
        row(3, "gazoza", "glass", 1.2, 22.0),
    ];
    rows.extend(product_rows("cola", "plastic", &[2.0, 2.2, 2.1], &[30.0, 28.0, 29.0]));
    rows.push(row(0, "orange", "can", 0.9, 14.0));
    let store = store(rows);

    // When: The user looks up every selection in the catalog
    for key in store.catalog() {
        let series = store.series_by_key(key).expect("catalog keys resolve");

        // Then: Prices and quantities are co-indexed and dates ascend
        assert_eq!(series.prices().len(), series.quantities().len());
        assert_eq!(series.dates().len(), series.len());
        assert!(
            series.dates().windows(2).all(|pair| pair[0] < pair[1]),
            "dates for {key} must be strictly ascending"
        );
    }
}

#[test]
fn same_day_transactions_collapse_to_their_mean() {
    // Given: Three transactions for one product on the same day
    let store = store(vec![
        row(0, "gazoza", "glass", 1.0, 10.0),
        row(0, "gazoza", "glass", 2.0, 20.0),
        row(0, "gazoza", "glass", 3.0, 60.0),
    ]);

    // When: The series is looked up
    let series = store
        .series_for(&name("city", CITY), &name("brand", "gazoza"), &name("container", "glass"))
        .expect("series exists");

    // Then: One observation carries the mean price and mean quantity
    assert_eq!(series.len(), 1);
    assert!((series.prices()[0] - 2.0).abs() < 1e-12);
    assert!((series.quantities()[0] - 30.0).abs() < 1e-12);
    assert_eq!(store.row_count(), 3);
}

#[test]
fn when_selection_was_never_observed_user_receives_not_found() {
    // Given: A store without any "kinder-cola" products
    let store = store(product_rows("cola", "plastic", &[2.0, 2.5], &[30.0, 25.0]));

    // When: The user selects a combination outside the catalog
    let error = store
        .series_by_key(&key("kinder-cola", "glass"))
        .expect_err("unknown selection must fail");

    // Then: A typed lookup error names the selection
    assert!(matches!(error, AnalysisError::NotFound { .. }));
    assert_eq!(error.code(), "panel.not_found");
    assert!(error.to_string().contains("kinder-cola"));
}

// =============================================================================
// Catalog Listings
// =============================================================================

#[test]
fn catalog_lists_distinct_sorted_dropdown_options() {
    // Given: Two brands sharing a container and one brand in two containers
    let mut rows = product_rows("cola", "plastic", &[2.0], &[30.0]);
    rows.extend(product_rows("cola", "glass", &[2.4], &[18.0]));
    rows.extend(product_rows("gazoza", "glass", &[1.1], &[25.0]));
    let store = store(rows);

    // Then: Each listing holds unique names in a stable order
    let brands = store.brands().into_iter().map(|n| n.as_str()).collect::<Vec<_>>();
    let containers = store
        .containers()
        .into_iter()
        .map(|n| n.as_str())
        .collect::<Vec<_>>();
    assert_eq!(brands, ["cola", "gazoza"]);
    assert_eq!(containers, ["glass", "plastic"]);
    assert_eq!(store.group_count(), 3);
}

#[test]
fn empty_panel_builds_an_empty_store() {
    let store = GroupedPanelStore::from_rows(Vec::<PanelRow>::new()).expect("empty is fine");
    assert!(store.is_empty());
    assert!(store.catalog().is_empty());
}

// =============================================================================
// Cross-Price Alignment
// =============================================================================

#[test]
fn alignment_keeps_only_shared_dates_without_filling_gaps() {
    // Given: Product A observed in months 0..4, product B only in months 1 and 3
    let mut rows = product_rows("cola", "plastic", &[2.0, 2.1, 2.2, 2.3], &[30.0, 29.0, 28.0, 27.0]);
    rows.push(row(1, "gazoza", "glass", 1.0, 20.0));
    rows.push(row(3, "gazoza", "glass", 1.5, 18.0));
    let store = store(rows);

    let a = store.series_by_key(&key("cola", "plastic")).expect("a");
    let b = store.series_by_key(&key("gazoza", "glass")).expect("b");

    // When: The two series are aligned
    let pair = align(a, b).expect("two shared dates");

    // Then: Only the shared months remain, each with both prices
    assert_eq!(pair.dates, vec![month(1), month(3)]);
    assert_eq!(pair.price_a, vec![2.1, 2.3]);
    assert_eq!(pair.price_b, vec![1.0, 1.5]);
    assert_eq!(pair.quantity_a, vec![29.0, 27.0]);
}

#[test]
fn when_series_share_fewer_than_two_dates_alignment_fails() {
    let mut rows = product_rows("cola", "plastic", &[2.0, 2.1], &[30.0, 29.0]);
    rows.push(row(1, "gazoza", "glass", 1.0, 20.0));
    let store = store(rows);

    let a = store.series_by_key(&key("cola", "plastic")).expect("a");
    let b = store.series_by_key(&key("gazoza", "glass")).expect("b");

    let error = align(a, b).expect_err("one shared date is not enough");
    assert!(matches!(error, AnalysisError::MisalignedSeries { shared: 1, .. }));
}
