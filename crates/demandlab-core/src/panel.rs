//! Grouped panel store.
//!
//! Raw rows are collapsed to one point per `(city, brand, container, date)`
//! by averaging price and quantity. Dates with no rows stay absent; nothing
//! is interpolated or zero-filled. The raw price extremes of every
//! selection are kept alongside the means. The store is immutable once
//! built and is meant to be shared read-only between sessions.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{
    AnalysisError, CatalogName, CoreError, Observation, ObservationSeries, PanelDate, PanelKey,
    PanelRow,
};

/// Read-only mean price/quantity series keyed by [`PanelKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedPanelStore {
    series: BTreeMap<PanelKey, ObservationSeries>,
    raw_price_bounds: BTreeMap<PanelKey, (f64, f64)>,
    row_count: usize,
}

#[derive(Default)]
struct Accumulator {
    price_sum: f64,
    quantity_sum: f64,
    count: usize,
}

impl GroupedPanelStore {
    /// Aggregate raw rows into per-date means.
    pub fn from_rows<I>(rows: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = PanelRow>,
    {
        let mut groups: BTreeMap<PanelKey, BTreeMap<PanelDate, Accumulator>> = BTreeMap::new();
        let mut raw_price_bounds: BTreeMap<PanelKey, (f64, f64)> = BTreeMap::new();
        let mut row_count = 0;

        for row in rows {
            row_count += 1;
            raw_price_bounds
                .entry(row.key())
                .and_modify(|(lo, hi)| {
                    *lo = lo.min(row.price);
                    *hi = hi.max(row.price);
                })
                .or_insert((row.price, row.price));
            let slot = groups
                .entry(row.key())
                .or_default()
                .entry(row.date)
                .or_default();
            slot.price_sum += row.price;
            slot.quantity_sum += row.quantity;
            slot.count += 1;
        }

        let mut series = BTreeMap::new();
        for (key, by_date) in groups {
            let observations = by_date
                .into_iter()
                .map(|(date, acc)| {
                    let n = acc.count as f64;
                    Observation::new(date, acc.price_sum / n, acc.quantity_sum / n)
                })
                .collect::<Result<Vec<_>, _>>()?;
            series.insert(key.clone(), ObservationSeries::new(key, observations));
        }

        debug!(
            rows = row_count,
            groups = series.len(),
            "grouped panel rows into mean series"
        );

        Ok(Self {
            series,
            raw_price_bounds,
            row_count,
        })
    }

    /// Build from a JSON array of raw rows.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let rows = parse_panel_rows(json)?;
        Ok(Self::from_rows(rows)?)
    }

    /// Series for one selection; `NotFound` when the combination was never observed.
    pub fn series_for(
        &self,
        city: &CatalogName,
        brand: &CatalogName,
        container: &CatalogName,
    ) -> Result<&ObservationSeries, AnalysisError> {
        let key = PanelKey::new(city.clone(), brand.clone(), container.clone());
        self.series_by_key(&key)
    }

    pub fn series_by_key(&self, key: &PanelKey) -> Result<&ObservationSeries, AnalysisError> {
        self.series
            .get(key)
            .ok_or_else(|| AnalysisError::NotFound { key: key.clone() })
    }

    /// Lowest and highest price over the selection's raw rows, before any
    /// per-date averaging.
    pub fn raw_price_bounds(&self, key: &PanelKey) -> Result<(f64, f64), AnalysisError> {
        self.raw_price_bounds
            .get(key)
            .copied()
            .ok_or_else(|| AnalysisError::NotFound { key: key.clone() })
    }

    pub fn catalog(&self) -> Vec<&PanelKey> {
        self.series.keys().collect()
    }

    pub fn cities(&self) -> Vec<&CatalogName> {
        self.distinct(|key| &key.city)
    }

    pub fn brands(&self) -> Vec<&CatalogName> {
        self.distinct(|key| &key.brand)
    }

    pub fn containers(&self) -> Vec<&CatalogName> {
        self.distinct(|key| &key.container)
    }

    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn group_count(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn distinct<'a, F>(&'a self, field: F) -> Vec<&'a CatalogName>
    where
        F: Fn(&'a PanelKey) -> &'a CatalogName,
    {
        self.series
            .keys()
            .map(field)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Decode a JSON array of `{date, city, brand, container, price, quantity}`
/// objects. Every row is validated while decoding.
pub fn parse_panel_rows(json: &str) -> Result<Vec<PanelRow>, CoreError> {
    Ok(serde_json::from_str(json)?)
}

/// Two series joined on the dates they share.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub dates: Vec<PanelDate>,
    pub price_a: Vec<f64>,
    pub quantity_a: Vec<f64>,
    pub price_b: Vec<f64>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Inner-join `a` and `b` on date. Dates missing from either side are dropped.
pub fn align(a: &ObservationSeries, b: &ObservationSeries) -> Result<AlignedPair, AnalysisError> {
    let mut pair = AlignedPair {
        dates: Vec::new(),
        price_a: Vec::new(),
        quantity_a: Vec::new(),
        price_b: Vec::new(),
    };

    for observation in &a.observations {
        if let Some(price_b) = b.price_on(observation.date) {
            pair.dates.push(observation.date);
            pair.price_a.push(observation.price);
            pair.quantity_a.push(observation.quantity);
            pair.price_b.push(price_b);
        }
    }

    if pair.len() < 2 {
        return Err(AnalysisError::MisalignedSeries {
            left: a.key.clone(),
            right: b.key.clone(),
            shared: pair.len(),
        });
    }

    Ok(pair)
}
