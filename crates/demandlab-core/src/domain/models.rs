use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{CatalogName, PanelDate, ValidationError};

/// (city, brand, container) selection identifying one product series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PanelKey {
    pub city: CatalogName,
    pub brand: CatalogName,
    pub container: CatalogName,
}

impl PanelKey {
    pub fn new(city: CatalogName, brand: CatalogName, container: CatalogName) -> Self {
        Self {
            city,
            brand,
            container,
        }
    }

    pub fn parse(city: &str, brand: &str, container: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(
            CatalogName::parse("city", city)?,
            CatalogName::parse("brand", brand)?,
            CatalogName::parse("container", container)?,
        ))
    }

    /// Human label used in chart titles: `brand container`.
    pub fn product_label(&self) -> String {
        format!("{} {}", self.brand, self.container)
    }
}

impl Display for PanelKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.city, self.brand, self.container)
    }
}

/// One raw, transaction-level panel record as handed over by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PanelRowRecord")]
pub struct PanelRow {
    pub date: PanelDate,
    pub city: CatalogName,
    pub brand: CatalogName,
    pub container: CatalogName,
    pub price: f64,
    pub quantity: f64,
}

impl PanelRow {
    pub fn new(
        date: PanelDate,
        city: &str,
        brand: &str,
        container: &str,
        price: f64,
        quantity: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        validate_non_negative("quantity", quantity)?;

        Ok(Self {
            date,
            city: CatalogName::parse("city", city)?,
            brand: CatalogName::parse("brand", brand)?,
            container: CatalogName::parse("container", container)?,
            price,
            quantity,
        })
    }

    pub fn key(&self) -> PanelKey {
        PanelKey::new(
            self.city.clone(),
            self.brand.clone(),
            self.container.clone(),
        )
    }
}

#[derive(Deserialize)]
struct PanelRowRecord {
    date: String,
    city: String,
    brand: String,
    container: String,
    price: f64,
    quantity: f64,
}

impl TryFrom<PanelRowRecord> for PanelRow {
    type Error = ValidationError;

    fn try_from(record: PanelRowRecord) -> Result<Self, Self::Error> {
        let date = PanelDate::parse(&record.date)?;
        Self::new(
            date,
            &record.city,
            &record.brand,
            &record.container,
            record.price,
            record.quantity,
        )
    }
}

/// Per-date mean price and mean quantity for one key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: PanelDate,
    pub price: f64,
    pub quantity: f64,
}

impl Observation {
    pub fn new(date: PanelDate, price: f64, quantity: f64) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        validate_non_negative("quantity", quantity)?;
        Ok(Self {
            date,
            price,
            quantity,
        })
    }
}

/// A chart-ready (x, y) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub x: f64,
    pub y: f64,
}

impl PricePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Date-ordered observations for one key. Price and quantity are stored
/// side by side, so the two series are co-indexed and equally long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries {
    pub key: PanelKey,
    pub observations: Vec<Observation>,
}

impl ObservationSeries {
    pub fn new(key: PanelKey, mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|observation| observation.date);
        Self { key, observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn dates(&self) -> Vec<PanelDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.price).collect()
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.quantity).collect()
    }

    pub fn mean_price(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let total: f64 = self.observations.iter().map(|o| o.price).sum();
        Some(total / self.len() as f64)
    }

    /// Observed (min, max) price, `None` for an empty series.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        self.observations.iter().fold(None, |bounds, o| match bounds {
            None => Some((o.price, o.price)),
            Some((lo, hi)) => Some((lo.min(o.price), hi.max(o.price))),
        })
    }

    /// Observed points as (price, quantity).
    pub fn scatter(&self) -> Vec<PricePoint> {
        self.observations
            .iter()
            .map(|o| PricePoint::new(o.price, o.quantity))
            .collect()
    }

    pub fn price_on(&self, date: PanelDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|index| self.observations[index].price)
    }
}

pub fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
