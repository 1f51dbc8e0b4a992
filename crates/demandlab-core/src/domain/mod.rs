//! # Domain Models
//!
//! Canonical domain types for demandlab panel data.
//!
//! All models enforce their invariants at construction time, so a value
//! that exists is a value the engine can consume:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CatalogName`] | Trimmed, non-empty city/brand/container name |
//! | [`PanelKey`] | (city, brand, container) selection |
//! | [`PanelDate`] | Calendar date of an observation |
//! | [`PanelRow`] | One raw transaction-level record |
//! | [`Observation`] | One per-date mean (price, quantity) point |
//! | [`ObservationSeries`] | Date-ordered observations for one key |
//! | [`UtcDateTime`] | UTC timestamp used in envelopes |
//!
//! ```rust,ignore
//! use demandlab_core::{PanelDate, PanelRow, ValidationError};
//!
//! let date = PanelDate::parse("2019-01-31")?;
//! let row = PanelRow::new(date, "Athens", "gazoza", "can", 1.25, 40.0)?;
//!
//! // Negative prices are rejected before they can reach a fit.
//! let invalid = PanelRow::new(date, "Athens", "gazoza", "can", -1.0, 40.0);
//! assert!(matches!(invalid, Err(ValidationError::NegativeValue { .. })));
//! ```

mod date;
mod models;
mod name;
mod timestamp;

pub use date::PanelDate;
pub use models::{
    validate_non_negative, Observation, ObservationSeries, PanelKey, PanelRow, PricePoint,
};
pub use name::CatalogName;
pub use timestamp::UtcDateTime;
