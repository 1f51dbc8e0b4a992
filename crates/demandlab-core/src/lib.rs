//! # Demandlab Core
//!
//! Price-responsiveness analysis over grouped (price, quantity) panel data.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Validated names, dates, raw rows, observation series |
//! | [`panel`] | Grouped panel store (per-date means) and date alignment |
//! | [`regression`] | Ordinary least squares with intercept, fitted by linfa |
//! | [`elasticity`] | Own-price and cross-price point elasticities, regimes |
//! | [`slider`] | Padded analysis-price ranges with tick marks |
//! | [`envelope`] | Response envelope with metadata and structured errors |
//! | [`config`] | Analysis tunables and panel path resolution |
//! | [`error`] | Core error types |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use demandlab_core::{AnalysisConfig, CatalogName, ElasticityEngine, GroupedPanelStore};
//!
//! let store = GroupedPanelStore::from_rows(rows)?;
//! let config = AnalysisConfig::default();
//! let engine = ElasticityEngine::new(&store, &config);
//!
//! let brand = CatalogName::parse("brand", "adult-cola")?;
//! let container = CatalogName::parse("container", "plastic")?;
//! let analysis = engine.own_price(&brand, &container, 2.0)?;
//! println!("{} ({})", analysis.result.elasticity_display(), analysis.result.regime);
//! ```
//!
//! ## Error Handling
//!
//! Lookup and fit failures are typed and never defaulted; only the slider
//! resolver substitutes a fallback:
//!
//! ```rust
//! use demandlab_core::{AnalysisError, DegenerateReason};
//!
//! fn describe(error: &AnalysisError) -> &'static str {
//!     match error {
//!         AnalysisError::NotFound { .. } => "pick another product",
//!         AnalysisError::DegenerateFit {
//!             reason: DegenerateReason::NoPriceVariation,
//!         } => "insufficient variation",
//!         _ => "cannot compute elasticity",
//!     }
//! }
//! ```

pub mod config;
pub mod domain;
pub mod elasticity;
pub mod envelope;
pub mod error;
pub mod panel;
pub mod regression;
pub mod slider;

pub use config::{resolve_demandlab_home, resolve_panel_path, AnalysisConfig};
pub use domain::{
    validate_non_negative, CatalogName, Observation, ObservationSeries, PanelDate, PanelKey,
    PanelRow, PricePoint, UtcDateTime,
};
pub use elasticity::{
    cross_elasticity, cross_elasticity_with_band, fit_cross_price, fit_own_price,
    point_elasticity, CrossPriceAnalysis, ElasticityEngine, ElasticityResult, OwnPriceAnalysis,
    Regime, INDEPENDENCE_BAND,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{AnalysisError, CoreError, DegenerateReason, ValidationError};
pub use panel::{align, parse_panel_rows, AlignedPair, GroupedPanelStore};
pub use regression::RegressionModel;
pub use slider::{range_for, range_for_key, range_within, SliderRange, SliderTick};
