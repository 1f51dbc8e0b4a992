//! Elasticity engine.
//!
//! Own-price: quantity regressed on the product's own price, evaluated at a
//! user-chosen analysis price. Cross-price: quantity of A regressed jointly
//! on A's price and B's price, evaluated at A's mean observed price and a
//! user-chosen price for B.
//!
//! Models are fitted fresh for every request and never cached.

use std::fmt::{Display, Formatter};

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::panel::align;
use crate::{
    validate_non_negative, AnalysisConfig, AnalysisError, CatalogName, DegenerateReason,
    GroupedPanelStore, ObservationSeries, PanelKey, PricePoint, RegressionModel,
};

/// Default half-width of the cross-price independence band.
pub const INDEPENDENCE_BAND: f64 = 0.1;

/// Economic regime a computed elasticity falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Elastic,
    Inelastic,
    Substitute,
    Complement,
    Independent,
    Degenerate,
}

impl Regime {
    /// Own-price regime. Only `e < -1` and `-1 < e < 0` are named; exactly
    /// `-1` and every non-negative value land in [`Regime::Degenerate`].
    pub fn classify_own(elasticity: f64) -> Self {
        if elasticity < -1.0 {
            Self::Elastic
        } else if elasticity > -1.0 && elasticity < 0.0 {
            Self::Inelastic
        } else {
            Self::Degenerate
        }
    }

    /// Cross-price regime; `[-band, band]` is the no-effect dead zone.
    pub fn classify_cross(elasticity: f64, band: f64) -> Self {
        if elasticity > band {
            Self::Substitute
        } else if elasticity < -band {
            Self::Complement
        } else {
            Self::Independent
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Elastic => "elastic",
            Self::Inelastic => "inelastic",
            Self::Substitute => "substitute",
            Self::Complement => "complement",
            Self::Independent => "independent",
            Self::Degenerate => "degenerate",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Elastic => "ELASTIC",
            Self::Inelastic => "INELASTIC",
            Self::Substitute => "SUBSTITUTES",
            Self::Complement => "COMPLEMENTS",
            Self::Independent => "INDEPENDENT",
            Self::Degenerate => "UNUSUAL",
        }
    }

    pub const fn interpretation(self) -> &'static str {
        match self {
            Self::Elastic => "Demand is ELASTIC (responsive to price changes)",
            Self::Inelastic => "Demand is INELASTIC (less responsive to price changes)",
            Self::Substitute => {
                "Products are SUBSTITUTES (price increase of one increases demand for other)"
            }
            Self::Complement => {
                "Products are COMPLEMENTS (price increase of one decreases demand for other)"
            }
            Self::Independent => "Products are relatively INDEPENDENT (minimal cross-price effect)",
            Self::Degenerate => "Unusual elasticity value - check data",
        }
    }
}

impl Display for Regime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Point elasticity evaluated at one analysis price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticityResult {
    pub coefficient_of_interest: f64,
    pub analysis_price: f64,
    pub predicted_quantity: f64,
    pub elasticity: f64,
    pub regime: Regime,
}

impl ElasticityResult {
    pub fn elasticity_display(&self) -> String {
        format!("{:.3}", self.elasticity)
    }

    pub fn predicted_quantity_display(&self) -> String {
        format!("{:.0}", self.predicted_quantity)
    }

    pub fn analysis_price_display(&self) -> String {
        format!("${:.2}", self.analysis_price)
    }

    pub const fn interpretation(&self) -> &'static str {
        self.regime.interpretation()
    }
}

/// OLS of quantity on own price.
pub fn fit_own_price(series: &ObservationSeries) -> Result<RegressionModel, AnalysisError> {
    if series.len() < 2 {
        return Err(AnalysisError::degenerate(DegenerateReason::TooFewObservations));
    }
    if let Some((lo, hi)) = series.price_bounds() {
        if lo == hi {
            return Err(AnalysisError::degenerate(DegenerateReason::NoPriceVariation));
        }
    }

    let predictors = Array1::from(series.prices()).insert_axis(Axis(1));
    let response = Array1::from(series.quantities());
    RegressionModel::fit(&predictors, &response)
}

/// `slope * price / Q̂` at `analysis_price`.
pub fn point_elasticity(
    model: &RegressionModel,
    analysis_price: f64,
) -> Result<ElasticityResult, AnalysisError> {
    validate_non_negative("analysis_price", analysis_price)?;
    let slope = model
        .coefficient(0)
        .ok_or(AnalysisError::PredictorMismatch {
            expected: 1,
            actual: model.n_predictors(),
        })?;
    let predicted_quantity = model.predict(&[analysis_price])?;
    let elasticity = elasticity_at(slope, analysis_price, predicted_quantity)?;

    Ok(ElasticityResult {
        coefficient_of_interest: slope,
        analysis_price,
        predicted_quantity,
        elasticity,
        regime: Regime::classify_own(elasticity),
    })
}

/// Joint OLS of A's quantity on `[price_a, price_b]` over the dates both
/// series share.
pub fn fit_cross_price(
    a: &ObservationSeries,
    b: &ObservationSeries,
) -> Result<RegressionModel, AnalysisError> {
    let pair = align(a, b)?;
    let predictors = Array2::from_shape_fn((pair.len(), 2), |(row, col)| match col {
        0 => pair.price_a[row],
        _ => pair.price_b[row],
    });
    let response = Array1::from(pair.quantity_a);
    RegressionModel::fit(&predictors, &response)
}

/// `coefficient_b * price_b / Q̂` at `(mean_price_a, analysis_price_b)`,
/// classified with the default independence band.
pub fn cross_elasticity(
    model: &RegressionModel,
    mean_price_a: f64,
    analysis_price_b: f64,
) -> Result<ElasticityResult, AnalysisError> {
    cross_elasticity_with_band(model, mean_price_a, analysis_price_b, INDEPENDENCE_BAND)
}

pub fn cross_elasticity_with_band(
    model: &RegressionModel,
    mean_price_a: f64,
    analysis_price_b: f64,
    band: f64,
) -> Result<ElasticityResult, AnalysisError> {
    validate_non_negative("analysis_price", analysis_price_b)?;
    let coefficient_b = model
        .coefficient(1)
        .ok_or(AnalysisError::PredictorMismatch {
            expected: 2,
            actual: model.n_predictors(),
        })?;
    let predicted_quantity = model.predict(&[mean_price_a, analysis_price_b])?;
    let elasticity = elasticity_at(coefficient_b, analysis_price_b, predicted_quantity)?;

    Ok(ElasticityResult {
        coefficient_of_interest: coefficient_b,
        analysis_price: analysis_price_b,
        predicted_quantity,
        elasticity,
        regime: Regime::classify_cross(elasticity, band),
    })
}

fn elasticity_at(coefficient: f64, price: f64, predicted: f64) -> Result<f64, AnalysisError> {
    if predicted == 0.0 {
        return Err(AnalysisError::degenerate(
            DegenerateReason::ZeroPredictedQuantity,
        ));
    }

    let elasticity = coefficient * price / predicted;
    if !elasticity.is_finite() {
        return Err(AnalysisError::degenerate(
            DegenerateReason::NonFiniteElasticity,
        ));
    }
    Ok(elasticity)
}

/// Everything the view layer needs to show an own-price result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnPriceAnalysis {
    pub key: PanelKey,
    pub result: ElasticityResult,
    pub intercept: f64,
    pub r_squared: f64,
    pub n_obs: usize,
    /// Observed (price, quantity) points.
    pub observations: Vec<PricePoint>,
    /// Fitted (price, quantity) line over the observed price range.
    pub curve: Vec<PricePoint>,
    /// (analysis price, predicted quantity).
    pub analysis_point: PricePoint,
}

/// Everything the view layer needs to show a cross-price result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossPriceAnalysis {
    pub key_a: PanelKey,
    pub key_b: PanelKey,
    pub result: ElasticityResult,
    pub own_coefficient: f64,
    pub mean_price_a: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub n_obs: usize,
    /// Observed (price of B, quantity of A) points on shared dates.
    pub observations: Vec<PricePoint>,
    /// Fitted quantity of A over B's price range, A's price held at its mean.
    pub curve: Vec<PricePoint>,
}

/// Request-scoped facade over a shared, read-only panel store.
#[derive(Debug, Clone, Copy)]
pub struct ElasticityEngine<'a> {
    store: &'a GroupedPanelStore,
    config: &'a AnalysisConfig,
}

impl<'a> ElasticityEngine<'a> {
    pub const fn new(store: &'a GroupedPanelStore, config: &'a AnalysisConfig) -> Self {
        Self { store, config }
    }

    pub fn key(
        &self,
        brand: &CatalogName,
        container: &CatalogName,
    ) -> Result<PanelKey, AnalysisError> {
        let city = CatalogName::parse("city", &self.config.city)?;
        Ok(PanelKey::new(city, brand.clone(), container.clone()))
    }

    pub fn own_price(
        &self,
        brand: &CatalogName,
        container: &CatalogName,
        analysis_price: f64,
    ) -> Result<OwnPriceAnalysis, AnalysisError> {
        let key = self.key(brand, container)?;
        let series = self.store.series_by_key(&key)?;
        let model = fit_own_price(series)?;
        let result = point_elasticity(&model, analysis_price)?;

        let curve = match series.price_bounds() {
            Some((lo, hi)) => model.curve(lo, hi, self.config.curve_points, |p| vec![p])?,
            None => Vec::new(),
        };

        debug!(
            key = %key,
            analysis_price,
            elasticity = result.elasticity,
            regime = result.regime.as_str(),
            "computed own-price elasticity"
        );

        Ok(OwnPriceAnalysis {
            analysis_point: PricePoint::new(analysis_price, result.predicted_quantity),
            intercept: model.intercept(),
            r_squared: model.r_squared(),
            n_obs: model.n_obs(),
            observations: series.scatter(),
            curve,
            result,
            key,
        })
    }

    pub fn cross_price(
        &self,
        product_a: (&CatalogName, &CatalogName),
        product_b: (&CatalogName, &CatalogName),
        analysis_price_b: f64,
    ) -> Result<CrossPriceAnalysis, AnalysisError> {
        let key_a = self.key(product_a.0, product_a.1)?;
        let key_b = self.key(product_b.0, product_b.1)?;
        let series_a = self.store.series_by_key(&key_a)?;
        let series_b = self.store.series_by_key(&key_b)?;

        let pair = align(series_a, series_b)?;
        let model = fit_cross_price(series_a, series_b)?;

        let mean_price_a = pair.price_a.iter().sum::<f64>() / pair.len() as f64;
        let result = cross_elasticity_with_band(
            &model,
            mean_price_a,
            analysis_price_b,
            self.config.independence_band,
        )?;

        let bounds_b = pair.price_b.iter().fold(None, |bounds, &p| match bounds {
            None => Some((p, p)),
            Some((lo, hi)) => Some((f64::min(lo, p), f64::max(hi, p))),
        });
        let curve = match bounds_b {
            Some((lo, hi)) => model.curve(lo, hi, self.config.curve_points, |p| {
                vec![mean_price_a, p]
            })?,
            None => Vec::new(),
        };
        let observations = pair
            .price_b
            .iter()
            .zip(&pair.quantity_a)
            .map(|(&price_b, &quantity_a)| PricePoint::new(price_b, quantity_a))
            .collect();

        debug!(
            key_a = %key_a,
            key_b = %key_b,
            analysis_price_b,
            elasticity = result.elasticity,
            regime = result.regime.as_str(),
            "computed cross-price elasticity"
        );

        Ok(CrossPriceAnalysis {
            own_coefficient: model.coefficient(0).unwrap_or_default(),
            intercept: model.intercept(),
            r_squared: model.r_squared(),
            n_obs: model.n_obs(),
            mean_price_a,
            observations,
            curve,
            result,
            key_a,
            key_b,
        })
    }
}
