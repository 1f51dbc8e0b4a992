//! Ordinary least squares with an explicit intercept, fitted by
//! `linfa-linear`.
//!
//! The typed degeneracy checks run before the solver sees the data, so a
//! constant or lock-step price column surfaces as a [`DegenerateReason`]
//! rather than a solver error.

use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use crate::{validate_non_negative, AnalysisError, DegenerateReason, PricePoint};

/// Relative threshold below which a predictor's spread counts as zero.
const VARIANCE_TOLERANCE: f64 = 1e-12;
/// Squared correlation above `1 - COLLINEAR_TOLERANCE` counts as lock-step.
const COLLINEAR_TOLERANCE: f64 = 1e-10;

/// A fitted linear model `y = intercept + Σ coefficients[j] * x[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionModel {
    intercept: f64,
    coefficients: Array1<f64>,
    n_obs: usize,
    r_squared: f64,
}

impl RegressionModel {
    /// Fit `response` on the columns of `predictors` (one row per observation).
    ///
    /// Every input must be finite and non-negative: prices and quantities are
    /// never negative, and a violation is a caller bug rather than noise.
    pub fn fit(predictors: &Array2<f64>, response: &Array1<f64>) -> Result<Self, AnalysisError> {
        let (n_obs, n_predictors) = predictors.dim();
        if n_obs != response.len() {
            return Err(AnalysisError::PredictorMismatch {
                expected: n_obs,
                actual: response.len(),
            });
        }
        if n_obs < 2 {
            return Err(AnalysisError::degenerate(DegenerateReason::TooFewObservations));
        }

        for value in predictors.iter() {
            validate_non_negative("price", *value)?;
        }
        for value in response.iter() {
            validate_non_negative("quantity", *value)?;
        }

        check_design(predictors)?;

        let dataset = Dataset::new(predictors.clone(), response.clone());
        let fitted = LinearRegression::new().fit(&dataset).map_err(|error| {
            debug!(%error, "least-squares solve failed");
            AnalysisError::degenerate(DegenerateReason::CollinearPrices)
        })?;

        let intercept = fitted.intercept();
        let coefficients = fitted.params().clone();
        let fitted_values: Array1<f64> = fitted.predict(predictors);
        let r_squared = r_squared(response, &fitted_values);

        debug!(
            n_obs,
            n_predictors,
            intercept,
            r_squared,
            coefficients = ?coefficients.to_vec(),
            "fitted OLS model"
        );

        Ok(Self {
            intercept,
            coefficients,
            n_obs,
            r_squared,
        })
    }

    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        self.coefficients.as_slice().unwrap_or_default()
    }

    pub fn coefficient(&self, index: usize) -> Option<f64> {
        self.coefficients.get(index).copied()
    }

    pub fn n_predictors(&self) -> usize {
        self.coefficients.len()
    }

    pub const fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Share of response variance explained; descriptive only.
    pub const fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn predict(&self, input: &[f64]) -> Result<f64, AnalysisError> {
        if input.len() != self.coefficients.len() {
            return Err(AnalysisError::PredictorMismatch {
                expected: self.coefficients.len(),
                actual: input.len(),
            });
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(input)
                .map(|(beta, x)| beta * x)
                .sum::<f64>())
    }

    /// `points` evenly spaced values of one predictor over `[lo, hi]`,
    /// each mapped through the model. `input` builds the full predictor
    /// vector from the swept value.
    pub fn curve<F>(
        &self,
        lo: f64,
        hi: f64,
        points: usize,
        input: F,
    ) -> Result<Vec<PricePoint>, AnalysisError>
    where
        F: Fn(f64) -> Vec<f64>,
    {
        Array1::linspace(lo, hi, points)
            .iter()
            .map(|&x| self.predict(&input(x)).map(|y| PricePoint::new(x, y)))
            .collect()
    }
}

/// Reject a constant predictor column, then any pair of columns that move
/// in lock-step.
fn check_design(predictors: &Array2<f64>) -> Result<(), AnalysisError> {
    let mean = predictors
        .mean_axis(Axis(0))
        .ok_or_else(|| AnalysisError::degenerate(DegenerateReason::TooFewObservations))?;
    let centered = predictors - &mean;
    let gram = centered.t().dot(&centered);

    for (j, column) in predictors.axis_iter(Axis(1)).enumerate() {
        let raw_scale: f64 = column.iter().map(|value| value * value).sum();
        if gram[[j, j]] <= VARIANCE_TOLERANCE * raw_scale.max(f64::MIN_POSITIVE) {
            return Err(AnalysisError::degenerate(DegenerateReason::NoPriceVariation));
        }
    }

    let width = gram.ncols();
    for a in 0..width {
        for b in (a + 1)..width {
            let cross = gram[[a, b]];
            if cross * cross >= (1.0 - COLLINEAR_TOLERANCE) * gram[[a, a]] * gram[[b, b]] {
                return Err(AnalysisError::degenerate(DegenerateReason::CollinearPrices));
            }
        }
    }

    Ok(())
}

/// Share of response variance explained; a flat response counts as fully explained.
fn r_squared(response: &Array1<f64>, fitted: &Array1<f64>) -> f64 {
    let Some(mean) = response.mean() else {
        return 0.0;
    };
    let residual_ss: f64 = (response - fitted).iter().map(|r| r * r).sum();
    let total_ss: f64 = response.iter().map(|y| (y - mean) * (y - mean)).sum();
    if total_ss > 0.0 {
        1.0 - residual_ss / total_ss
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn recovers_exact_line() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![40.0, 30.0, 20.0, 10.0];
        let model = RegressionModel::fit(&x, &y).expect("fit");

        assert_close(model.intercept(), 50.0);
        assert_close(model.coefficients()[0], -10.0);
        assert_close(model.r_squared(), 1.0);
        assert_close(model.predict(&[2.0]).expect("predict"), 30.0);
    }

    #[test]
    fn recovers_two_predictor_plane() {
        let x = array![
            [1.0, 1.0],
            [2.0, 1.0],
            [3.0, 1.0],
            [1.0, 2.0],
            [2.0, 2.0],
            [3.0, 2.0]
        ];
        let y = x.map_axis(Axis(1), |row| 54.0 - 10.0 * row[0] + 3.0 * row[1]);
        let model = RegressionModel::fit(&x, &y).expect("fit");

        assert_close(model.intercept(), 54.0);
        assert_close(model.coefficients()[0], -10.0);
        assert_close(model.coefficients()[1], 3.0);
        assert_eq!(model.n_obs(), 6);
    }

    #[test]
    fn constant_predictor_is_degenerate() {
        let x = array![[2.0], [2.0], [2.0]];
        let y = array![10.0, 11.0, 12.0];
        let err = RegressionModel::fit(&x, &y).expect_err("must fail");
        assert_eq!(
            err,
            AnalysisError::degenerate(DegenerateReason::NoPriceVariation)
        );
    }

    #[test]
    fn lockstep_predictors_are_collinear() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let y = array![10.0, 8.0, 6.0];
        let err = RegressionModel::fit(&x, &y).expect_err("must fail");
        assert_eq!(
            err,
            AnalysisError::degenerate(DegenerateReason::CollinearPrices)
        );
    }

    #[test]
    fn noisy_points_have_partial_fit() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![11.0, 8.0, 8.0, 5.0];
        let model = RegressionModel::fit(&x, &y).expect("fit");

        assert_close(model.intercept(), 12.5);
        assert_close(model.coefficients()[0], -1.8);
        assert_close(model.r_squared(), 16.2 / 18.0);
    }

    #[test]
    fn negative_input_is_rejected() {
        let x = array![[1.0], [-2.0]];
        let y = array![10.0, 8.0];
        let err = RegressionModel::fit(&x, &y).expect_err("must fail");
        assert!(matches!(err, AnalysisError::Validation(_)));
    }

    #[test]
    fn predict_checks_arity() {
        let x = array![[1.0], [2.0]];
        let y = array![10.0, 8.0];
        let model = RegressionModel::fit(&x, &y).expect("fit");
        let err = model.predict(&[1.0, 2.0]).expect_err("must fail");
        assert!(matches!(
            err,
            AnalysisError::PredictorMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn curve_spans_bounds() {
        let x = array![[1.0], [3.0]];
        let y = array![30.0, 10.0];
        let model = RegressionModel::fit(&x, &y).expect("fit");
        let curve = model.curve(1.0, 3.0, 100, |p| vec![p]).expect("curve");

        assert_eq!(curve.len(), 100);
        assert_close(curve[0].x, 1.0);
        assert_close(curve[99].x, 3.0);
        assert_close(curve[99].y, 10.0);
    }
}
