use thiserror::Error;

use crate::PanelKey;

/// Validation and contract errors exposed by `demandlab-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' cannot be empty")]
    EmptyName { field: &'static str },
    #[error("field '{field}' length {len} exceeds max {max}")]
    NameTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("date must be formatted YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("question id '{value}' must be lowercase snake_case")]
    InvalidQuestionId { value: String },
    #[error("question '{question}' must offer at least two options")]
    TooFewOptions { question: String },
    #[error("question '{question}' repeats option value '{value}'")]
    DuplicateOption { question: String, value: String },
    #[error("question '{question}' has correct value '{value}' that is not one of its options")]
    CorrectValueNotOffered { question: String, value: String },
    #[error("question bank cannot be empty")]
    EmptyQuestionBank,
    #[error("question bank repeats question id '{id}'")]
    DuplicateQuestion { id: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Why a fit or an elasticity evaluation has no meaningful answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    TooFewObservations,
    NoPriceVariation,
    CollinearPrices,
    ZeroPredictedQuantity,
    NonFiniteElasticity,
}

impl DegenerateReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TooFewObservations => "at least two observations are required",
            Self::NoPriceVariation => "insufficient variation: prices never change",
            Self::CollinearPrices => "insufficient variation: the two price series move in lockstep",
            Self::ZeroPredictedQuantity => {
                "elasticity undefined: predicted quantity is zero at this price"
            }
            Self::NonFiniteElasticity => "elasticity undefined: result is not a finite number",
        }
    }
}

/// Failures surfaced by the panel store and the elasticity engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("no observations for {key}")]
    NotFound { key: PanelKey },

    #[error("degenerate fit: {}", reason.as_str())]
    DegenerateFit { reason: DegenerateReason },

    #[error("series {left} and {right} share {shared} dates, need at least 2")]
    MisalignedSeries {
        left: PanelKey,
        right: PanelKey,
        shared: usize,
    },

    #[error("predictor count mismatch: model has {expected}, got {actual}")]
    PredictorMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AnalysisError {
    pub const fn degenerate(reason: DegenerateReason) -> Self {
        Self::DegenerateFit { reason }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "panel.not_found",
            Self::DegenerateFit { .. } => "fit.degenerate",
            Self::MisalignedSeries { .. } => "panel.misaligned",
            Self::PredictorMismatch { .. } => "fit.predictor_mismatch",
            Self::Validation(_) => "input.invalid",
        }
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
