//! JSON response envelope shared by every machine-readable `demandlab` output.
//!
//! Failed computations travel inside `errors` next to whatever data could
//! still be produced, so a consumer never has to parse stderr.

use serde::{Deserialize, Serialize};

use crate::{AnalysisError, UtcDateTime, ValidationError};

/// Payload plus metadata and structured failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self::assemble(meta, data, Vec::new())
    }

    /// Checked assembly: metadata and every error must validate.
    pub fn with_errors(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        errors.iter().try_for_each(EnvelopeError::validate)?;
        Ok(Self::assemble(meta, data, errors))
    }

    pub fn push_error(&mut self, error: EnvelopeError) -> Result<(), ValidationError> {
        error.validate()?;
        self.errors.push(error);
        Ok(())
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn assemble(meta: EnvelopeMeta, data: T, errors: Vec<EnvelopeError>) -> Self {
        Self { meta, data, errors }
    }
}

/// Request bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    /// Panel file the answer was computed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        schema_version: impl Into<String>,
        latency_ms: u64,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            schema_version: schema_version.into(),
            generated_at: UtcDateTime::now(),
            dataset: None,
            latency_ms,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn with_dataset(self, dataset: impl Into<String>) -> Self {
        Self {
            dataset: Some(dataset.into()),
            ..self
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().chars().count() < MIN_REQUEST_ID_LEN {
            return Err(ValidationError::InvalidRequestId);
        }

        if semantic_version(&self.schema_version).is_none() {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }

        Ok(())
    }
}

const MIN_REQUEST_ID_LEN: usize = 8;

/// `vMAJOR.MINOR.PATCH` split into its numeric parts.
fn semantic_version(value: &str) -> Option<(u32, u32, u32)> {
    let digits = value.strip_prefix('v')?;
    let parts = digits
        .split('.')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                part.parse::<u32>().ok()
            }
        })
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [major, minor, patch] => Some((*major, *minor, *patch)),
        _ => None,
    }
}

/// Machine code plus human-readable message for one failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
}

impl EnvelopeError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let candidate = Self {
            code: code.into(),
            message: message.into(),
        };
        candidate.validate().map(|()| candidate)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.code.trim().is_empty(), self.message.trim().is_empty()) {
            (true, _) => Err(ValidationError::EmptyErrorCode),
            (false, true) => Err(ValidationError::EmptyErrorMessage),
            (false, false) => Ok(()),
        }
    }
}

impl From<&AnalysisError> for EnvelopeError {
    fn from(error: &AnalysisError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
        }
    }
}
