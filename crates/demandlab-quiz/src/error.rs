use demandlab_core::ValidationError;
use thiserror::Error;

/// Failures raised by quiz operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("unknown question '{id}'")]
    UnknownQuestion { id: String },

    #[error("'{value}' is not an option of question '{question}'")]
    InvalidSelection { question: String, value: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl QuizError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownQuestion { .. } => "quiz.unknown_question",
            Self::InvalidSelection { .. } => "quiz.invalid_selection",
            Self::Validation(_) => "quiz.invalid_input",
        }
    }
}
