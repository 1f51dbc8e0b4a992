use std::path::PathBuf;

use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] demandlab_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error("cannot load panel from {}: {source}", path.display())]
    Panel {
        path: PathBuf,
        #[source]
        source: demandlab_core::CoreError,
    },

    #[error(transparent)]
    Quiz(#[from] demandlab_quiz::QuizError),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) | Self::Panel { .. } | Self::Quiz(_) => 2,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
