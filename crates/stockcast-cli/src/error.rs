use stockcast_core::{ExportError, LoadError, PipelineError, ValidationError};
use stockcast_render::RenderError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("chart rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("strict mode failed: warnings={warning_count}")]
    StrictModeViolation { warning_count: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Pipeline(error) => match error {
                PipelineError::Validation(_) | PipelineError::UnsupportedExchange(_) => 2,
                PipelineError::Load(LoadError::NoData { .. }) => 3,
                PipelineError::Load(LoadError::Validation(_)) => 2,
                PipelineError::Load(LoadError::Source(_)) => 6,
                PipelineError::Fit(_) => 4,
            },
            Self::Export(_) => 10,
            Self::Render(_) => 11,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) => 10,
            Self::Io(_) => 10,
        }
    }

    /// Stable machine-readable code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "cli.invalid_arguments",
            Self::Pipeline(error) => error.code(),
            Self::Export(_) => "export.csv",
            Self::Render(error) => error.code(),
            Self::StrictModeViolation { .. } => "cli.strict_mode",
            Self::Serialization(_) => "cli.serialization",
            Self::Io(_) => "export.io",
        }
    }
}
