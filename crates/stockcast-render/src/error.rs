use std::error::Error as StdError;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Chart rendering failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("embedded chart font could not be loaded")]
    Font,

    #[error("chart '{chart}' has no points to draw")]
    EmptyChart { chart: &'static str },

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("figure serialization failed: {0}")]
    Figure(#[from] serde_json::Error),
}

impl RenderError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Font => "render.font",
            Self::EmptyChart { .. } => "render.empty_chart",
            Self::Draw(_) => "render.draw",
            Self::Figure(_) => "render.figure",
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: StdError + Send + Sync,
{
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw(error.to_string())
    }
}
