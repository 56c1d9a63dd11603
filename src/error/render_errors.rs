use either::{Either, Left};
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

use super::ErrorLabel;

/// Set of errors occurring while rendering charts
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no values to plot for chart {0}")]
    EmptyValueSet(String),

    /// Error reported by the drawing backend.
    #[error("failed to draw chart: {0}")]
    Drawing(#[source] anyhow::Error),

    #[error("failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(that: DrawingAreaErrorKind<E>) -> Self {
        Self::Drawing(that.into())
    }
}

impl ErrorLabel for RenderError {
    fn slug(&self) -> String {
        "render".into()
    }

    fn next(&self) -> Either<String, Box<&dyn ErrorLabel>> {
        match self {
            Self::EmptyValueSet(_) => Left("empty_value_set".into()),
            Self::Drawing(_) => Left("drawing".into()),
            Self::Io(_) => Left("io".into()),
        }
    }
}
