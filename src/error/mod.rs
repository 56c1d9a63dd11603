use either::{Either, Right};
use thiserror::Error;

mod load_errors;
mod render_errors;
mod settings_errors;

pub use load_errors::LoadError;
pub use render_errors::RenderError;
pub use settings_errors::SettingsError;

/// Hierarchical, `::`-joined label identifying the kind of an error. Used as a structured
/// field when failures are logged.
pub trait ErrorLabel {
    fn label(&self) -> String {
        match self.next() {
            Either::Right(n) => format!("{}::{}", self.slug(), n.label()),
            Either::Left(ls) => format!("{}::{}", self.slug(), ls),
        }
    }

    fn slug(&self) -> String;
    fn next(&self) -> Either<String, Box<&dyn ErrorLabel>>;
}

#[derive(Debug, Error)]
pub enum BenchplotError {
    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Settings(#[from] SettingsError),
}

impl ErrorLabel for BenchplotError {
    fn slug(&self) -> String {
        "benchplot".into()
    }

    fn next(&self) -> Either<String, Box<&dyn ErrorLabel>> {
        match self {
            Self::Load(e) => Right(Box::new(e)),
            Self::Render(e) => Right(Box::new(e)),
            Self::Settings(e) => Right(Box::new(e)),
        }
    }
}
