use either::{Either, Left};
use thiserror::Error;

use super::ErrorLabel;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid series configuration: {0}")]
    InvalidSeries(String),

    #[error("invalid chart layout: {0}")]
    InvalidChart(String),
}

impl ErrorLabel for SettingsError {
    fn slug(&self) -> String {
        "settings".into()
    }

    fn next(&self) -> Either<String, Box<&dyn ErrorLabel>> {
        match self {
            Self::Configuration(_) => Left("configuration".into()),
            Self::Io(_) => Left("io".into()),
            Self::InvalidSeries(_) => Left("invalid_series".into()),
            Self::InvalidChart(_) => Left("invalid_chart".into()),
        }
    }
}
