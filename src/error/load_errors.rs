use std::path::PathBuf;

use either::{Either, Left};
use thiserror::Error;

use super::ErrorLabel;

/// Set of errors occurring while loading benchmark result files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read benchmark results: {0}")]
    Io(#[from] std::io::Error),

    /// An error related to reading a delimited snapshot file.
    #[error("Could not properly load delimited results: {0}")]
    Csv(#[from] csv::Error),

    /// Benchmark history file does not follow the JMH result schema.
    #[error("failed to parse benchmark results in {file:?}: {source}")]
    Json {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse value {field:?} in {file:?} line {line}: {source}")]
    ParseFloat {
        file: PathBuf,
        line: u64,
        field: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("{0:?} does not end with a newline; the last record may be truncated")]
    MissingTrailingNewline(PathBuf),

    #[error("malformed record in {file:?} line {line}: {reason}")]
    MalformedLine { file: PathBuf, line: u64, reason: String },

    #[error("series {label:?} in {file:?} has {actual} values but the axis has {expected}")]
    AxisMismatch {
        file: PathBuf,
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("benchmark result file name {0:?} does not follow \"<date> <revision>.json\"")]
    InvalidFileName(String),

    #[error("benchmark id {0:?} does not split into class path, algorithm and test")]
    MalformedBenchmarkId(String),

    #[error("duplicate {algorithm} result for {execution} in chart {chart}")]
    DuplicateEntry {
        chart: String,
        execution: String,
        algorithm: String,
    },

    #[error("failed to resolve commit date for revision {revision}: {source}")]
    CommitDate {
        revision: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ErrorLabel for LoadError {
    fn slug(&self) -> String {
        "load".into()
    }

    fn next(&self) -> Either<String, Box<&dyn ErrorLabel>> {
        match self {
            Self::Io(_) => Left("io".into()),
            Self::Csv(_) => Left("csv".into()),
            Self::Json { .. } => Left("json".into()),
            Self::ParseFloat { .. } => Left("parse_float".into()),
            Self::MissingTrailingNewline(_) => Left("missing_trailing_newline".into()),
            Self::MalformedLine { .. } => Left("malformed_line".into()),
            Self::AxisMismatch { .. } => Left("axis_mismatch".into()),
            Self::InvalidFileName(_) => Left("invalid_file_name".into()),
            Self::MalformedBenchmarkId(_) => Left("malformed_benchmark_id".into()),
            Self::DuplicateEntry { .. } => Left("duplicate_entry".into()),
            Self::CommitDate { .. } => Left("commit_date".into()),
        }
    }
}
