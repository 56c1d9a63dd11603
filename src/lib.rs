pub mod charts;
pub mod elements;
pub mod error;
pub mod loader;
pub mod render;
pub mod serde;
pub mod settings;
pub mod tracing;

pub use elements::{SeriesEntry, SeriesIndex};
pub use settings::Settings;

pub type BenchplotResult<T> = Result<T, error::BenchplotError>;
