mod benchmark_record;
mod history;
mod series;
mod series_table;

pub use benchmark_record::{BenchmarkId, BenchmarkRecord, PrimaryMetric};
pub use history::{Execution, GroupKey, HistoryRow, HistoryTable, Measurement};
pub use series::{MatchRule, SeriesEntry, SeriesIndex, RECORDING_SPEED_PREFIX};
pub use series_table::{Axis, ResultRow, SeriesTable};
