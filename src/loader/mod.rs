mod commit_date;
mod history;
mod snapshot;

pub use commit_date::{format_commit_time, CommitDates, GitCommitDates, NoCommitDates, COMMIT_DATE_FORMAT};
pub use history::{group_rows, history_tables, list_result_files, HistoryLoader, ResultFileName};
pub use snapshot::{load_snapshot, read_rows, tabulate, Delimiter, Header, SnapshotSource, ValueColumns};
