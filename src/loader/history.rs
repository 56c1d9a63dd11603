use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::CommitDates;
use crate::elements::{BenchmarkId, BenchmarkRecord, Execution, GroupKey, HistoryRow, HistoryTable, Measurement};
use crate::error::LoadError;

static RESULT_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<exec_date>.+) (?P<revision>[^ ]+)\.json$").expect("failed to create result file name regex")
});

/// Execution date and revision encoded in a result file name, `"<date> <revision>.json"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFileName {
    pub exec_date: String,
    pub revision: String,
}

impl FromStr for ResultFileName {
    type Err = LoadError;

    fn from_str(file_name: &str) -> Result<Self, Self::Err> {
        RESULT_FILE_NAME
            .captures(file_name)
            .map(|cap| Self {
                exec_date: cap["exec_date"].to_string(),
                revision: cap["revision"].to_string(),
            })
            .ok_or_else(|| LoadError::InvalidFileName(file_name.to_string()))
    }
}

/// Non-empty `.json` files directly inside `dir`, in file name order.
pub fn list_result_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| name.ends_with(".json"));
        if !is_json {
            continue;
        }

        let metadata = std::fs::metadata(&path)?;
        if metadata.is_file() && 0 < metadata.len() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Reads JMH result files and decorates their records with execution details.
pub struct HistoryLoader {
    commit_dates: Box<dyn CommitDates>,
    resolved: HashMap<String, Option<String>>,
}

impl std::fmt::Debug for HistoryLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryLoader")
            .field("resolved", &self.resolved)
            .finish()
    }
}

impl HistoryLoader {
    pub fn new(commit_dates: Box<dyn CommitDates>) -> Self {
        Self { commit_dates, resolved: HashMap::new() }
    }

    #[tracing::instrument(level = "info", skip(self))]
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<HistoryRow>, LoadError> {
        let files = list_result_files(dir)?;
        tracing::info!(nr_files=%files.len(), "loading benchmark history");

        let mut rows = Vec::new();
        for path in files {
            rows.extend(self.load_file(&path)?);
        }
        Ok(rows)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn load_file(&mut self, path: &Path) -> Result<Vec<HistoryRow>, LoadError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let ResultFileName { exec_date, revision } = file_name.parse()?;
        let commit_date = self.commit_date(&revision)?;

        let records: Vec<BenchmarkRecord> = {
            let reader = BufReader::new(File::open(path)?);
            serde_json::from_reader(reader).map_err(|source| LoadError::Json { file: path.to_path_buf(), source })?
        };

        records
            .into_iter()
            .map(|record| {
                let id = BenchmarkId::from_str(&record.benchmark)?;
                let [lower, upper] = record.primary_metric.score_confidence;
                Ok(HistoryRow {
                    execution: Execution {
                        exec_date: exec_date.clone(),
                        commit_date: commit_date.clone(),
                        revision: revision.clone(),
                    },
                    id,
                    params: record.params,
                    mode: record.mode,
                    unit: record.primary_metric.score_unit,
                    measurement: Measurement { score: record.primary_metric.score, lower, upper },
                })
            })
            .collect()
    }

    fn commit_date(&mut self, revision: &str) -> Result<Option<String>, LoadError> {
        if let Some(resolved) = self.resolved.get(revision) {
            return Ok(resolved.clone());
        }

        let commit_date = self
            .commit_dates
            .commit_date(revision)
            .map_err(|source| LoadError::CommitDate { revision: revision.to_string(), source })?;
        self.resolved.insert(revision.to_string(), commit_date.clone());
        Ok(commit_date)
    }
}

/// Groups rows by (test, params, unit, mode) in key order.
pub fn group_rows(rows: Vec<HistoryRow>) -> BTreeMap<GroupKey, Vec<HistoryRow>> {
    let mut groups: BTreeMap<GroupKey, Vec<HistoryRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.group_key()).or_default().push(row);
    }
    groups
}

/// One pivoted table per chart.
pub fn history_tables(rows: Vec<HistoryRow>) -> Result<Vec<HistoryTable>, LoadError> {
    group_rows(rows)
        .into_iter()
        .map(|(key, rows)| HistoryTable::pivot(key, &rows))
        .collect()
}
