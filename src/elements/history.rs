use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use super::BenchmarkId;
use crate::error::LoadError;

/// One benchmark run: a result file's execution date and revision plus the revision's commit date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Execution {
    pub exec_date: String,
    pub commit_date: Option<String>,
    pub revision: String,
}

impl Execution {
    pub fn tick_label(&self) -> String {
        match &self.commit_date {
            Some(commit_date) => format!("{},{},{}", self.exec_date, commit_date, self.revision),
            None => format!("{},{}", self.exec_date, self.revision),
        }
    }

    /// Chart axis label: the tick label with the revision moved onto its own line.
    pub fn axis_label(&self) -> String {
        match &self.commit_date {
            Some(commit_date) => format!("{},{},\n{}", self.exec_date, commit_date, self.revision),
            None => format!("{},\n{}", self.exec_date, self.revision),
        }
    }
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tick_label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub score: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Identifies one history chart; rows sharing a key are plotted together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub test: String,
    pub params: BTreeMap<String, String>,
    pub unit: String,
    pub mode: String,
}

impl GroupKey {
    /// `test`, or `test (k1=v1;k2=v2)` when the benchmark is parameterized.
    pub fn chart_name(&self) -> String {
        if self.params.is_empty() {
            self.test.clone()
        } else {
            let params = self.params.iter().map(|(k, v)| format!("{}={}", k, v)).join(";");
            format!("{} ({})", self.test, params)
        }
    }
}

/// A benchmark record decorated with where and when it was measured.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub execution: Execution,
    pub id: BenchmarkId,
    pub params: BTreeMap<String, String>,
    pub mode: String,
    pub unit: String,
    pub measurement: Measurement,
}

impl HistoryRow {
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            test: self.id.test.clone(),
            params: self.params.clone(),
            unit: self.unit.clone(),
            mode: self.mode.clone(),
        }
    }
}

/// Rows of one chart pivoted so executions form the x-axis and every algorithm one series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTable {
    key: GroupKey,
    executions: Vec<Execution>,
    series: BTreeMap<String, Vec<Option<Measurement>>>,
}

impl HistoryTable {
    #[tracing::instrument(level = "debug", skip(rows), fields(nr_rows=%rows.len()))]
    pub fn pivot(key: GroupKey, rows: &[HistoryRow]) -> Result<Self, LoadError> {
        let executions: Vec<Execution> = rows.iter().map(|r| r.execution.clone()).sorted().dedup().collect();

        let mut series: BTreeMap<String, Vec<Option<Measurement>>> = BTreeMap::new();
        for row in rows {
            let position = executions.binary_search(&row.execution).unwrap_or_else(|p| p);

            let measurements = series
                .entry(row.id.algorithm.clone())
                .or_insert_with(|| vec![None; executions.len()]);

            if measurements[position].is_some() {
                return Err(LoadError::DuplicateEntry {
                    chart: key.chart_name(),
                    execution: row.execution.tick_label(),
                    algorithm: row.id.algorithm.clone(),
                });
            }
            measurements[position] = Some(row.measurement);
        }

        Ok(Self { key, executions, series })
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn name(&self) -> String {
        self.key.chart_name()
    }

    pub fn executions(&self) -> &[Execution] {
        &self.executions
    }

    pub fn algorithms(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    pub fn series(&self) -> impl Iterator<Item = (&str, &[Option<Measurement>])> + '_ {
        self.series.iter().map(|(a, m)| (a.as_str(), m.as_slice()))
    }

    pub fn measurement(&self, algorithm: &str, execution: usize) -> Option<Measurement> {
        self.series.get(algorithm).and_then(|m| m.get(execution).copied().flatten())
    }
}
