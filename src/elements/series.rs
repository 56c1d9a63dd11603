use serde::{Deserialize, Serialize};

/// Benchmark-name prefix JMH reports in front of every recording-speed result key.
pub const RECORDING_SPEED_PREFIX: &str = "RecordingSpeedBenchmark.record";

const BUILTIN_SERIES: [(&str, &str); 7] = [
    ("DynaHist (static, log-linear)", "DynaHistStaticLogLinear"),
    ("DynaHist (dynamic, log-linear)", "DynaHistDynamicLogLinear"),
    ("DynaHist (static, log-quadratic)", "DynaHistStaticLogQuadratic"),
    ("DynaHist (dynamic, log-quadratic)", "DynaHistDynamicLogQuadratic"),
    ("DynaHist (static, log-optimal)", "DynaHistStaticLogOptimal"),
    ("DynaHist (dynamic, log-optimal)", "DynaHistDynamicLogOptimal"),
    ("HdrHistogram.DoubleHistogram", "HdrDoubleHistogram"),
];

/// One chart series: the name shown in charts and the key benchmark results refer to it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub display_name: String,
    pub result_key: String,
}

impl SeriesEntry {
    pub fn new(display_name: impl Into<String>, result_key: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            result_key: result_key.into(),
        }
    }
}

/// How a raw result label is compared against a series entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    /// Label equals the entry's display name; space-consumption results are written that way.
    DisplayName,

    /// Label equals the prefix immediately followed by the entry's result key.
    Prefixed(String),
}

impl MatchRule {
    pub fn recording_speed() -> Self {
        Self::Prefixed(RECORDING_SPEED_PREFIX.to_string())
    }

    pub fn matches(&self, label: &str, entry: &SeriesEntry) -> bool {
        match self {
            Self::DisplayName => label == entry.display_name,
            Self::Prefixed(prefix) => label
                .strip_prefix(prefix.as_str())
                .map_or(false, |key| key == entry.result_key),
        }
    }
}

/// Immutable, ordered list of chart series. Its order is the only sort key for snapshot charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesIndex {
    entries: Vec<SeriesEntry>,
}

impl SeriesIndex {
    pub fn new(entries: Vec<SeriesEntry>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_SERIES
                .iter()
                .map(|(display_name, result_key)| SeriesEntry::new(*display_name, *result_key))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn display_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.display_name.as_str()).collect()
    }

    /// Index of the first entry matching `label` under `rule`; `None` when the label refers to
    /// no configured series.
    pub fn position(&self, label: &str, rule: &MatchRule) -> Option<usize> {
        self.entries.iter().position(|entry| rule.matches(label, entry))
    }
}
