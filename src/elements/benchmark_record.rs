use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::LoadError;

/// One entry of a JMH JSON result file. Fields JMH writes beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRecord {
    pub benchmark: String,
    pub mode: String,
    #[serde(default, deserialize_with = "crate::serde::deserialize_null_default")]
    pub params: BTreeMap<String, String>,
    pub primary_metric: PrimaryMetric,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryMetric {
    #[serde(deserialize_with = "crate::serde::deserialize_lenient_f64")]
    pub score: f64,
    #[serde(deserialize_with = "crate::serde::deserialize_lenient_f64_pair")]
    pub score_confidence: [f64; 2],
    pub score_unit: String,
}

/// Dotted JMH benchmark id, e.g. `com.dynatrace.dynahist.Comparison.DynaHistDynamic.recordValues`,
/// split from the right.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BenchmarkId {
    pub class_path: String,
    pub algorithm: String,
    pub test: String,
}

impl FromStr for BenchmarkId {
    type Err = LoadError;

    fn from_str(rep: &str) -> Result<Self, Self::Err> {
        let mut parts = rep.rsplitn(3, '.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(test), Some(algorithm), Some(class_path))
                if !test.is_empty() && !algorithm.is_empty() && !class_path.is_empty() =>
            {
                Ok(Self {
                    class_path: class_path.to_string(),
                    algorithm: algorithm.to_string(),
                    test: test.to_string(),
                })
            }
            _ => Err(LoadError::MalformedBenchmarkId(rep.to_string())),
        }
    }
}

impl fmt::Display for BenchmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.class_path, self.algorithm, self.test)
    }
}
