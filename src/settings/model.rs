use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::elements::{SeriesEntry, SeriesIndex};
use crate::error::SettingsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ordered chart series; order determines chart row and legend order.
    pub series: Vec<SeriesEntry>,
    pub chart: ChartSettings,
    pub history: HistoryChartSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            series: SeriesIndex::builtin().entries().to_vec(),
            chart: ChartSettings::default(),
            history: HistoryChartSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.series.is_empty() {
            return Err(SettingsError::InvalidSeries("at least one series must be configured".to_string()));
        }

        let mut names = HashSet::with_capacity(self.series.len());
        for entry in self.series.iter() {
            if !names.insert(entry.display_name.as_str()) {
                return Err(SettingsError::InvalidSeries(format!(
                    "duplicate series display name: {}",
                    entry.display_name
                )));
            }
        }

        if !(0.0 < self.chart.bar_width && self.chart.bar_width <= 1.0) {
            return Err(SettingsError::InvalidChart(format!(
                "bar width must be within (0, 1] but was {}",
                self.chart.bar_width
            )));
        }

        Ok(())
    }

    pub fn series_index(&self) -> Result<SeriesIndex, SettingsError> {
        self.validate()?;
        Ok(SeriesIndex::new(self.series.clone()))
    }
}

/// Layout of snapshot charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    /// Bar thickness as a fraction of one chart row.
    pub bar_width: f64,
    pub font_size: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self { width: 640, height: 360, bar_width: 0.5, font_size: 12 }
    }
}

/// Layout of benchmark history charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryChartSettings {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

impl Default for HistoryChartSettings {
    fn default() -> Self {
        Self { width: 1600, height: 1200, font_size: 16 }
    }
}

#[cfg(test)]
mod tests {
    use claim::assert_ok;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert_ok!(settings.validate());
        let index = assert_ok!(settings.series_index());
        assert_eq!(index.len(), 7);
    }

    #[test]
    fn test_validate_series() {
        let mut settings = Settings::default();
        settings.series.clear();
        assert!(matches!(settings.validate(), Err(SettingsError::InvalidSeries(_))));

        let mut settings = Settings::default();
        let first = settings.series[0].clone();
        settings.series.push(first);
        assert!(matches!(settings.series_index(), Err(SettingsError::InvalidSeries(_))));

        let mut settings = Settings::default();
        settings.chart.bar_width = 0.0;
        assert!(matches!(settings.validate(), Err(SettingsError::InvalidChart(_))));
    }
}
