use std::path::PathBuf;

use crate::elements::{HistoryTable, SeriesIndex, SeriesTable};
use crate::error::RenderError;
use crate::loader::SnapshotSource;
use crate::settings::{ChartSettings, HistoryChartSettings};

mod svg;

pub use svg::{draw_bar_chart, draw_line_chart, SvgRenderer};

/// Stroke pattern of a plotted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    DashDotDot,
}

const ALGORITHM_FAMILIES: [(&str, LineStyle); 4] = [
    ("DynaHist", LineStyle::Solid),
    ("DDSketch", LineStyle::Dashed),
    ("NrSketch", LineStyle::DashDotDot),
    ("HdrDoubleHistogram", LineStyle::DashDot),
];

impl LineStyle {
    /// Style of the last algorithm family contained in `algorithm`; solid if none is.
    pub fn for_algorithm(algorithm: &str) -> Self {
        ALGORITHM_FAMILIES
            .iter()
            .filter(|(family, _)| algorithm.contains(family))
            .last()
            .map_or(Self::Solid, |(_, style)| *style)
    }

    /// Alternating on/off stroke lengths in pixels.
    pub fn dash_pattern(&self) -> Option<&'static [f64]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some(&[8.0, 5.0]),
            Self::DashDot => Some(&[10.0, 4.0, 2.0, 4.0]),
            Self::DashDotDot => Some(&[8.0, 3.0, 2.0, 3.0, 2.0, 3.0]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

impl From<&ChartSettings> for Canvas {
    fn from(settings: &ChartSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            font_size: settings.font_size,
        }
    }
}

impl From<&HistoryChartSettings> for Canvas {
    fn from(settings: &HistoryChartSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            font_size: settings.font_size,
        }
    }
}

/// Horizontal bars, one per label, the first label on top.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub value_desc: String,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    Numeric { desc: String, values: Vec<f64> },
    Categories(Vec<String>),
}

impl XAxis {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric { values, .. } => values.len(),
            Self::Categories(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plot coordinate of the `index`-th point.
    pub fn coord(&self, index: usize) -> Option<f64> {
        match self {
            Self::Numeric { values, .. } => values.get(index).copied(),
            Self::Categories(labels) => (index < labels.len()).then(|| index as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    pub y: f64,
    pub bounds: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub name: String,
    pub style: LineStyle,
    /// Aligned with the chart's x-axis; `None` leaves a gap.
    pub points: Vec<Option<LinePoint>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_axis: XAxis,
    pub y_desc: String,
    pub log_y: bool,
    pub series: Vec<PlotSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bar(BarChart),
    Line(LineChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Self::Bar(chart) => &chart.title,
            Self::Line(chart) => &chart.title,
        }
    }
}

/// Turns chart models into image files named after `stem`.
pub trait ChartRenderer {
    fn render_bar_chart(&mut self, stem: &str, chart: &BarChart) -> Result<PathBuf, RenderError>;
    fn render_line_chart(&mut self, stem: &str, chart: &LineChart) -> Result<PathBuf, RenderError>;

    fn render(&mut self, stem: &str, chart: &Chart) -> Result<PathBuf, RenderError> {
        match chart {
            Chart::Bar(chart) => self.render_bar_chart(stem, chart),
            Chart::Line(chart) => self.render_line_chart(stem, chart),
        }
    }
}

/// Bar chart of a snapshot table, or a line chart over the file's axis when it declares one.
pub fn snapshot_chart(source: &SnapshotSource, index: &SeriesIndex, table: &SeriesTable) -> Chart {
    match table.axis() {
        None => Chart::Bar(BarChart {
            title: source.title.clone(),
            value_desc: source.value_desc.clone(),
            labels: index.display_names().into_iter().map(String::from).collect(),
            values: table.scalars(),
        }),

        Some(axis) => {
            let series = index
                .entries()
                .iter()
                .zip(table.iter())
                .filter_map(|(entry, values)| {
                    values.map(|values| PlotSeries {
                        name: entry.display_name.clone(),
                        style: LineStyle::for_algorithm(&entry.result_key),
                        points: values.iter().map(|y| Some(LinePoint { y: *y, bounds: None })).collect(),
                    })
                })
                .collect();

            Chart::Line(LineChart {
                title: source.title.clone(),
                x_axis: XAxis::Numeric { desc: axis.label.clone(), values: axis.values.clone() },
                y_desc: source.value_desc.clone(),
                log_y: false,
                series,
            })
        },
    }
}

/// Log-scaled line chart of one pivoted history group.
pub fn history_chart(table: &HistoryTable, show_confidence_interval: bool) -> LineChart {
    let key = table.key();
    let series = table
        .series()
        .map(|(algorithm, measurements)| PlotSeries {
            name: algorithm.to_string(),
            style: LineStyle::for_algorithm(algorithm),
            points: measurements
                .iter()
                .map(|m| {
                    m.map(|m| LinePoint {
                        y: m.score,
                        bounds: show_confidence_interval.then(|| (m.lower, m.upper)),
                    })
                })
                .collect(),
        })
        .collect();

    LineChart {
        title: table.name(),
        x_axis: XAxis::Categories(table.executions().iter().map(|e| e.axis_label()).collect()),
        y_desc: format!("score ({}) in {}", key.mode, key.unit),
        log_y: true,
        series,
    }
}

/// Formats `value` with three significant digits, keeping trailing zeros and the decimal point
/// (`123.`, `12.3`, `1.23`, `0.0123`) and switching to exponent notation outside
/// `1e-4 <= |value| < 1e3` (`1.23e+03`).
pub fn format_significant(value: f64) -> String {
    const PRECISION: i32 = 3;

    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or_default()),
        None => (scientific.as_str(), 0),
    };

    if (-4..PRECISION).contains(&exponent) {
        let decimals = (PRECISION - 1 - exponent) as usize;
        let fixed = format!("{:.*}", decimals, value);
        if fixed.contains('.') {
            fixed
        } else {
            format!("{}.", fixed)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

/// Chart name made safe for use as a file name.
pub fn file_stem(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// Splits a polyline into the visible pieces of a dash `pattern` of alternating on/off lengths.
/// The pattern continues across vertices so corners do not restart it.
pub fn dash_polyline(points: &[(f64, f64)], pattern: &[f64]) -> Vec<Vec<(f64, f64)>> {
    if points.len() < 2 {
        return Vec::new();
    }
    if pattern.len() < 2 || pattern.len() % 2 != 0 || pattern.iter().any(|p| !(0.0 < *p)) {
        return vec![points.to_vec()];
    }

    let mut dashes = Vec::new();
    let mut slot = 0;
    let mut remaining = pattern[0];
    let mut current = vec![points[0]];

    for segment in points.windows(2) {
        let (from, to) = (segment[0], segment[1]);
        let length = (to.0 - from.0).hypot(to.1 - from.1);
        let mut travelled = 0.0;

        while remaining < length - travelled {
            travelled += remaining;
            let t = travelled / length;
            let at = (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
            if slot % 2 == 0 {
                current.push(at);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![at];
            }
            slot = (slot + 1) % pattern.len();
            remaining = pattern[slot];
        }

        remaining -= length - travelled;
        if slot % 2 == 0 {
            current.push(to);
        }
    }

    if slot % 2 == 0 && 1 < current.len() {
        dashes.push(current);
    }
    dashes
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use approx::assert_relative_eq;
    use claim::*;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::elements::{Axis, BenchmarkId, Execution, GroupKey, HistoryRow, Measurement, SeriesEntry};

    #[test]
    fn test_line_style_for_algorithm() {
        assert_eq!(LineStyle::for_algorithm("DynaHistDynamicLogLinear"), LineStyle::Solid);
        assert_eq!(LineStyle::for_algorithm("DDSketchPaginatedLinear"), LineStyle::Dashed);
        assert_eq!(LineStyle::for_algorithm("NrSketchLinear"), LineStyle::DashDotDot);
        assert_eq!(LineStyle::for_algorithm("HdrDoubleHistogram"), LineStyle::DashDot);
        assert_eq!(LineStyle::for_algorithm("TDigest"), LineStyle::Solid);
        assert_eq!(LineStyle::for_algorithm("DynaHistVsHdrDoubleHistogram"), LineStyle::DashDot);
        assert_none!(LineStyle::Solid.dash_pattern());
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(123.4), "123.");
        assert_eq!(format_significant(12.34), "12.3");
        assert_eq!(format_significant(1.234), "1.23");
        assert_eq!(format_significant(0.01234), "0.0123");
        assert_eq!(format_significant(1234.5), "1.23e+03");
        assert_eq!(format_significant(0.00001234), "1.23e-05");
        assert_eq!(format_significant(9.996), "10.0");
        assert_eq!(format_significant(999.6), "1.00e+03");
        assert_eq!(format_significant(0.0), "0.00");
        assert_eq!(format_significant(-2.5), "-2.50");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("recordValues (unit=ns/op)"), "recordValues (unit=ns_op)");
        assert_eq!(file_stem(r"a\b"), "a_b");
        assert_eq!(file_stem("memory-footprint"), "memory-footprint");
    }

    #[test]
    fn test_dash_polyline() {
        let dashes = dash_polyline(&[(0.0, 0.0), (10.0, 0.0)], &[3.0, 2.0]);
        assert_eq!(dashes, vec![vec![(0.0, 0.0), (3.0, 0.0)], vec![(5.0, 0.0), (8.0, 0.0)]]);

        // pattern carries over the corner at (2, 0)
        let dashes = dash_polyline(&[(0.0, 0.0), (2.0, 0.0), (2.0, 4.0)], &[3.0, 2.0]);
        assert_eq!(dashes.len(), 2);
        assert_eq!(dashes[0].len(), 3);
        assert_eq!(dashes[0][1], (2.0, 0.0));
        assert_relative_eq!(dashes[0][2].1, 1.0);
        assert_eq!(dashes[1], vec![(2.0, 3.0), (2.0, 4.0)]);

        let solid = dash_polyline(&[(0.0, 0.0), (1.0, 1.0)], &[]);
        assert_eq!(solid, vec![vec![(0.0, 0.0), (1.0, 1.0)]]);
        assert!(dash_polyline(&[(0.0, 0.0)], &[3.0, 2.0]).is_empty());
    }

    #[test]
    fn test_snapshot_bar_chart() {
        let index = SeriesIndex::new(vec![SeriesEntry::new("A", "KeyA"), SeriesEntry::new("B", "KeyB")]);
        let source = assert_some!(SnapshotSource::builtin().into_iter().next());
        let mut table = SeriesTable::new(2, None);
        table.insert(1, vec![2.5]);

        match snapshot_chart(&source, &index, &table) {
            Chart::Bar(chart) => {
                assert_eq!(chart.title, "Memory Footprint");
                assert_eq!(chart.value_desc, "size (kB)");
                assert_eq!(chart.labels, vec!["A".to_string(), "B".to_string()]);
                assert_eq!(chart.values, vec![None, Some(2.5)]);
            },
            chart => panic!("expected bar chart but got {:?}", chart),
        }
    }

    #[test]
    fn test_snapshot_axis_chart() {
        let index = SeriesIndex::new(vec![
            SeriesEntry::new("A", "DynaHistStaticLogLinear"),
            SeriesEntry::new("B", "HdrDoubleHistogram"),
        ]);
        let source = assert_some!(SnapshotSource::builtin().into_iter().next());
        let axis = Axis { label: "values".to_string(), values: vec![10.0, 100.0] };
        let mut table = SeriesTable::new(2, Some(axis));
        table.insert(1, vec![1.0, 2.0]);

        match snapshot_chart(&source, &index, &table) {
            Chart::Line(chart) => {
                assert_eq!(chart.x_axis, XAxis::Numeric { desc: "values".to_string(), values: vec![10.0, 100.0] });
                assert!(!chart.log_y);
                assert_eq!(chart.series.len(), 1);
                assert_eq!(chart.series[0].name, "B");
                assert_eq!(chart.series[0].style, LineStyle::DashDot);
                assert_eq!(chart.series[0].points[1], Some(LinePoint { y: 2.0, bounds: None }));
            },
            chart => panic!("expected line chart but got {:?}", chart),
        }
    }

    #[test]
    fn test_history_chart() {
        let row = |revision: &str, algorithm: &str, score: f64| HistoryRow {
            execution: Execution {
                exec_date: "2022-01-01".to_string(),
                commit_date: Some("2021-12-31 12:00:00".to_string()),
                revision: revision.to_string(),
            },
            id: BenchmarkId {
                class_path: "com.dynatrace.dynahist.Comparison".to_string(),
                algorithm: algorithm.to_string(),
                test: "recordValues".to_string(),
            },
            params: BTreeMap::new(),
            mode: "avgt".to_string(),
            unit: "ns/op".to_string(),
            measurement: Measurement { score, lower: score * 0.9, upper: score * 1.1 },
        };
        let rows = vec![row("aaa", "DDSketchSparse", 20.0), row("bbb", "DynaHistStatic", 10.0)];
        let key: GroupKey = rows[0].group_key();
        let table = assert_ok!(HistoryTable::pivot(key, &rows));

        let chart = history_chart(&table, false);
        assert_eq!(chart.title, "recordValues");
        assert_eq!(chart.y_desc, "score (avgt) in ns/op");
        assert!(chart.log_y);
        assert_eq!(
            chart.x_axis,
            XAxis::Categories(vec![
                "2022-01-01,2021-12-31 12:00:00,\naaa".to_string(),
                "2022-01-01,2021-12-31 12:00:00,\nbbb".to_string(),
            ])
        );
        assert_eq!(chart.series[0].name, "DDSketchSparse");
        assert_eq!(chart.series[0].style, LineStyle::Dashed);
        assert_eq!(chart.series[0].points, vec![Some(LinePoint { y: 20.0, bounds: None }), None]);

        let chart = history_chart(&table, true);
        let bounds = assert_some!(assert_some!(chart.series[1].points[1]).bounds);
        assert_relative_eq!(bounds.0, 9.0);
        assert_relative_eq!(bounds.1, 11.0);
    }
}
