use std::path::Path;
use std::str::FromStr;

use crate::elements::{Axis, MatchRule, ResultRow, SeriesIndex, SeriesTable};
use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Char(u8),
    /// Runs of whitespace, as in JMH's human-readable result table.
    Whitespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    None,
    Skip,
    /// First line is `<axis label>;x1;x2;...` and defines the x-axis shared by every series.
    Axis,
    /// First line is an axis when its label names no series and it carries several values;
    /// otherwise it is a data row.
    Detect,
}

/// Fields following the label that hold a row's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumns {
    Remaining,
    Single(usize),
}

/// Describes one snapshot result file and how it is charted.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSource {
    pub file_name: String,
    pub title: String,
    pub stem: String,
    pub value_desc: String,
    pub delimiter: Delimiter,
    pub header: Header,
    pub values: ValueColumns,
    pub rule: MatchRule,
}

impl SnapshotSource {
    fn space_consumption(file_name: &str, title: &str, stem: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            title: title.to_string(),
            stem: stem.to_string(),
            value_desc: "size (kB)".to_string(),
            delimiter: Delimiter::Char(b';'),
            header: Header::Detect,
            values: ValueColumns::Remaining,
            rule: MatchRule::DisplayName,
        }
    }

    pub fn builtin() -> Vec<Self> {
        vec![
            Self::space_consumption("memory-footprint-jol.txt", "Memory Footprint", "memory-footprint"),
            Self::space_consumption(
                "serialization-size-compressed.txt",
                "Compressed Serialization",
                "serialization-size-compressed",
            ),
            Self::space_consumption("serialization-size-raw.txt", "Raw Serialization", "serialization-size-raw"),
            Self {
                file_name: "recording-speed.txt".to_string(),
                title: "Recording Speed".to_string(),
                stem: "recording-speed".to_string(),
                value_desc: "time per value insertion (ns)".to_string(),
                delimiter: Delimiter::Whitespace,
                header: Header::Skip,
                values: ValueColumns::Single(3),
                rule: MatchRule::recording_speed(),
            },
        ]
    }
}

/// Naive snapshot loader: reads the whole file, then places every matched row into a table
/// parallel to `index`. Rows whose label refers to no configured series are skipped.
#[tracing::instrument(level = "info", skip(source, index), fields(file=%source.file_name))]
pub fn load_snapshot(dir: &Path, source: &SnapshotSource, index: &SeriesIndex) -> Result<SeriesTable, LoadError> {
    let path = dir.join(&source.file_name);
    let content = std::fs::read_to_string(&path)?;
    let (axis, rows) = read_rows(&path, &content, source, index)?;
    tabulate(&path, axis, rows, index, &source.rule)
}

/// Parses snapshot content into its optional axis and result rows. `index` decides whether a
/// `Header::Detect` first line is an axis or a data row.
pub fn read_rows(
    path: &Path, content: &str, source: &SnapshotSource, index: &SeriesIndex,
) -> Result<(Option<Axis>, Vec<ResultRow>), LoadError> {
    let mut records = split_records(path, content, source.delimiter)?.into_iter().peekable();

    let axis = match source.header {
        Header::None => None,
        Header::Skip => {
            records.next();
            None
        }
        Header::Axis => records
            .next()
            .map(|(line, fields)| parse_axis(path, line, &fields))
            .transpose()?,
        Header::Detect => {
            let detected = records
                .peek()
                .map_or(false, |(_, fields)| is_axis_line(fields, index, &source.rule));
            if detected {
                records.next().map(|(line, fields)| parse_axis(path, line, &fields)).transpose()?
            } else {
                None
            }
        }
    };

    let rows = records
        .map(|(line, fields)| {
            let values = value_fields(path, line, &fields, source.values)?;
            Ok(ResultRow {
                line,
                label: fields[0].clone(),
                values: parse_values(path, line, values)?,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    Ok((axis, rows))
}

/// Resolves each row against the series index and stores its values at the matched position.
pub fn tabulate(
    path: &Path, axis: Option<Axis>, rows: Vec<ResultRow>, index: &SeriesIndex, rule: &MatchRule,
) -> Result<SeriesTable, LoadError> {
    let axis_len = axis.as_ref().map(|a| a.values.len());
    let mut table = SeriesTable::new(index.len(), axis);

    for row in rows {
        let position = match index.position(&row.label, rule) {
            Some(p) => p,
            None => {
                tracing::debug!(label=%row.label, line=%row.line, "no series configured for result label - skipping");
                continue;
            }
        };

        match axis_len {
            Some(expected) if row.values.len() != expected => {
                return Err(LoadError::AxisMismatch {
                    file: path.to_path_buf(),
                    label: row.label,
                    expected,
                    actual: row.values.len(),
                });
            }
            None if 1 < row.values.len() => {
                return Err(LoadError::MalformedLine {
                    file: path.to_path_buf(),
                    line: row.line,
                    reason: format!("{} values for {} but the file declares no axis", row.values.len(), row.label),
                });
            }
            _ => {}
        }

        if let Some(replaced) = table.insert(position, row.values) {
            tracing::debug!(label=%row.label, line=%row.line, ?replaced, "later result row replaced earlier values");
        }
    }

    Ok(table)
}

type Record = (u64, Vec<String>);

fn split_records(path: &Path, content: &str, delimiter: Delimiter) -> Result<Vec<Record>, LoadError> {
    if content.is_empty() {
        return Ok(Vec::new());
    }

    if !content.ends_with('\n') {
        return Err(LoadError::MissingTrailingNewline(path.to_path_buf()));
    }

    if let Some(blank) = content.lines().position(|line| line.trim().is_empty()) {
        return Err(LoadError::MalformedLine {
            file: path.to_path_buf(),
            line: blank as u64 + 1,
            reason: "blank line".to_string(),
        });
    }

    match delimiter {
        Delimiter::Whitespace => Ok(content
            .lines()
            .enumerate()
            .map(|(i, line)| (i as u64 + 1, line.split_whitespace().map(String::from).collect()))
            .collect()),

        Delimiter::Char(delimiter) => {
            let mut reader = csv::ReaderBuilder::new()
                .delimiter(delimiter)
                .has_headers(false)
                .flexible(true)
                .quoting(false)
                .trim(csv::Trim::None)
                .from_reader(content.as_bytes());

            let mut records = Vec::new();
            for record in reader.records() {
                let record = record?;
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                records.push((line, record.iter().map(String::from).collect()));
            }
            Ok(records)
        }
    }
}

fn value_fields<'r>(
    path: &Path, line: u64, fields: &'r [String], columns: ValueColumns,
) -> Result<&'r [String], LoadError> {
    let values = match columns {
        ValueColumns::Remaining => fields.get(1..).filter(|v| !v.is_empty()),
        ValueColumns::Single(column) => fields.get(column..=column),
    };

    values.ok_or_else(|| LoadError::MalformedLine {
        file: path.to_path_buf(),
        line,
        reason: format!("expected values in {:?} but found {} fields", columns, fields.len()),
    })
}

fn parse_values(path: &Path, line: u64, fields: &[String]) -> Result<Vec<f64>, LoadError> {
    fields
        .iter()
        .map(|field| {
            f64::from_str(field).map_err(|source| LoadError::ParseFloat {
                file: path.to_path_buf(),
                line,
                field: field.clone(),
                source,
            })
        })
        .collect()
}

fn is_axis_line(fields: &[String], index: &SeriesIndex, rule: &MatchRule) -> bool {
    let numeric = fields.iter().skip(1).filter(|f| f64::from_str(f).is_ok()).count();
    2 <= numeric && index.position(&fields[0], rule).is_none()
}

fn parse_axis(path: &Path, line: u64, fields: &[String]) -> Result<Axis, LoadError> {
    let values = value_fields(path, line, fields, ValueColumns::Remaining)?;
    Ok(Axis {
        label: fields[0].clone(),
        values: parse_values(path, line, values)?,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use claim::*;
    use once_cell::sync::Lazy;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::elements::SeriesEntry;

    fn ab_index() -> SeriesIndex {
        SeriesIndex::new(vec![SeriesEntry::new("A", "A"), SeriesEntry::new("B", "B")])
    }

    fn semicolon_source() -> SnapshotSource {
        SnapshotSource::builtin().remove(0)
    }

    fn parse(content: &str, source: &SnapshotSource, index: &SeriesIndex) -> Result<SeriesTable, LoadError> {
        let path = Path::new("test.txt");
        let (axis, rows) = read_rows(path, content, source, index)?;
        tabulate(path, axis, rows, index, &source.rule)
    }

    #[test]
    fn test_rows_land_in_configuration_order() {
        Lazy::force(&crate::tracing::TEST_TRACING);
        let main_span = tracing::info_span!("test_rows_land_in_configuration_order");
        let _main_span_guard = main_span.enter();

        let table = assert_ok!(parse("B;2.0\nA;1.0\n", &semicolon_source(), &ab_index()));
        assert_eq!(table.scalars(), vec![Some(1.0), Some(2.0)]);
        assert_none!(table.axis());
    }

    #[test]
    fn test_unmatched_rows_are_dropped() {
        let table = assert_ok!(parse("A;1.0\nB;2.0\nC;9.0\n", &semicolon_source(), &ab_index()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.scalars(), vec![Some(1.0), Some(2.0)]);

        let table = assert_ok!(parse("C;9.0\nB;2.0\n", &semicolon_source(), &ab_index()));
        assert_eq!(table.scalars(), vec![None, Some(2.0)]);
    }

    #[test]
    fn test_trailing_newline_is_required() {
        let actual = parse("A;1.0\nB;2.0", &semicolon_source(), &ab_index());
        assert!(matches!(actual, Err(LoadError::MissingTrailingNewline(_))));

        let table = assert_ok!(parse("A;1.0\r\nB;2.0\r\n", &semicolon_source(), &ab_index()));
        assert_eq!(table.scalars(), vec![Some(1.0), Some(2.0)]);

        let table = assert_ok!(parse("", &semicolon_source(), &ab_index()));
        assert!(!table.has_data());
    }

    #[test]
    fn test_malformed_content() {
        let actual = parse("A;1.0\n\nB;2.0\n", &semicolon_source(), &ab_index());
        assert!(matches!(actual, Err(LoadError::MalformedLine { line: 2, .. })));

        let actual = parse("A;one\n", &semicolon_source(), &ab_index());
        assert!(matches!(actual, Err(LoadError::ParseFloat { line: 1, .. })));

        let actual = parse("A\n", &semicolon_source(), &ab_index());
        assert!(matches!(actual, Err(LoadError::MalformedLine { line: 1, .. })));
    }

    #[test]
    fn test_recording_speed_table() {
        let source = SnapshotSource::builtin().remove(3);
        assert_eq!(source.file_name, "recording-speed.txt");

        let content = "\
Benchmark                                                   Mode  Cnt   Score   Error  Units
RecordingSpeedBenchmark.recordDDSketchPaginatedLogarithmic  avgt   10  41.113 ± 0.512  ns/op
RecordingSpeedBenchmark.recordDynaHistDynamicLogLinear      avgt   10  21.437 ± 0.105  ns/op
RecordingSpeedBenchmark.recordDynaHistStaticLogLinear       avgt   10  18.250 ± 0.087  ns/op
RecordingSpeedBenchmark.recordHdrDoubleHistogram            avgt   10  25.730 ± 0.301  ns/op
";
        let table = assert_ok!(parse(content, &source, &SeriesIndex::builtin()));
        assert_eq!(table.len(), 7);
        assert_relative_eq!(assert_some!(table.scalar(0)), 18.25);
        assert_relative_eq!(assert_some!(table.scalar(1)), 21.437);
        assert_none!(table.scalar(2));
        assert_relative_eq!(assert_some!(table.scalar(6)), 25.73);
    }

    #[test]
    fn test_axis_header() {
        let source = SnapshotSource {
            header: Header::Axis,
            rule: MatchRule::DisplayName,
            ..semicolon_source()
        };

        let table = assert_ok!(parse(
            "number of values;1000;10000;100000\nA;1.5;2.5;3.5\nB;4.0;5.0;6.0\n",
            &source,
            &ab_index()
        ));
        let axis = assert_some!(table.axis());
        assert_eq!(axis.label, "number of values");
        assert_eq!(axis.values, vec![1000.0, 10000.0, 100000.0]);
        assert_eq!(table.get(0), Some(&[1.5, 2.5, 3.5][..]));
        assert_eq!(table.get(1), Some(&[4.0, 5.0, 6.0][..]));

        let actual = parse("number of values;1000;10000\nA;1.5\n", &source, &ab_index());
        assert!(matches!(actual, Err(LoadError::AxisMismatch { expected: 2, actual: 1, .. })));
    }

    #[test]
    fn test_detected_axis_header() {
        let source = semicolon_source();
        assert_eq!(source.header, Header::Detect);

        let table = assert_ok!(parse("number of values;1000;10000\nA;1.0;2.0\nB;3.0;4.0\n", &source, &ab_index()));
        let axis = assert_some!(table.axis());
        assert_eq!(axis.label, "number of values");
        assert_eq!(axis.values, vec![1000.0, 10000.0]);
        assert_eq!(table.get(0), Some(&[1.0, 2.0][..]));
        assert_eq!(table.get(1), Some(&[3.0, 4.0][..]));

        // a first line naming a series stays a data row
        let table = assert_ok!(parse("A;1.0\nB;2.0\n", &source, &ab_index()));
        assert_none!(table.axis());
        assert_eq!(table.scalars(), vec![Some(1.0), Some(2.0)]);

        let actual = parse("A;1.0;2.0\nB;3.0;4.0\n", &source, &ab_index());
        assert!(matches!(actual, Err(LoadError::MalformedLine { line: 1, .. })));
    }

    #[test]
    fn test_multiple_values_without_axis_are_rejected() {
        let actual = parse("A;1.0\nB;2.0;3.0\n", &semicolon_source(), &ab_index());
        assert!(matches!(actual, Err(LoadError::MalformedLine { line: 2, .. })));
    }

    #[test]
    fn test_labels_match_exactly() {
        let table = assert_ok!(parse(" A ;1.0\nB;2.0\n", &semicolon_source(), &ab_index()));
        assert_eq!(table.scalars(), vec![None, Some(2.0)]);
    }

    #[test]
    fn test_load_snapshot_from_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("memory-footprint-jol.txt"),
            "HdrHistogram.DoubleHistogram;282.2\nDynaHist (static, log-linear);41.0\nDDSketch (sparse, log);88.1\n",
        )?;

        let table = load_snapshot(dir.path(), &semicolon_source(), &SeriesIndex::builtin())?;
        assert_eq!(table.scalar(0), Some(41.0));
        assert_eq!(table.scalar(6), Some(282.2));
        assert_eq!(table.scalars().iter().filter(|v| v.is_some()).count(), 2);

        std::fs::write(
            dir.path().join("serialization-size-raw.txt"),
            "number of values;1000;10000\nDynaHist (static, log-linear);1.0;2.0\n",
        )?;
        let raw = SnapshotSource::builtin().remove(2);
        let table = load_snapshot(dir.path(), &raw, &SeriesIndex::builtin())?;
        assert_eq!(assert_some!(table.axis()).values, vec![1000.0, 10000.0]);
        assert_eq!(table.get(0), Some(&[1.0, 2.0][..]));

        let missing = SnapshotSource::builtin().remove(1);
        assert!(matches!(
            load_snapshot(dir.path(), &missing, &SeriesIndex::builtin()),
            Err(LoadError::Io(_))
        ));
        Ok(())
    }
}
