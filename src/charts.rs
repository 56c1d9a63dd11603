use std::path::{Path, PathBuf};

use crate::elements::{HistoryRow, SeriesIndex};
use crate::loader::{self, SnapshotSource};
use crate::render::{self, ChartRenderer};
use crate::BenchplotResult;

/// Loads every snapshot source from `in_dir` and renders one chart per source.
#[tracing::instrument(level = "info", skip(sources, index, renderer), fields(nr_sources=%sources.len()))]
pub fn render_snapshots(
    in_dir: &Path, sources: &[SnapshotSource], index: &SeriesIndex, renderer: &mut dyn ChartRenderer,
) -> BenchplotResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let table = loader::load_snapshot(in_dir, source, index)?;
        let chart = render::snapshot_chart(source, index, &table);
        tracing::debug!(title=%chart.title(), stem=%source.stem, "rendering snapshot chart");
        written.push(renderer.render(&source.stem, &chart)?);
    }
    Ok(written)
}

/// Groups history rows into charts and renders each one, named after its test and parameters.
#[tracing::instrument(level = "info", skip(rows, renderer), fields(nr_rows=%rows.len()))]
pub fn render_history(
    rows: Vec<HistoryRow>, show_confidence_interval: bool, renderer: &mut dyn ChartRenderer,
) -> BenchplotResult<Vec<PathBuf>> {
    let tables = loader::history_tables(rows)?;
    tracing::info!(nr_charts=%tables.len(), "rendering benchmark history");

    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let chart = render::history_chart(&table, show_confidence_interval);
        written.push(renderer.render_line_chart(&chart.title, &chart)?);
    }
    Ok(written)
}
