use benchplot::charts;
use benchplot::error::{BenchplotError, ErrorLabel};
use benchplot::loader::SnapshotSource;
use benchplot::render::SvgRenderer;
use benchplot::settings::{self, SnapshotCliOptions};
use benchplot::tracing::{get_subscriber, init_subscriber};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("snapshot-charts", "info");
    init_subscriber(subscriber);

    let main_span = tracing::info_span!("main");
    let _main_span_guard = main_span.enter();

    let options = SnapshotCliOptions::parse();
    tracing::info!(?options, "rendering snapshot charts");

    if let Err(err) = run(&options) {
        tracing::error!(error=?err, error_label=%err.label(), "failed to render snapshot charts");
        return Err(err.into());
    }
    Ok(())
}

fn run(options: &SnapshotCliOptions) -> Result<(), BenchplotError> {
    let settings = settings::load_settings(options.config.as_deref())?;
    let index = settings.series_index()?;
    let mut renderer = SvgRenderer::for_snapshots(&options.out_path, &settings);

    let written = charts::render_snapshots(&options.in_path, &SnapshotSource::builtin(), &index, &mut renderer)?;
    tracing::info!(nr_charts=%written.len(), out_path=?options.out_path, "snapshot charts written");
    Ok(())
}
