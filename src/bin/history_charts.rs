use benchplot::charts;
use benchplot::error::{BenchplotError, ErrorLabel};
use benchplot::loader::{CommitDates, GitCommitDates, HistoryLoader, NoCommitDates};
use benchplot::render::SvgRenderer;
use benchplot::settings::{self, HistoryCliOptions};
use benchplot::tracing::{get_subscriber, init_subscriber};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("history-charts", "info");
    init_subscriber(subscriber);

    let main_span = tracing::info_span!("main");
    let _main_span_guard = main_span.enter();

    let options = HistoryCliOptions::parse();
    tracing::info!(?options, "rendering benchmark history charts");

    if let Err(err) = run(&options) {
        tracing::error!(error=?err, error_label=%err.label(), "failed to render benchmark history charts");
        return Err(err.into());
    }
    Ok(())
}

fn run(options: &HistoryCliOptions) -> Result<(), BenchplotError> {
    let settings = settings::load_settings(options.config.as_deref())?;

    let commit_dates: Box<dyn CommitDates> = match options.git_repository() {
        Some(repository) => Box::new(GitCommitDates::new(repository)),
        None => Box::new(NoCommitDates),
    };
    let mut loader = HistoryLoader::new(commit_dates);
    let rows = loader.load_dir(&options.in_path)?;

    let mut renderer = SvgRenderer::for_history(&options.out_path, &settings);
    let written = charts::render_history(rows, options.show_confidence_interval, &mut renderer)?;
    tracing::info!(nr_charts=%written.len(), out_path=?options.out_path, "benchmark history charts written");
    Ok(())
}
