pub use model::*;

mod model;

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::SettingsError;

/// Loads settings layered from built-in defaults, `configuration/base` in the working directory,
/// an optional explicit configuration file and finally `APP_`-prefixed environment variables.
/// E.g. `APP_CHART__WIDTH=800` would set `Settings.chart.width`.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, SettingsError> {
    let base_path = std::env::current_dir()?;
    let configuration_directory = base_path.join("configuration");
    load_settings_from(&configuration_directory, config_path)
}

#[tracing::instrument(level = "debug")]
pub fn load_settings_from(
    configuration_directory: &Path, config_path: Option<&Path>,
) -> Result<Settings, SettingsError> {
    let mut builder = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base")).required(false));

    if let Some(path) = config_path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__"),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

fn existing_dir(rep: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(rep);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("{} is not an existing directory", rep))
    }
}

/// Renders the space-consumption and recording-speed snapshot files as charts.
#[derive(Debug, Parser)]
#[clap(version, author = "Damon Rolfs")]
pub struct SnapshotCliOptions {
    /// Input folder, should contain the snapshot text files.
    #[clap(long, default_value = "charts", value_parser = existing_dir)]
    pub in_path: PathBuf,

    /// Output folder, will contain the charts.
    #[clap(long, default_value = "docs/figures", value_parser = existing_dir)]
    pub out_path: PathBuf,

    /// Additional configuration file to load on top of `configuration/base`.
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}

/// Renders JMH benchmark history as one chart per test and parameter set.
#[derive(Debug, Parser)]
#[clap(version, author = "Damon Rolfs")]
pub struct HistoryCliOptions {
    /// Input folder, should contain the JSON files.
    #[clap(long, default_value = "./benchmark-results/", value_parser = existing_dir)]
    pub in_path: PathBuf,

    /// Output folder, will contain the plots.
    #[clap(long, default_value = "./benchmark-results/", value_parser = existing_dir)]
    pub out_path: PathBuf,

    /// Set this to an empty string to disable fetching of commit date.
    #[clap(long, default_value = ".")]
    pub git_path: String,

    /// Add the confidence interval from the JMH results to the plots.
    #[clap(long)]
    pub show_confidence_interval: bool,

    /// Additional configuration file to load on top of `configuration/base`.
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}

impl HistoryCliOptions {
    pub fn git_repository(&self) -> Option<PathBuf> {
        if self.git_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.git_path))
        }
    }
}
