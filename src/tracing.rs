use once_cell::sync::Lazy;
use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

pub static TEST_TRACING: Lazy<()> = Lazy::new(|| {
    let filter = if std::env::var("TEST_LOG").is_ok() { "trace" } else { "off" };
    let subscriber = get_subscriber("test", filter);
    init_subscriber(subscriber);
});

/// Composes the bunyan JSON subscriber used by the chart binaries. `RUST_LOG` overrides
/// `env_filter`. Records go to stderr so stdout stays free for the binaries.
pub fn get_subscriber(name: impl Into<String>, env_filter: impl AsRef<str>) -> impl Subscriber + Sync + Send {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    let formatting_layer = BunyanFormattingLayer::new(name.into(), std::io::stderr);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Registers `subscriber` as the global default and bridges `log` records into it. Call once per
/// process.
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) {
    if let Err(err) = LogTracer::init() {
        eprintln!("failed to set logger: {}", err);
    }

    if let Err(err) = set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {}", err);
    }
}
