//! Console and optional JSON-lines file logging.

use eyre::{Result, WrapErr};
use overload_config::Logging;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. Console output goes to stderr so stdout
/// stays parseable under `--json`.
///
/// The returned guard flushes the file sink when dropped; keep it alive
/// until the process is about to exit.
pub fn init(console_level: &str, json: bool, logging: Option<&Logging>) -> Result<Option<WorkerGuard>> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_level));
    let console: BoxedLayer = if json {
        fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_filter(console_filter)
            .boxed()
    };

    let mut layers = vec![console];
    let mut guard = None;
    if let Some(l) = logging {
        if let Some(file) = l.file.as_deref() {
            let (layer, g) = file_layer(l, Path::new(file))?;
            layers.push(layer);
            guard = Some(g);
        }
    }
    // a second init in the same process (tests) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(layers).try_init();
    Ok(guard)
}

fn file_layer(cfg: &Logging, path: &Path) -> Result<(BoxedLayer, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| eyre::eyre!("logging.file {:?} has no file name", path))?;
    let rotation = match cfg.rotation.as_deref().unwrap_or("never") {
        "daily" => Rotation::DAILY,
        "hourly" => Rotation::HOURLY,
        _ => Rotation::NEVER,
    };
    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(name)
        .build(dir)
        .wrap_err_with(|| format!("open log file {path:?}"))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let level = cfg.level.as_deref().unwrap_or("info");
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(EnvFilter::new(level))
        .boxed();
    Ok((layer, guard))
}
