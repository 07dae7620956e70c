//! Structured logging setup, grounded on the teacher's
//! `logging.rs`, simplified for this server's CLI-only configuration
//! (no JSON format option — one plain text layer, optionally mirrored
//! to a size-rotated file per `--log-file`/`--log-max-size`/`--log-count`).

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

use crate::config::ServerConfig;

/// Initialize the global tracing subscriber: stdout always, plus a
/// rolling file appender when `--log-file` is set.
pub fn init(cfg: &ServerConfig) {
    let default_level = if cfg.debug {
        "debug"
    } else if cfg.verbose {
        "info"
    } else {
        "warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(std::io::stdout),
    );

    if let Some(file_layer) = build_file_layer(cfg) {
        let _ = registry.with(file_layer).try_init();
    } else {
        let _ = registry.try_init();
    }
}

fn build_file_layer<S>(cfg: &ServerConfig) -> Option<impl tracing_subscriber::Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let log_file = cfg.log_file.as_ref()?;
    let dir = log_file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
    let filename = log_file.file_name()?.to_str()?.to_string();

    if std::fs::create_dir_all(dir).is_err() {
        eprintln!("failed to create log directory {}, continuing with stdout only", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::RollingFileAppender::new(
        tracing_appender::rolling::Rotation::DAILY,
        dir,
        filename,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    // Held for process lifetime: dropping it would stop flushing to the file.
    let _leaked: &'static _ = Box::leak(Box::new(guard));

    Some(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(non_blocking),
    )
}
