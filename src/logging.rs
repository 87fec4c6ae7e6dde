//! Tracing initialization

use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: an ANSI stdout layer plus a rolling log
/// file, written as JSON when `use_json` is set.
///
/// `RUST_LOG` takes precedence over the configured level. The returned
/// guard flushes buffered lines on drop; hold it for the life of the
/// process.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let rotation = match config.rotation.as_str() {
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        _ => Rotation::NEVER,
    };
    let (file_writer, guard) = tracing_appender::non_blocking(RollingFileAppender::new(
        rotation,
        &config.log_dir,
        &config.log_file,
    ));

    let level =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let stdout = fmt::layer().with_target(false);

    if config.use_json {
        tracing_subscriber::registry()
            .with(level)
            .with(stdout)
            .with(fmt::layer().json().with_writer(file_writer).with_ansi(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(level)
            .with(stdout)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(file_writer)
                    .with_ansi(false),
            )
            .init();
    }

    guard
}
