// src/utils/logging.rs
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::LogConfig;

/// Installs the global subscriber. `RUST_LOG` wins over `log.level`.
///
/// Keep the returned guard alive for the life of the process, otherwise
/// buffered lines are lost on exit.
pub fn init_tracing(config: &LogConfig, file_prefix: &str) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let (writer, guard) = match &config.directory {
        Some(directory) => {
            tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, file_prefix))
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(config.directory.is_none())
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}
