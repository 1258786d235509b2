//! Logging for the lifelog binaries
//!
//! Everything goes to daily files under `$XDG_STATE_HOME/lifelog/`
//! (`lifelog.YYYY-MM-DD.log`); stdout stays clean for reports and CSV.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Flushes buffered log lines when dropped. Hold it for the life of `main`.
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `logging.level`. At most `logging.max_files` daily
/// files are kept.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("lifelog")
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1))
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("logging: cannot create appender: {}", e)))?;
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let env = std::env::var("RUST_LOG").ok();
    tracing_subscriber::registry()
        .with(filter(env.as_deref(), &config.level))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::debug!(
        log_dir = %log_dir.display(),
        level = %config.level,
        max_files = config.max_files,
        "Logging initialized"
    );

    Ok(LoggingGuard { _worker: worker })
}

/// Subscriber for unit tests; output is captured per test.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Filter from `RUST_LOG` when set and valid, else from the configured level.
fn filter(env: Option<&str>, level: &str) -> EnvFilter {
    env.and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
