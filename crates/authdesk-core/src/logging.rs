//! Tracing subscriber setup.
//!
//! Filter precedence: `AUTHDESK_LOG` env > `[logging] level` > "warn".
//! Logs go to stderr, and optionally to a daily file under `<home>/logs`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, paths};

/// Env var holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "AUTHDESK_LOG";

const LOG_FILE_PREFIX: &str = "authdesk.log";

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the lifetime of the process when file
/// logging is enabled; dropping it flushes and stops the writer thread.
/// Calling this twice is harmless (the second install is ignored).
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if config.file {
        let appender = tracing_appender::rolling::daily(paths::logs_dir(), LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file = fmt::layer().with_writer(writer).with_ansi(false);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr)
            .with(file)
            .try_init();
        Some(guard)
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr)
            .try_init();
        None
    }
}
