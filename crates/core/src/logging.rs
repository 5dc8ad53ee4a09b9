//! Log setup for the jscan binaries.
//!
//! Logs go to a daily file `jscan-<component>.<date>.log` under [`log_dir`],
//! optionally mirrored to stderr. `RUST_LOG` overrides the default filter.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable overriding the log directory.
pub const LOG_DIR_ENV: &str = "JSCAN_LOG_DIR";

/// Directory holding the rolling log files: `JSCAN_LOG_DIR`, else `~/.jscan/logs`.
pub fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jscan/logs")
}

/// Filter used when `RUST_LOG` is unset. Other crates stay at `warn`.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,jscan_core=debug,jscan_cli=debug"
    } else {
        "warn,jscan_core=info,jscan_cli=info"
    }
}

fn file_appender(dir: &Path, component: &str) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(format!("jscan-{component}"))
        .filename_suffix("log")
        .build(dir)
}

/// Installs the global subscriber. `to_stderr` adds a console layer and raises
/// the default level to `debug`. Keep the returned guard alive until exit; it is
/// `None` when the log directory cannot be written, in which case only the
/// console layer (if any) is active.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<WorkerGuard> {
    let dir = log_dir();
    let (file_layer, guard) = match file_appender(&dir, component) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("jscan: file logging disabled ({}): {e}", dir.display());
            (None, None)
        }
    };

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(to_stderr)));

    // An embedding application may already own the global subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    guard
}
