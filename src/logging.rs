use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::get_config_folder;

const LOG_FILE_NAME: &str = "xenia-frontend.log";

pub fn get_log_file_path() -> PathBuf {
    get_config_folder().join(LOG_FILE_NAME)
}

/// Directives used when `RUST_LOG` is not set. The `debug` option also turns on
/// debug output from reqwest, zip and the rest of the dependency tree.
fn default_directives(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info,xenia_frontend=debug"
    }
}

/// Sends install, launch and build events to `xenia-frontend.log` in the config
/// folder and to stderr. Drop the guard only when the program exits, it flushes the file.
pub fn init_logging(debug: bool) -> WorkerGuard {
    let log_folder = get_config_folder();
    let _ = std::fs::create_dir_all(&log_folder);

    let file_appender = tracing_appender::rolling::never(&log_folder, LOG_FILE_NAME);
    let (log_file, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .compact(),
        )
        .init();

    let debug_enabled = debug;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        debug = debug_enabled,
        log_path = %get_log_file_path().display(),
        "Started xenia-frontend"
    );

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_option_widens_the_default_filter() {
        assert_eq!(default_directives(false), "info,xenia_frontend=debug");
        assert_eq!(default_directives(true), "debug");
        assert!(EnvFilter::try_new(default_directives(false)).is_ok());
    }

    #[test]
    fn log_file_lives_in_config_folder() {
        assert!(get_log_file_path().ends_with("xenia-frontend/xenia-frontend.log"));
    }
}
