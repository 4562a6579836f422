//! Logging setup built on `tracing-subscriber`.
//!
//! `RUST_LOG` always wins. Otherwise verbosity comes from the CLI:
//! default `warn`, `-v` debug, `-vv` trace, `-q` errors only.

use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// Logs go to stderr, or to `log_file` (appended) when given.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global
/// subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
        }
        None => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
        }
    }

    Ok(())
}

fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "redirect_maps=debug,info",
        _ => "trace",
    }
}

/// Initialize logging for tests. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}
