//! Logging setup for command-line programs.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Registry;
use crate::Error;

/// Config key read by [`init_from_config`].
pub const LOG_LEVEL_KEY: &str = "log.level";

/// Installs a stderr logger filtered by `RUST_LOG`, or by `default_filter`
/// when `RUST_LOG` is unset or invalid.
pub fn init(default_filter: &str) -> Result<(), Error> {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), default_filter)?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;
    Ok(())
}

/// Like [`init`], with the default filter taken from `log.level`, or `info`.
pub fn init_from_config(config: &Registry) -> Result<(), Error> {
    let level = config
        .get_string(LOG_LEVEL_KEY)
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| "info".to_string());
    init(&level)
}

/// Filter for a `-v` count: 0 is warn, 1 info, 2 debug, more is trace.
pub fn filter_for_verbosity(verbose: i64) -> &'static str {
    match verbose {
        i64::MIN..=0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_filter(from_env: Option<&str>, default_filter: &str) -> Result<EnvFilter, Error> {
    if let Some(directives) = from_env.filter(|d| !d.is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return Ok(filter);
        }
    }
    EnvFilter::try_new(default_filter).map_err(|source| Error::InvalidLogFilter {
        filter: default_filter.to_string(),
        source,
    })
}
