use crate::config::ConfigError;
use crate::flag::FlagError;
use thiserror::Error;

/// Top-level error type for the dragon-cli library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid value for flag --{name}: {source}")]
    Flag { name: String, source: FlagError },

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("application context requires a configuration")]
    MissingConfig,

    #[error("command '{0}' has no handler")]
    NoHandler(String),

    #[error("invalid log filter '{filter}': {source}")]
    InvalidLogFilter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to install logger: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error(transparent)]
    Command(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps an error returned by a command handler.
    pub fn command(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Command(err.into())
    }
}
