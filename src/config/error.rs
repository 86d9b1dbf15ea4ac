use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot find config location ({radix}) in the parent tree of '{start}'")]
    ConfigDirNotFound { radix: String, start: PathBuf },

    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk config directory '{path}': {source}")]
    WalkError {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to parse YAML config file '{path}': {source}")]
    YamlError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON config file '{path}': {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot merge config file '{path}': top-level value is not a mapping")]
    NotAMapping { path: PathBuf },

    #[error("invalid config file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("no loader configured")]
    NoLoaders,

    #[error("loader #{index} failed for environment '{env}': {source}")]
    LoaderFailed {
        index: usize,
        env: String,
        source: Box<ConfigError>,
    },

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] serde_json::Error),
}
