use std::fmt;

use thiserror::Error;

/// Errors raised while turning command-line text into a typed flag value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FlagError {
    #[error("invalid {type_name} value {input:?}: {reason}")]
    Parse {
        input: String,
        type_name: &'static str,
        reason: String,
    },

    #[error("malformed comma-separated value {input:?}: {reason}")]
    Csv { input: String, reason: String },
}

impl FlagError {
    pub(crate) fn parse(input: &str, type_name: &'static str, reason: impl fmt::Display) -> Self {
        Self::Parse {
            input: input.to_string(),
            type_name,
            reason: reason.to_string(),
        }
    }
}
