//! Command tree, flag registration and program entry helpers.
//!
//! A [`Command`] tree is turned into a `clap` parser on execution. Flags are
//! declared with [`FlagSpec`] around any [`FlagValue`](crate::flag::FlagValue)
//! and may be bound to config keys. Errors are returned to the caller;
//! [`exit_on_error`] is the one place deciding how a program terminates.

mod command;
mod config;
mod exit;
mod flags;
pub mod logging;

pub use command::Command;
pub use config::{config, config_for_env, Defaulter, CONFIG_ENV, DEBUG_CONFIG_ENV};
pub use exit::{exit_on_error, report};
pub use flags::{FlagSpec, ParsedFlags};
