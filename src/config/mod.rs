//! Layered configuration loading.
//!
//! A [`Loader`] reads a root config file and merges per-environment overlay
//! files over it into a [`Registry`]. A [`CombinedLoader`] chains several
//! loaders, which is how config files and secrets files end up in one
//! registry. See [`presets`] for the conventional layouts.

mod env;
mod error;
mod file;
mod loader;
mod options;
pub mod presets;
mod registry;

pub use error::ConfigError;
pub use file::CONFIG_EXTENSIONS;
pub use loader::{find_parent_dir, CombinedLoader, Loadable, Loader};
pub use options::{Options, Output};
pub use registry::Registry;
