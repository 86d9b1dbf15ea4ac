pub mod cli;
pub mod config;
pub mod context;
mod error;
pub mod flag;
pub mod version;

pub use config::{ConfigError, Registry};
pub use context::AppContext;
pub use error::Error;
pub use flag::FlagError;
pub use version::BuildInfo;
