use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Where a loader reports which files it used.
#[derive(Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
    /// Report nothing.
    Discard,
    Writer(Arc<Mutex<dyn Write + Send>>),
}

impl Output {
    /// Wraps a shared writer.
    pub fn writer(writer: Arc<Mutex<dyn Write + Send>>) -> Self {
        Output::Writer(writer)
    }

    /// Writes one line. Sink failures are not load failures, so they are dropped.
    pub(crate) fn line(&self, args: fmt::Arguments<'_>) {
        let _ = match self {
            Output::Stdout => writeln!(io::stdout().lock(), "{args}"),
            Output::Stderr => writeln!(io::stderr().lock(), "{args}"),
            Output::Discard => Ok(()),
            Output::Writer(writer) => match writer.lock() {
                Ok(mut w) => writeln!(w, "{args}"),
                Err(_) => Ok(()),
            },
        };
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => f.write_str("Stdout"),
            Output::Stderr => f.write_str("Stderr"),
            Output::Discard => f.write_str("Discard"),
            Output::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Settings for a [`Loader`](super::Loader).
///
/// Built by chaining `with_*` calls on [`Options::default()`]:
///
/// ```
/// use dragon_cli::config::Options;
///
/// let options = Options::default()
///     .with_base_path("deploy")
///     .with_radix("secrets")
///     .with_suffix("dec")
///     .with_mute(true);
/// assert_eq!(options.radix(), "secrets");
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Options {
    base_path: PathBuf,
    base_path_env_var: Option<String>,
    env_dir: String,
    radix: String,
    suffix: Option<String>,
    watch: bool,
    output: Output,
    search_parent_dir: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            base_path_env_var: None,
            env_dir: "config.d".to_string(),
            radix: "config".to_string(),
            suffix: None,
            watch: true,
            output: Output::Stdout,
            search_parent_dir: false,
        }
    }
}

impl Options {
    /// Directory holding the root config file and the env dir.
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = path.into();
        self
    }

    /// Environment variable that, when set and non-empty, replaces the base path.
    pub fn with_base_path_from_env_var(mut self, name: impl Into<String>) -> Self {
        self.base_path_env_var = Some(name.into());
        self
    }

    /// Directory under the base path holding one overlay directory per environment.
    pub fn with_env_dir(mut self, dir: impl Into<String>) -> Self {
        self.env_dir = dir.into();
        self
    }

    /// File name stem of config files, `config` for `config.yaml`.
    pub fn with_radix(mut self, radix: impl Into<String>) -> Self {
        self.radix = radix.into();
        self
    }

    /// Extra extension marking overlay files that shadow their unsuffixed twin.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_mute(mut self, mute: bool) -> Self {
        if mute {
            self.output = Output::Discard;
        } else if matches!(self.output, Output::Discard) {
            self.output = Output::Stdout;
        }
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Walk up from the current directory to find the one holding the root file.
    pub fn with_search_parent_dir(mut self, search: bool) -> Self {
        self.search_parent_dir = search;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn base_path_env_var(&self) -> Option<&str> {
        self.base_path_env_var.as_deref()
    }

    pub fn env_dir(&self) -> &str {
        &self.env_dir
    }

    pub fn radix(&self) -> &str {
        &self.radix
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn watch(&self) -> bool {
        self.watch
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn search_parent_dir(&self) -> bool {
        self.search_parent_dir
    }
}
