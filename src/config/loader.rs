//! Layered config file loading.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::env::getenv_or_default;
use super::file::{find_root, read_candidate, read_root, walk_overlay, NameMatcher};
use super::{ConfigError, Options, Registry};

/// Anything able to produce a [`Registry`] for an environment name.
pub trait Loadable: fmt::Debug {
    fn load_for_env(&self, env: &str) -> Result<Registry, ConfigError>;
}

/// Loads a root config file and merges the overlay files of one environment.
///
/// With default options and environment `dev`, the loader reads
/// `./config.{yaml,yml,json}` (first found), then every `config.{ext}` or
/// `config.*.{ext}` under `./config.d/dev/`, in file name order, each one
/// merged over the previous result.
///
/// ```no_run
/// use dragon_cli::config::{Loadable, Loader, Options};
///
/// let loader = Loader::new(Options::default().with_base_path("deploy"));
/// let registry = loader.load_for_env("production")?;
/// let level = registry.get_string("log.level");
/// # Ok::<(), dragon_cli::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: Options,
}

impl Loader {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    fn base_path(&self) -> Result<PathBuf, ConfigError> {
        let opts = &self.options;
        if opts.search_parent_dir() {
            let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
            return find_parent_dir(&cwd, opts.radix());
        }

        let configured = opts.base_path().to_path_buf();
        Ok(match opts.base_path_env_var() {
            Some(var) => {
                PathBuf::from(getenv_or_default(var, &configured.to_string_lossy()))
            }
            None => configured,
        })
    }
}

impl Loadable for Loader {
    fn load_for_env(&self, env: &str) -> Result<Registry, ConfigError> {
        let opts = &self.options;
        let output = opts.output();
        let base = self.base_path()?;
        let mut registry = Registry::new();

        match read_root(&base, opts.radix())? {
            Some((path, map)) => {
                debug!(path = %path.display(), "using config file");
                output.line(format_args!("using config file: {}", path.display()));
                registry.merge_config_map(map);
                registry.set_config_file(path);
            }
            None => {
                warn!(radix = opts.radix(), base = %base.display(), "no config file found");
                output.line(format_args!(
                    "warn: no config file found (pattern: {:?}), defaulting to empty config",
                    opts.radix()
                ));
            }
        }

        let overlay = base.join(opts.env_dir()).join(env);
        let matcher = NameMatcher::new(opts.radix(), opts.suffix())?;
        for candidate in walk_overlay(&overlay, &matcher)? {
            debug!(path = %candidate.path.display(), env, "including config file");
            output.line(format_args!(
                "including config file: {}",
                candidate.path.display()
            ));
            registry.merge_config_map(read_candidate(&candidate)?);
        }

        registry.automatic_env();
        if opts.watch() && registry.config_file_used().is_some() {
            registry.watch_config();
        }

        Ok(registry)
    }
}

/// Returns the first directory, from `start` upward, holding `{radix}.{ext}`.
pub fn find_parent_dir(start: &Path, radix: &str) -> Result<PathBuf, ConfigError> {
    start
        .ancestors()
        .find(|dir| find_root(dir, radix).is_some())
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::ConfigDirNotFound {
            radix: radix.to_string(),
            start: start.to_path_buf(),
        })
}

/// Chains several loaders for the same environment; later ones win.
#[derive(Debug, Default)]
pub struct CombinedLoader {
    loaders: Vec<Box<dyn Loadable>>,
}

impl CombinedLoader {
    pub fn new(loaders: Vec<Box<dyn Loadable>>) -> Self {
        Self { loaders }
    }

    #[must_use]
    pub fn push(mut self, loader: impl Loadable + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl Loadable for CombinedLoader {
    fn load_for_env(&self, env: &str) -> Result<Registry, ConfigError> {
        let mut result: Option<Registry> = None;

        for (index, loader) in self.loaders.iter().enumerate() {
            let loaded = loader
                .load_for_env(env)
                .map_err(|e| ConfigError::LoaderFailed {
                    index,
                    env: env.to_string(),
                    source: Box::new(e),
                })?;

            match result.as_mut() {
                None => result = Some(loaded),
                Some(acc) => acc.merge_config_map(loaded.all_settings()),
            }
        }

        result.ok_or(ConfigError::NoLoaders)
    }
}
