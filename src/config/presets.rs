//! Ready-made loaders following the `config` / `secrets` file conventions.
//!
//! Every constructor takes a closure applied to the preset's [`Options`], so
//! callers can override any preset setting:
//!
//! ```no_run
//! use dragon_cli::config::{presets, Loadable};
//!
//! let registry = presets::load_with_secrets("staging", |opts| opts.with_mute(true))?;
//! # Ok::<(), dragon_cli::ConfigError>(())
//! ```

use super::{CombinedLoader, ConfigError, Loadable, Loader, Options, Registry};

/// Environment variable holding the base path of config files.
pub const DEFAULT_PATH_ENV: &str = "CONFIG_DIR";

/// Stem of config files.
pub const DEFAULT_CONFIG_RADIX: &str = "config";

/// Stem of secrets files.
pub const DEFAULT_SECRET_RADIX: &str = "secrets";

/// Directory, relative to the base path, holding per-environment overlays.
pub const DEFAULT_ENV_DIR: &str = "config.d";

/// Suffix of decrypted secrets files, e.g. `secrets.yaml.dec`.
pub const DEFAULT_SECRET_SUFFIX: &str = "dec";

pub use super::env::getenv_or_default;

fn base_options() -> Options {
    Options::default()
        .with_base_path_from_env_var(DEFAULT_PATH_ENV)
        .with_env_dir(DEFAULT_ENV_DIR)
        .with_radix(DEFAULT_CONFIG_RADIX)
}

fn secret_options(options: Options) -> Options {
    options
        .with_radix(DEFAULT_SECRET_RADIX)
        .with_suffix(DEFAULT_SECRET_SUFFIX)
}

fn test_options(options: Options) -> Options {
    options
        .with_mute(true)
        .with_watch(false)
        .with_search_parent_dir(true)
}

/// Loads `config.{yaml,yml,json}` from `$CONFIG_DIR` (or `.`), with
/// overlays under `config.d/{env}`.
pub fn default_loader(customize: impl FnOnce(Options) -> Options) -> Loader {
    Loader::new(customize(base_options()))
}

/// Like [`default_loader`] for `secrets[.*].{ext}` files, where a
/// `.dec` twin takes the place of its encrypted original.
pub fn secrets_loader(customize: impl FnOnce(Options) -> Options) -> Loader {
    Loader::new(customize(secret_options(base_options())))
}

/// Config files merged with secrets files, secrets winning.
pub fn loader_with_secrets(customize: impl Fn(Options) -> Options) -> CombinedLoader {
    CombinedLoader::default()
        .push(default_loader(&customize))
        .push(secrets_loader(&customize))
}

/// Loader for test programs: muted, unwatched, and locating the root config
/// file in the parent tree of the working directory.
pub fn loader_for_test(customize: impl FnOnce(Options) -> Options) -> Loader {
    Loader::new(customize(test_options(base_options())))
}

pub fn load(env: &str, customize: impl FnOnce(Options) -> Options) -> Result<Registry, ConfigError> {
    default_loader(customize).load_for_env(env)
}

pub fn load_with_secrets(
    env: &str,
    customize: impl Fn(Options) -> Options,
) -> Result<Registry, ConfigError> {
    loader_with_secrets(customize).load_for_env(env)
}

/// Loads config and secrets the way [`loader_for_test`] does.
///
/// Secrets are looked up in the directory found for the config file.
pub fn load_for_test(
    env: &str,
    customize: impl Fn(Options) -> Options,
) -> Result<Registry, ConfigError> {
    let config = loader_for_test(&customize);
    let registry = config.load_for_env(env)?;

    let base = match registry.config_file_used().and_then(|p| p.parent()) {
        Some(dir) => dir.to_path_buf(),
        None => return Ok(registry),
    };
    let secrets = Loader::new(
        customize(secret_options(test_options(base_options())))
            .with_search_parent_dir(false)
            .with_base_path(base),
    );

    CombinedLoader::default()
        .push(Fixed(registry))
        .push(secrets)
        .load_for_env(env)
}

/// A loader returning a registry loaded earlier.
#[derive(Debug)]
struct Fixed(Registry);

impl Loadable for Fixed {
    fn load_for_env(&self, _env: &str) -> Result<Registry, ConfigError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_preset_options() {
        let loader = default_loader(|o| o);
        assert_eq!(loader.options().radix(), "config");
        assert_eq!(loader.options().env_dir(), "config.d");
        assert_eq!(loader.options().base_path_env_var(), Some("CONFIG_DIR"));
        assert_eq!(loader.options().suffix(), None);

        let loader = secrets_loader(|o| o);
        assert_eq!(loader.options().radix(), "secrets");
        assert_eq!(loader.options().suffix(), Some("dec"));

        let loader = loader_for_test(|o| o);
        assert!(loader.options().search_parent_dir());
        assert!(!loader.options().watch());
    }

    #[test]
    fn test_customize_overrides_preset() {
        let loader = secrets_loader(|o| o.with_radix("vault"));
        assert_eq!(loader.options().radix(), "vault");
        assert_eq!(loader.options().suffix(), Some("dec"));
        assert_eq!(loader_with_secrets(|o| o).len(), 2);
    }

    #[test]
    fn test_load_with_secrets() {
        let dir = tempdir().unwrap();
        write(dir.path(), "config.yaml", "db:\n  host: localhost\n  password: changeme\n");
        write(dir.path(), "secrets.yaml", "db:\n  password: encrypted\n");
        write(dir.path(), "config.d/qa/secrets.yaml.dec", "db:\n  password: hunter2\n");

        let base = dir.path().to_path_buf();
        let registry = load_with_secrets("qa", |o| {
            o.with_base_path(&base)
                .with_base_path_from_env_var("DRAGON_PRESETS_TEST_UNSET")
                .with_mute(true)
        })
        .unwrap();

        assert_eq!(registry.get_string("db.host").as_deref(), Some("localhost"));
        assert_eq!(registry.get_string("db.password").as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_load_single() {
        let dir = tempdir().unwrap();
        write(dir.path(), "config.json", r#"{"name": "svc"}"#);

        let base = dir.path().to_path_buf();
        let registry = load("", |o| {
            o.with_base_path(&base)
                .with_base_path_from_env_var("DRAGON_PRESETS_TEST_UNSET")
                .with_mute(true)
        })
        .unwrap();
        assert_eq!(registry.get_string("name").as_deref(), Some("svc"));
    }
}
