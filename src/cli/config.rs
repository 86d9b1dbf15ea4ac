//! Config loading entry points for command-line programs.

use std::io;

use tracing::warn;

use crate::config::{presets, Options, Registry};
use crate::Error;

/// Variable naming the environment loaded by [`config`].
pub const CONFIG_ENV: &str = "CONFIG_ENV";

/// When set and non-empty, loaded settings are dumped to stdout as JSON.
pub const DEBUG_CONFIG_ENV: &str = "DEBUG_CONFIG";

/// A function filling in defaults after loading.
pub type Defaulter<'a> = &'a dyn Fn(&mut Registry);

/// Loads config and secrets files for `env`, then applies `defaulters` in order.
///
/// The base path comes from `CONFIG_DIR` unless `customize` says otherwise.
pub fn config_for_env(
    env: &str,
    customize: impl Fn(Options) -> Options,
    defaulters: &[Defaulter<'_>],
) -> Result<Registry, Error> {
    let mut registry = presets::load_with_secrets(env, customize)?;
    for defaulter in defaulters {
        defaulter(&mut registry);
    }

    if wants_debug() {
        if let Err(err) = registry.dump(io::stdout().lock()) {
            warn!(error = %err, "failed to dump config");
        }
    }

    Ok(registry)
}

/// Like [`config_for_env`], with the environment name read from `CONFIG_ENV`.
pub fn config(
    customize: impl Fn(Options) -> Options,
    defaulters: &[Defaulter<'_>],
) -> Result<Registry, Error> {
    let env = presets::getenv_or_default(CONFIG_ENV, "");
    config_for_env(&env, customize, defaulters)
}

fn wants_debug() -> bool {
    std::env::var_os(DEBUG_CONFIG_ENV).is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_for_env_applies_defaulters() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "app:\n  name: svc\n").unwrap();
        fs::create_dir_all(dir.path().join("config.d/prod")).unwrap();
        fs::write(
            dir.path().join("config.d/prod/secrets.json"),
            r#"{"app": {"token": "s3cr3t"}}"#,
        )
        .unwrap();

        let base = dir.path().to_path_buf();
        let customize = |o: Options| {
            o.with_base_path(&base)
                .with_base_path_from_env_var("DRAGON_CLI_CONFIG_TEST_UNSET")
                .with_mute(true)
        };
        let set_port: Defaulter<'_> = &|r: &mut Registry| r.set_default("app.port", 8080);
        let rename: Defaulter<'_> = &|r: &mut Registry| r.set_default("app.name", "ignored");

        let registry = config_for_env("prod", customize, &[set_port, rename]).unwrap();
        assert_eq!(registry.get_string("app.name").as_deref(), Some("svc"));
        assert_eq!(registry.get_string("app.token").as_deref(), Some("s3cr3t"));
        assert_eq!(registry.get_i64("app.port"), Some(8080));
    }

    #[test]
    fn test_config_for_env_reports_errors() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "[1, 2]").unwrap();

        let base = dir.path().to_path_buf();
        let err = config_for_env(
            "",
            |o| {
                o.with_base_path(&base)
                    .with_base_path_from_env_var("DRAGON_CLI_CONFIG_TEST_UNSET")
                    .with_mute(true)
            },
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
