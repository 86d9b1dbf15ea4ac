//! Merged key-value configuration store.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::env::{coerce_value, lookup};
use super::ConfigError;
use crate::flag::{parse_duration, Flaggable};

/// Resolved configuration: files merged together, with environment variables,
/// bound flags, defaults and explicit overrides layered on top.
///
/// Keys are dot-separated paths into nested maps (`"log.level"`) and are
/// case-insensitive. Lookups consult, from highest to lowest precedence:
///
/// 1. values given to [`set`](Self::set);
/// 2. bound flags that were changed on the command line;
/// 3. environment variables, once [`automatic_env`](Self::automatic_env) is on;
/// 4. merged config files;
/// 5. values given to [`set_default`](Self::set_default);
/// 6. default values of bound flags that were not changed.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    overrides: Map<String, Value>,
    flags: Map<String, Value>,
    config: Map<String, Value>,
    defaults: Map<String, Value>,
    flag_defaults: Map<String, Value>,
    automatic_env: bool,
    env_prefix: Option<String>,
    config_file: Option<PathBuf>,
    watched_file: Option<PathBuf>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-merges `map` into the config layer. Incoming keys win; nested
    /// maps are merged recursively, everything else is replaced.
    pub fn merge_config_map(&mut self, map: Map<String, Value>) {
        deep_merge(&mut self.config, lowercase_keys(map));
    }

    /// Sets the value used when no other layer provides `key`.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        insert_at_path(&mut self.defaults, &split_key(key), value.into());
    }

    /// Sets a value that takes precedence over every other layer.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        insert_at_path(&mut self.overrides, &split_key(key), value.into());
    }

    /// Binds a command-line flag value to `key`.
    ///
    /// A changed flag overrides files and environment; an unchanged one only
    /// acts as a last-resort default.
    pub fn bind_flag(&mut self, key: &str, value: Value, changed: bool) {
        let layer = if changed {
            &mut self.flags
        } else {
            &mut self.flag_defaults
        };
        insert_at_path(layer, &split_key(key), value);
    }

    /// Turns on environment lookup for every key.
    pub fn automatic_env(&mut self) {
        self.automatic_env = true;
    }

    pub fn set_env_prefix(&mut self, prefix: impl Into<String>) {
        self.env_prefix = Some(prefix.into());
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let path = split_key(key);
        if path.iter().any(String::is_empty) {
            return None;
        }

        if let Some(value) = lookup_path(&self.overrides, &path) {
            return Some(value.clone());
        }
        if let Some(value) = lookup_path(&self.flags, &path) {
            return Some(value.clone());
        }
        if let Some(raw) = self.env_value(key) {
            return Some(Value::String(raw));
        }
        [&self.config, &self.defaults, &self.flag_defaults]
            .into_iter()
            .find_map(|layer| lookup_path(layer, &path))
            .cloned()
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|value| scalar_to_string(&value))
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(b),
            Value::String(s) => bool::parse_flag(s.trim()).ok(),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            _ => None,
        }
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => i64::parse_flag(s.trim()).ok(),
            Value::Bool(b) => Some(i64::from(b)),
            _ => None,
        }
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => u64::parse_flag(s.trim()).ok(),
            Value::Bool(b) => Some(u64::from(b)),
            _ => None,
        }
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Lists are returned element-wise; a string is split on whitespace.
    pub fn get_string_vec(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            Value::Array(items) => items.iter().map(scalar_to_string).collect(),
            Value::String(s) => Some(s.split_whitespace().map(str::to_string).collect()),
            _ => None,
        }
    }

    /// Strings are read as durations (`"1m30s"`); bare numbers count nanoseconds.
    pub fn get_duration(&self, key: &str) -> Option<Duration> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64().map(Duration::from_nanos),
            Value::String(s) => {
                let s = s.trim();
                if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                    s.parse().ok().map(Duration::from_nanos)
                } else {
                    parse_duration(s).ok()
                }
            }
            _ => None,
        }
    }

    /// Deserializes the value at `key`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(serde_json::from_value)
            .transpose()
            .map_err(ConfigError::DeserializeError)
    }

    /// Whether any layer other than unchanged flag defaults provides `key`.
    pub fn is_set(&self, key: &str) -> bool {
        let path = split_key(key);
        [&self.overrides, &self.flags, &self.config, &self.defaults]
            .into_iter()
            .any(|layer| lookup_path(layer, &path).is_some())
            || self.env_value(key).is_some()
    }

    /// All leaf keys known to any layer, sorted.
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for layer in self.layers() {
            collect_keys(layer, "", &mut keys);
        }
        keys.sort();
        keys.dedup();
        keys
    }

    /// Fully resolved nested map with every layer applied.
    pub fn all_settings(&self) -> Map<String, Value> {
        let mut merged = Map::new();
        for layer in [&self.flag_defaults, &self.defaults, &self.config] {
            deep_merge(&mut merged, layer.clone());
        }

        if self.automatic_env {
            for key in self.all_keys() {
                if let Some(raw) = self.env_value(&key) {
                    insert_at_path(&mut merged, &split_key(&key), coerce_value(&raw));
                }
            }
        }

        deep_merge(&mut merged, self.flags.clone());
        deep_merge(&mut merged, self.overrides.clone());
        merged
    }

    /// Extracts the section at `key` as a standalone registry.
    pub fn sub(&self, key: &str) -> Option<Registry> {
        match lookup_path(&self.all_settings(), &split_key(key))? {
            Value::Object(section) => {
                let mut sub = Registry::new();
                sub.config = section.clone();
                Some(sub)
            }
            _ => None,
        }
    }

    /// Deserializes the whole resolved configuration.
    ///
    /// ```
    /// use dragon_cli::Registry;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Settings {
    ///     port: u16,
    /// }
    ///
    /// let mut registry = Registry::new();
    /// registry.set_default("port", 8080);
    /// let settings: Settings = registry.unmarshal()?;
    /// assert_eq!(settings.port, 8080);
    /// # Ok::<(), dragon_cli::ConfigError>(())
    /// ```
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        serde_json::from_value(Value::Object(self.all_settings()))
            .map_err(ConfigError::DeserializeError)
    }

    /// Root config file the registry was loaded from, if any.
    pub fn config_file_used(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// File registered for change watching, if any.
    pub fn watched_file(&self) -> Option<&Path> {
        self.watched_file.as_deref()
    }

    pub(crate) fn set_config_file(&mut self, path: PathBuf) {
        self.config_file = Some(path);
    }

    pub(crate) fn watch_config(&mut self) {
        self.watched_file = self.config_file.clone();
    }

    /// Writes the resolved configuration as pretty-printed JSON.
    pub fn dump(&self, mut writer: impl io::Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, &self.all_settings())?;
        writeln!(writer)
    }

    fn layers(&self) -> [&Map<String, Value>; 5] {
        [
            &self.overrides,
            &self.flags,
            &self.config,
            &self.defaults,
            &self.flag_defaults,
        ]
    }

    fn env_value(&self, key: &str) -> Option<String> {
        if !self.automatic_env {
            return None;
        }
        lookup(self.env_prefix.as_deref(), key)
    }
}

fn split_key(key: &str) -> Vec<String> {
    key.to_lowercase().split('.').map(str::to_string).collect()
}

fn lookup_path<'a>(map: &'a Map<String, Value>, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = map.get(first)?;
    for part in rest {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Sets `value` at `path`, replacing whatever was there and creating
/// intermediate maps as needed.
fn insert_at_path(map: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        map.insert(first.clone(), value);
        return;
    }

    if !matches!(map.get(first), Some(Value::Object(_))) {
        map.insert(first.clone(), Value::Object(Map::new()));
    }

    if let Some(Value::Object(nested)) = map.get_mut(first) {
        insert_at_path(nested, rest, value);
    }
}

fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                deep_merge(base_map, overlay_map);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn lowercase_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Object(nested) => Value::Object(lowercase_keys(nested)),
                other => other,
            };
            (key.to_lowercase(), value)
        })
        .collect()
}

fn collect_keys(map: &Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (key, value) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => collect_keys(nested, &full, keys),
            _ => keys.push(full),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_merge_overlay_wins() {
        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({"k": "root", "log": {"level": "info", "format": "json"}})));
        registry.merge_config_map(map(json!({"k": "overlay", "log": {"level": "debug"}})));

        assert_eq!(registry.get_string("k").as_deref(), Some("overlay"));
        assert_eq!(registry.get_string("log.level").as_deref(), Some("debug"));
        assert_eq!(registry.get_string("log.format").as_deref(), Some("json"));
    }

    #[test]
    fn test_merge_keeps_keys_from_both_sides() {
        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({"x": 1, "y": 2})));
        registry.merge_config_map(map(json!({"y": 3, "z": 4})));

        assert_eq!(Value::Object(registry.all_settings()), json!({"x": 1, "y": 3, "z": 4}));
    }

    #[test]
    fn test_merge_replaces_lists_and_scalars_with_maps() {
        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({"hosts": ["a", "b"], "db": "sqlite"})));
        registry.merge_config_map(map(json!({"hosts": ["c"], "db": {"driver": "pg"}})));

        assert_eq!(registry.get_string_vec("hosts"), Some(vec!["c".to_string()]));
        assert_eq!(registry.get_string("db.driver").as_deref(), Some("pg"));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({"Server": {"HTTPPort": 80}})));

        assert_eq!(registry.get_i64("server.httpport"), Some(80));
        assert_eq!(registry.get_i64("SERVER.HttpPort"), Some(80));
    }

    #[test]
    fn test_layer_precedence() {
        let mut registry = Registry::new();
        registry.bind_flag("port", json!(1), false);
        assert_eq!(registry.get_i64("port"), Some(1));
        assert!(!registry.is_set("port"));

        registry.set_default("port", 2);
        assert_eq!(registry.get_i64("port"), Some(2));
        assert!(registry.is_set("port"));

        registry.merge_config_map(map(json!({"port": 3})));
        assert_eq!(registry.get_i64("port"), Some(3));

        registry.bind_flag("port", json!(4), true);
        assert_eq!(registry.get_i64("port"), Some(4));

        registry.set("port", 5);
        assert_eq!(registry.get_i64("port"), Some(5));
    }

    #[test]
    fn test_automatic_env_overrides_files() {
        std::env::set_var("DRAGON_REGISTRY_TEST_LOG_LEVEL", "warn");
        std::env::set_var("DRAGON_REGISTRY_TEST_RETRIES", "7");

        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({"log": {"level": "info"}, "retries": 1})));
        assert_eq!(registry.get_string("log.level").as_deref(), Some("info"));

        registry.set_env_prefix("dragon_registry_test");
        registry.automatic_env();
        assert_eq!(registry.get_string("log.level").as_deref(), Some("warn"));
        assert_eq!(registry.get_i64("retries"), Some(7));
        assert_eq!(
            Value::Object(registry.all_settings()),
            json!({"log": {"level": "warn"}, "retries": 7})
        );
    }

    #[test]
    fn test_env_below_changed_flags() {
        std::env::set_var("DRAGON_REGISTRY_FLAG_NAME", "from-env");

        let mut registry = Registry::new();
        registry.set_env_prefix("dragon_registry_flag");
        registry.automatic_env();
        registry.bind_flag("name", json!("flag-default"), false);
        assert_eq!(registry.get_string("name").as_deref(), Some("from-env"));

        registry.bind_flag("name", json!("from-flag"), true);
        assert_eq!(registry.get_string("name").as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_typed_getters_coerce_strings() {
        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({
            "enabled": "true",
            "count": "0x10",
            "ratio": "0.5",
            "timeout": "1m30s",
            "ticks": 1500,
            "tags": "a b  c",
            "nothing": null,
        })));

        assert_eq!(registry.get_bool("enabled"), Some(true));
        assert_eq!(registry.get_i64("count"), Some(16));
        assert_eq!(registry.get_u64("count"), Some(16));
        assert_eq!(registry.get_f64("ratio"), Some(0.5));
        assert_eq!(registry.get_duration("timeout"), Some(Duration::from_secs(90)));
        assert_eq!(registry.get_duration("ticks"), Some(Duration::from_nanos(1500)));
        assert_eq!(
            registry.get_string_vec("tags"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(registry.get_string("nothing").as_deref(), Some(""));
        assert_eq!(registry.get_string("missing"), None);
        assert_eq!(registry.get_bool("ratio"), None);
    }

    #[test]
    fn test_get_section_and_sub() {
        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({"db": {"host": "localhost", "port": 5432}})));
        registry.set("db.port", 6543);

        assert_eq!(registry.get_string("db"), None);
        let db = registry.sub("db").unwrap();
        assert_eq!(db.get_string("host").as_deref(), Some("localhost"));
        assert_eq!(db.get_i64("port"), Some(6543));
        assert!(registry.sub("db.host").is_none());
        assert!(registry.sub("missing").is_none());
    }

    #[test]
    fn test_all_keys() {
        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({"b": {"c": 1, "d": {}}, "a": true})));
        registry.set_default("e.f", "x");
        registry.set("a", false);

        assert_eq!(registry.all_keys(), vec!["a", "b.c", "b.d", "e.f"]);
    }

    #[test]
    fn test_get_as_and_unmarshal() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Db {
            host: String,
            port: u16,
        }

        #[derive(Debug, Deserialize)]
        struct Settings {
            db: Db,
            debug: bool,
        }

        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({"db": {"host": "h", "port": 1}})));
        registry.set_default("debug", true);

        let db: Option<Db> = registry.get_as("db").unwrap();
        assert_eq!(
            db,
            Some(Db {
                host: "h".into(),
                port: 1
            })
        );
        assert!(registry.get_as::<Db>("missing").unwrap().is_none());
        assert!(matches!(
            registry.get_as::<u16>("db.host"),
            Err(ConfigError::DeserializeError(_))
        ));

        let settings: Settings = registry.unmarshal().unwrap();
        assert!(settings.debug);
        assert_eq!(settings.db.port, 1);
    }

    #[test]
    fn test_empty_key_segments() {
        let mut registry = Registry::new();
        registry.merge_config_map(map(json!({"a": 1})));
        assert_eq!(registry.get(""), None);
        assert_eq!(registry.get("a."), None);
    }

    #[test]
    fn test_dump_writes_json() {
        let mut registry = Registry::new();
        registry.set("log.level", "debug");
        let mut out = Vec::new();
        registry.dump(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"log": {"level": "debug"}}));
    }
}
