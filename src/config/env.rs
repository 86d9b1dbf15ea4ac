use serde_json::Value;

/// Name of the environment variable consulted for `key`.
///
/// `log.level` becomes `LOG_LEVEL`, or `APP_LOG_LEVEL` with prefix `app`.
pub(crate) fn env_key(prefix: Option<&str>, key: &str) -> String {
    let name: String = key
        .chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect();

    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}_{name}", prefix.to_ascii_uppercase()),
        _ => name,
    }
}

/// Reads the variable for `key`. Unset and empty variables are both absent.
pub(crate) fn lookup(prefix: Option<&str>, key: &str) -> Option<String> {
    std::env::var(env_key(prefix, key))
        .ok()
        .filter(|value| !value.is_empty())
}

/// Returns the value of the environment variable `key`, or `default` when it
/// is unset or empty.
pub fn getenv_or_default(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Converts a raw environment string to the most specific value:
/// boolean, integer, float, or string (fallback).
pub(crate) fn coerce_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::from(i);
        }
    }

    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return Value::from(f);
            }
        }
    }

    Value::String(s.to_string())
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
