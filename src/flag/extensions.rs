//! Flag types beyond the built-in set.

use std::fmt;

use super::{FlagError, FlagValue, Flaggable, Slot};

/// A byte count written in human-readable form, e.g. `"10MB"` or `"1.5KiB"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSize(pub u64);

const DECIMAL_UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

impl ByteSize {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut size = self.0 as f64;
        let mut unit = 0;
        while size >= 1000.0 && unit < DECIMAL_UNITS.len() - 1 {
            size /= 1000.0;
            unit += 1;
        }
        write!(f, "{}{}", significant(size, 4), DECIMAL_UNITS[unit])
    }
}

/// Formats `value` with at most `digits` significant digits, dropping trailing zeros.
fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32 + 1;
    let decimals = (digits - magnitude).max(0) as usize;
    let rendered = format!("{value:.decimals$}");
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        rendered
    }
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => 1_000,
        "m" | "mb" => 1_000_000,
        "g" | "gb" => 1_000_000_000,
        "t" | "tb" => 1_000_000_000_000,
        "p" | "pb" => 1_000_000_000_000_000,
        "ki" | "kib" => 1 << 10,
        "mi" | "mib" => 1 << 20,
        "gi" | "gib" => 1 << 30,
        "ti" | "tib" => 1 << 40,
        "pi" | "pib" => 1 << 50,
        _ => return None,
    };
    Some(multiplier)
}

impl Flaggable for ByteSize {
    const TYPE_NAME: &'static str = "byteSize";
    const SLICE_TYPE_NAME: &'static str = "byteSizeSlice";

    fn parse_flag(text: &str) -> Result<Self, FlagError> {
        let fail = |reason: &str| FlagError::parse(text, "byteSize", reason);

        let trimmed = text.trim();
        let number_len = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(number_len);
        if number.is_empty() {
            return Err(fail("expected a number"));
        }

        let amount: f64 = number.parse().map_err(|_| fail("invalid number"))?;
        let multiplier =
            unit_multiplier(unit.strip_prefix(' ').unwrap_or(unit)).ok_or_else(|| fail("unknown unit"))?;

        let bytes = amount * multiplier as f64;
        if !bytes.is_finite() || bytes > u64::MAX as f64 {
            return Err(fail("size too large"));
        }
        Ok(Self(bytes as u64))
    }

    fn format_flag(&self) -> String {
        self.to_string()
    }

    fn to_config(&self) -> serde_json::Value {
        serde_json::Value::from(self.0)
    }
}

/// An integer flag incremented each time it appears without an argument.
///
/// `-v -v -v` yields 3; `--verbose=5` sets the count outright.
#[derive(Debug)]
pub struct CountValue<'a> {
    slot: Slot<'a, i64>,
    changed: bool,
}

const INCREMENT: &str = "+1";

impl<'a> CountValue<'a> {
    pub fn new(default: i64) -> Self {
        Self {
            slot: Slot::Owned(default),
            changed: false,
        }
    }

    pub fn bound(storage: &'a mut i64, default: i64) -> Self {
        *storage = default;
        Self {
            slot: Slot::Borrowed(storage),
            changed: false,
        }
    }

    pub fn get(&self) -> i64 {
        *self.slot.get()
    }
}

impl fmt::Display for CountValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl FlagValue for CountValue<'_> {
    fn set(&mut self, text: &str) -> Result<(), FlagError> {
        let count = self.slot.get_mut();
        if text == INCREMENT {
            *count = count.saturating_add(1);
        } else {
            *count = i64::parse_flag(text)?;
        }
        self.changed = true;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "count"
    }

    fn no_opt_default(&self) -> Option<&'static str> {
        Some(INCREMENT)
    }

    fn is_changed(&self) -> bool {
        self.changed
    }

    fn to_config(&self) -> serde_json::Value {
        serde_json::Value::from(self.get())
    }
}
