use std::fmt;

use super::csv::{read_record, write_record};
use super::{FlagError, FlagValue, Flaggable, SliceFlagValue, Slot};

/// Slice flag value for any [`Flaggable`] element type.
///
/// The first [`set`](FlagValue::set) replaces the default contents; each later
/// one appends, so `--tag a,b --tag c` yields `[a, b, c]`. Every call parses all
/// of its tokens before touching the stored sequence.
#[derive(Debug)]
pub struct SliceValue<'a, T> {
    slot: Slot<'a, Vec<T>>,
    changed: bool,
}

impl<'a, T: Flaggable> SliceValue<'a, T> {
    pub fn new(default: Vec<T>) -> Self {
        Self {
            slot: Slot::Owned(default),
            changed: false,
        }
    }

    /// Creates a flag writing through `storage`, which is reset to `default`.
    pub fn bound(storage: &'a mut Vec<T>, default: Vec<T>) -> Self {
        *storage = default;
        Self {
            slot: Slot::Borrowed(storage),
            changed: false,
        }
    }

    pub fn get(&self) -> &[T] {
        self.slot.get()
    }

    fn parse_all(texts: &[String]) -> Result<Vec<T>, FlagError> {
        texts.iter().map(|text| T::parse_flag(text)).collect()
    }
}

fn strip_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '\'' | '`'))
        .collect()
}

impl<T: Flaggable> fmt::Display for SliceValue<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", write_record(&self.get_slice()))
    }
}

impl<T: Flaggable> FlagValue for SliceValue<'_, T> {
    fn set(&mut self, text: &str) -> Result<(), FlagError> {
        let tokens = read_record(&strip_quotes(text))?;
        let parsed = Self::parse_all(&tokens)?;

        let values = self.slot.get_mut();
        if self.changed {
            values.extend(parsed);
        } else {
            *values = parsed;
            self.changed = true;
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        T::SLICE_TYPE_NAME
    }

    fn is_changed(&self) -> bool {
        self.changed
    }

    fn to_config(&self) -> serde_json::Value {
        serde_json::Value::Array(self.get().iter().map(Flaggable::to_config).collect())
    }

    fn elements(&self) -> Vec<String> {
        self.get_slice()
    }
}

impl<T: Flaggable> SliceFlagValue for SliceValue<'_, T> {
    fn append(&mut self, text: &str) -> Result<(), FlagError> {
        let value = T::parse_flag(text)?;
        self.slot.get_mut().push(value);
        Ok(())
    }

    fn replace(&mut self, texts: &[String]) -> Result<(), FlagError> {
        let parsed = Self::parse_all(texts)?;
        *self.slot.get_mut() = parsed;
        Ok(())
    }

    fn get_slice(&self) -> Vec<String> {
        self.get().iter().map(Flaggable::format_flag).collect()
    }
}
