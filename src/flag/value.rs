use std::fmt;

use super::{FlagError, FlagValue, Flaggable, Slot};

/// Scalar flag value for any [`Flaggable`] type.
#[derive(Debug)]
pub struct Value<'a, T> {
    slot: Slot<'a, T>,
    changed: bool,
}

impl<'a, T: Flaggable> Value<'a, T> {
    /// Creates a flag owning its value, initialised to `default`.
    pub fn new(default: T) -> Self {
        Self {
            slot: Slot::Owned(default),
            changed: false,
        }
    }

    /// Creates a flag writing through `storage`, which is reset to `default`.
    pub fn bound(storage: &'a mut T, default: T) -> Self {
        *storage = default;
        Self {
            slot: Slot::Borrowed(storage),
            changed: false,
        }
    }

    pub fn get(&self) -> &T {
        self.slot.get()
    }
}

impl<T: Flaggable> fmt::Display for Value<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get().format_flag())
    }
}

impl<T: Flaggable> FlagValue for Value<'_, T> {
    fn set(&mut self, text: &str) -> Result<(), FlagError> {
        let parsed = T::parse_flag(text)?;
        *self.slot.get_mut() = parsed;
        self.changed = true;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn no_opt_default(&self) -> Option<&'static str> {
        T::NO_OPT_DEFAULT
    }

    fn is_changed(&self) -> bool {
        self.changed
    }

    fn to_config(&self) -> serde_json::Value {
        self.get().to_config()
    }
}
