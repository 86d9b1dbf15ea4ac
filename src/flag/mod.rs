//! Typed command-line flag values.
//!
//! [`Value`] adapts any [`Flaggable`] type into a [`FlagValue`]: something a
//! command-line parser can feed text into and render back for help output.
//! [`SliceValue`] does the same for `Vec<T>`, reading comma-separated input and
//! accumulating across repeated occurrences of the flag.
//!
//! Both adapters either own their storage or write through a caller-provided
//! `&mut` reference:
//!
//! ```
//! use dragon_cli::flag::{FlagValue, SliceValue, Value};
//! use std::time::Duration;
//!
//! let mut timeout = Duration::ZERO;
//! {
//!     let mut flag = Value::bound(&mut timeout, Duration::from_secs(5));
//!     flag.set("1m30s")?;
//! }
//! assert_eq!(timeout, Duration::from_secs(90));
//!
//! let mut tags = SliceValue::new(vec!["default".to_string()]);
//! tags.set("a,b")?;
//! tags.set("c")?;
//! assert_eq!(tags.to_string(), "[a,b,c]");
//! # Ok::<(), dragon_cli::flag::FlagError>(())
//! ```

mod csv;
mod error;
pub mod extensions;
mod slice;
mod types;
mod value;

use std::fmt;

pub use error::FlagError;
pub use slice::SliceValue;
pub use types::{format_duration, parse_duration, Flaggable, IpMask, IpNet};
pub use value::Value;

/// A flag value driven from command-line text.
///
/// `Display` renders the current value in the same textual form `set` accepts.
pub trait FlagValue: fmt::Display {
    /// Parses `text` and stores the result. Storage is untouched on error.
    fn set(&mut self, text: &str) -> Result<(), FlagError>;

    /// Type tag used for help output.
    fn type_name(&self) -> &'static str;

    /// Text assumed when the flag is given without an argument.
    fn no_opt_default(&self) -> Option<&'static str> {
        None
    }

    /// Whether `set` has succeeded at least once.
    fn is_changed(&self) -> bool;

    /// Current value as a config registry value.
    fn to_config(&self) -> serde_json::Value;

    /// Textual form of each element held: a single one for scalar flags.
    fn elements(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

/// A flag value holding a sequence.
pub trait SliceFlagValue: FlagValue {
    /// Parses one element and appends it.
    fn append(&mut self, text: &str) -> Result<(), FlagError>;

    /// Parses every element and replaces the whole sequence.
    fn replace(&mut self, texts: &[String]) -> Result<(), FlagError>;

    /// Textual form of each element.
    fn get_slice(&self) -> Vec<String>;
}

#[derive(Debug)]
enum Slot<'a, T> {
    Owned(T),
    Borrowed(&'a mut T),
}

impl<T> Slot<'_, T> {
    fn get(&self) -> &T {
        match self {
            Slot::Owned(value) => value,
            Slot::Borrowed(value) => value,
        }
    }

    fn get_mut(&mut self) -> &mut T {
        match self {
            Slot::Owned(value) => value,
            Slot::Borrowed(value) => value,
        }
    }
}
