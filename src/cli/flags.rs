use std::collections::BTreeMap;
use std::fmt;

use clap::{Arg, ArgAction};

use crate::flag::{FlagValue, Flaggable, SliceValue, Value};

/// A flag declared on a [`Command`](super::Command).
///
/// ```
/// use dragon_cli::cli::FlagSpec;
/// use dragon_cli::flag::Value;
/// use std::time::Duration;
///
/// let mut timeout = Duration::ZERO;
/// let flag = FlagSpec::new("timeout", "request timeout", Value::bound(&mut timeout, Duration::from_secs(5)))
///     .short('t')
///     .bind("http.timeout");
/// assert_eq!(flag.name(), "timeout");
/// ```
pub struct FlagSpec<'a> {
    pub(crate) name: String,
    pub(crate) usage: String,
    pub(crate) short: Option<char>,
    pub(crate) required: bool,
    pub(crate) persistent: bool,
    pub(crate) key: Option<String>,
    pub(crate) value: Box<dyn FlagValue + 'a>,
}

impl<'a> FlagSpec<'a> {
    pub fn new(name: impl Into<String>, usage: impl Into<String>, value: impl FlagValue + 'a) -> Self {
        Self {
            name: name.into(),
            usage: usage.into(),
            short: None,
            required: false,
            persistent: false,
            key: None,
            value: Box::new(value),
        }
    }

    /// A scalar flag owning its value.
    pub fn value<T: Flaggable + 'a>(
        name: impl Into<String>,
        default: T,
        usage: impl Into<String>,
    ) -> Self {
        Self::new(name, usage, Value::new(default))
    }

    /// A slice flag owning its values.
    pub fn slice<T: Flaggable + 'a>(
        name: impl Into<String>,
        default: Vec<T>,
        usage: impl Into<String>,
    ) -> Self {
        Self::new(name, usage, SliceValue::new(default))
    }

    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Makes the flag available to every subcommand as well.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Binds the flag to a config key.
    #[must_use]
    pub fn bind(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn to_arg(&self) -> Arg {
        let default = self.value.to_string();
        let help = if default.is_empty() || default == "[]" {
            self.usage.clone()
        } else {
            format!("{} [default: {default}]", self.usage)
        };

        // clap rejects required global args, so those are checked after parsing
        let mut arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .help(help)
            .value_name(self.value.type_name())
            .value_parser(clap::value_parser!(String))
            .action(ArgAction::Append)
            .required(self.required && !self.persistent)
            .global(self.persistent);

        if let Some(short) = self.short {
            arg = arg.short(short);
        }

        match self.value.no_opt_default() {
            Some(missing) => arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value(missing),
            None => arg.num_args(1),
        }
    }
}

impl fmt::Debug for FlagSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSpec")
            .field("name", &self.name)
            .field("type", &self.value.type_name())
            .field("value", &self.value.to_string())
            .field("persistent", &self.persistent)
            .field("key", &self.key)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct ParsedFlag {
    elements: Vec<String>,
    changed: bool,
}

/// Final values of the flags of every command on the executed path.
///
/// Values are kept in textual form and parsed again on access, so any
/// [`Flaggable`] type matching the declared one can read them back.
#[derive(Debug, Clone, Default)]
pub struct ParsedFlags {
    flags: BTreeMap<String, ParsedFlag>,
}

impl ParsedFlags {
    pub(crate) fn record(&mut self, name: &str, value: &dyn FlagValue) {
        self.flags.insert(
            name.to_string(),
            ParsedFlag {
                elements: value.elements(),
                changed: value.is_changed(),
            },
        );
    }

    /// Value of a scalar flag, or `None` if unknown or not a `T`.
    pub fn get<T: Flaggable>(&self, name: &str) -> Option<T> {
        let flag = self.flags.get(name)?;
        match flag.elements.as_slice() {
            [single] => T::parse_flag(single).ok(),
            _ => None,
        }
    }

    /// Values of a slice flag, or `None` if unknown or not made of `T`.
    pub fn get_slice<T: Flaggable>(&self, name: &str) -> Option<Vec<T>> {
        self.flags
            .get(name)?
            .elements
            .iter()
            .map(|e| T::parse_flag(e).ok())
            .collect()
    }

    /// Whether the flag was given on the command line.
    pub fn is_changed(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(|f| f.changed)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }
}
