//! Application context handed to command handlers.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crate::config::Registry;
use crate::Error;

/// Values keyed by their type, at most one per type.
#[derive(Default)]
pub(crate) struct Dependencies(HashMap<TypeId, Box<dyn Any + Send + Sync>>);

impl Dependencies {
    pub(crate) fn insert<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.0
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    /// Moves every entry of `other` in, replacing entries of the same type.
    pub(crate) fn extend(&mut self, other: Dependencies) {
        self.0.extend(other.0);
    }

    fn get<T: Any>(&self) -> Option<&T> {
        self.0.get(&TypeId::of::<T>())?.downcast_ref()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependencies({})", self.len())
    }
}

/// Configuration plus shared dependencies, passed explicitly to handlers.
///
/// ## Example
///
/// ```
/// use dragon_cli::{AppContext, Registry};
///
/// struct Db(&'static str);
///
/// let mut config = Registry::new();
/// config.set("db.url", "postgres://localhost");
///
/// let ctx = AppContext::builder()
///     .with_config(config)
///     .with_dependency(Db("primary"))
///     .build()?;
///
/// assert_eq!(ctx.config().get_string("db.url").as_deref(), Some("postgres://localhost"));
/// assert_eq!(ctx.get::<Db>().map(|db| db.0), Some("primary"));
/// # Ok::<(), dragon_cli::Error>(())
/// ```
#[derive(Debug)]
pub struct AppContext {
    config: Registry,
    dependencies: Dependencies,
}

impl AppContext {
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::default()
    }

    pub fn config(&self) -> &Registry {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Registry {
        &mut self.config
    }

    /// Returns the dependency of type `T`, if one was registered.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.dependencies.get()
    }

    /// Returns the dependency of type `T`, or a value built by `default`.
    pub fn get_or_else<T: Any + Clone>(&self, default: impl FnOnce() -> T) -> Cow<'_, T> {
        match self.get::<T>() {
            Some(value) => Cow::Borrowed(value),
            None => Cow::Owned(default()),
        }
    }

    /// Registers `value`, returning the previous dependency of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.dependencies.insert(value)
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    config: Option<Registry>,
    dependencies: Dependencies,
}

impl AppContextBuilder {
    pub fn with_config(mut self, config: Registry) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a dependency. A later one of the same type replaces it.
    pub fn with_dependency<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.dependencies.insert(value);
        self
    }

    pub(crate) fn with_dependencies(mut self, dependencies: Dependencies) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    /// Builds the `AppContext`.
    ///
    /// Returns an error if no configuration was provided.
    pub fn build(self) -> Result<AppContext, Error> {
        Ok(AppContext {
            config: self.config.ok_or(Error::MissingConfig)?,
            dependencies: self.dependencies,
        })
    }
}
