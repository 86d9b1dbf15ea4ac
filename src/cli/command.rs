use std::any::Any;
use std::ffi::OsString;
use std::fmt;

use clap::error::ErrorKind;
use clap::ArgMatches;
use serde_json::Value;
use tracing::debug;

use super::flags::{FlagSpec, ParsedFlags};
use crate::config::Registry;
use crate::context::{AppContext, Dependencies};
use crate::version::BuildInfo;
use crate::Error;

type Handler<'a> = Box<dyn Fn(&AppContext, &ParsedFlags) -> Result<(), Error> + 'a>;

/// A node of the command tree.
///
/// Flags are declared with [`FlagSpec`]; flags bound to a config key feed the
/// command's [`Registry`], so command-line values and file values share one
/// namespace. The handler of the selected command receives an [`AppContext`]
/// holding that registry and every dependency registered along the path.
///
/// ## Example
///
/// ```
/// use dragon_cli::cli::{Command, FlagSpec};
/// use dragon_cli::Registry;
///
/// let mut config = Registry::new();
/// config.set_default("server.port", 80);
///
/// let app = Command::new("app")
///     .with_config(config)
///     .with_flag(FlagSpec::value("verbose", false, "chatty output").persistent())
///     .with_subcommand(
///         Command::new("serve")
///             .with_flag(FlagSpec::value("port", 8080u16, "listen port").bind("server.port"))
///             .run(|ctx, flags| {
///                 assert_eq!(ctx.config().get_i64("server.port"), Some(9090));
///                 assert_eq!(flags.get::<bool>("verbose"), Some(true));
///                 Ok(())
///             }),
///     );
///
/// app.execute_from(["app", "serve", "--port", "9090", "--verbose"])?;
/// # Ok::<(), dragon_cli::Error>(())
/// ```
pub struct Command<'a> {
    name: String,
    about: Option<String>,
    version: Option<String>,
    config: Option<Registry>,
    dependencies: Dependencies,
    flags: Vec<FlagSpec<'a>>,
    bindings: Vec<(String, String)>,
    subcommands: Vec<Command<'a>>,
    handler: Option<Handler<'a>>,
}

impl<'a> Command<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            version: None,
            config: None,
            dependencies: Dependencies::default(),
            flags: Vec::new(),
            bindings: Vec::new(),
            subcommands: Vec::new(),
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Wires `--version` to print `version`.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Wires `--version` to print `info` as JSON.
    ///
    /// Pass [`build_info!()`](crate::build_info) to describe the calling crate.
    #[must_use]
    pub fn with_auto_version(self, info: BuildInfo) -> Self {
        let rendered = info.to_json();
        self.with_version(rendered)
    }

    /// Config registry shared with subcommands. A subcommand's own config
    /// replaces it for that subtree.
    #[must_use]
    pub fn with_config(mut self, config: Registry) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a dependency available to this command and its subcommands.
    #[must_use]
    pub fn with_dependency<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.dependencies.insert(value);
        self
    }

    #[must_use]
    pub fn with_flag(mut self, flag: FlagSpec<'a>) -> Self {
        self.flags.push(flag);
        self
    }

    /// Binds already declared flags to config keys, as `(flag name, key)` pairs.
    #[must_use]
    pub fn with_flag_bindings<I, N, K>(mut self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (N, K)>,
        N: Into<String>,
        K: Into<String>,
    {
        self.bindings
            .extend(bindings.into_iter().map(|(n, k)| (n.into(), k.into())));
        self
    }

    #[must_use]
    pub fn with_subcommand(mut self, sub: Command<'a>) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Sets the handler invoked when this command is selected.
    #[must_use]
    pub fn run<F>(mut self, handler: F) -> Self
    where
        F: Fn(&AppContext, &ParsedFlags) -> Result<(), Error> + 'a,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn subcommands(&self) -> &[Command<'a>] {
        &self.subcommands
    }

    pub fn config(&self) -> Option<&Registry> {
        self.config.as_ref()
    }

    /// Builds the clap description of this subtree.
    pub fn to_clap(&self) -> clap::Command {
        let mut cmd = clap::Command::new(self.name.clone());
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        if let Some(version) = &self.version {
            cmd = cmd.version(version.clone());
        }
        for flag in &self.flags {
            cmd = cmd.arg(flag.to_arg());
        }
        for sub in &self.subcommands {
            cmd = cmd.subcommand(sub.to_clap());
        }
        cmd
    }

    /// Runs with the process arguments.
    pub fn execute(self) -> Result<(), Error> {
        self.execute_from(std::env::args_os())
    }

    /// Parses `args`, the first being the program name, and runs the
    /// selected command.
    pub fn execute_from<I, T>(self, args: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.to_clap().try_get_matches_from(args)?;
        self.dispatch(&matches, Selection::default())
    }

    fn dispatch(self, matches: &ArgMatches, mut selection: Selection<'a>) -> Result<(), Error> {
        let Command {
            name,
            config,
            dependencies,
            mut flags,
            bindings,
            subcommands,
            handler,
            ..
        } = self;

        if config.is_some() {
            selection.config = config;
        }
        selection.dependencies.extend(dependencies);

        for (flag_name, key) in bindings {
            if let Some(flag) = flags.iter_mut().find(|f| f.name == flag_name) {
                flag.key = Some(key);
            }
        }

        for mut flag in flags {
            if flag.persistent {
                selection.persistent.push(flag);
            } else {
                apply(&mut flag, matches)?;
                selection.settle(flag);
            }
        }

        if let Some((sub_name, sub_matches)) = matches.subcommand() {
            if let Some(sub) = subcommands.into_iter().find(|c| c.name == sub_name) {
                return sub.dispatch(sub_matches, selection);
            }
        }

        // global args are propagated down to the selected command's matches
        for mut flag in std::mem::take(&mut selection.persistent) {
            apply(&mut flag, matches)?;
            if flag.required && !flag.value.is_changed() {
                return Err(clap::Error::raw(
                    ErrorKind::MissingRequiredArgument,
                    format!(
                        "the following required argument was not provided: --{}\n",
                        flag.name
                    ),
                )
                .into());
            }
            selection.settle(flag);
        }

        let handler = handler.ok_or_else(|| Error::NoHandler(name.clone()))?;
        let (ctx, parsed) = selection.finish()?;
        debug!(command = %name, "running command");
        handler(&ctx, &parsed)
    }
}

/// Feeds every occurrence of the flag on the command line to its value.
fn apply(flag: &mut FlagSpec<'_>, matches: &ArgMatches) -> Result<(), Error> {
    let Ok(Some(occurrences)) = matches.try_get_occurrences::<String>(&flag.name) else {
        return Ok(());
    };
    for text in occurrences.flatten() {
        flag.value.set(text).map_err(|source| Error::Flag {
            name: flag.name.clone(),
            source,
        })?;
    }
    Ok(())
}

/// State accumulated from the root to the selected command.
#[derive(Default)]
struct Selection<'a> {
    config: Option<Registry>,
    dependencies: Dependencies,
    persistent: Vec<FlagSpec<'a>>,
    parsed: ParsedFlags,
    bound: Vec<(String, Value, bool)>,
}

impl<'a> Selection<'a> {
    fn settle(&mut self, flag: FlagSpec<'a>) {
        if let Some(key) = &flag.key {
            self.bound
                .push((key.clone(), flag.value.to_config(), flag.value.is_changed()));
        }
        self.parsed.record(&flag.name, flag.value.as_ref());
    }

    fn finish(self) -> Result<(AppContext, ParsedFlags), Error> {
        let mut config = self.config.unwrap_or_default();
        for (key, value, changed) in self.bound {
            config.bind_flag(&key, value, changed);
        }

        let ctx = AppContext::builder()
            .with_config(config)
            .with_dependencies(self.dependencies)
            .build()?;
        Ok((ctx, self.parsed))
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

impl Command<'_> {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:depth$}{}", "", self.name)?;
        for sub in &self.subcommands {
            writeln!(f)?;
            sub.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("subcommands", &self.subcommands)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
