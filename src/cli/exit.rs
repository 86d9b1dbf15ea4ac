//! Top-level error reporting.

use std::io::{self, Write};

use crate::Error;

/// Writes `error: {err}` to `out` and returns the exit status for `err`.
///
/// Command-line parse errors keep clap's own status.
pub fn report(err: &Error, mut out: impl Write) -> i32 {
    match err {
        Error::Cli(e) => {
            let _ = write!(out, "{}", e.render());
            e.exit_code()
        }
        other => {
            let _ = writeln!(out, "error: {other}");
            1
        }
    }
}

/// Unwraps `result`, or reports the error and exits the process.
///
/// Help and version requests print to stdout and exit successfully.
///
/// ```no_run
/// use dragon_cli::cli::{exit_on_error, Command};
///
/// fn main() {
///     let app = Command::new("app").run(|_, _| Ok(()));
///     exit_on_error(app.execute());
/// }
/// ```
pub fn exit_on_error<T>(result: Result<T, Error>) -> T {
    match result {
        Ok(value) => value,
        Err(Error::Cli(e)) => e.exit(),
        Err(err) => {
            let code = report(&err, io::stderr().lock());
            std::process::exit(code)
        }
    }
}
