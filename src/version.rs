//! Build metadata.

use std::fmt;

use serde::Serialize;

/// Version, commit and build date of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: String,
    pub commit: String,
    pub date: String,
}

impl BuildInfo {
    /// Uses `commit` and `date` as stamped by a release build. Without a build
    /// date, commit and date are reported as unknown.
    pub fn resolve(version: &str, commit: Option<&str>, date: Option<&str>) -> Self {
        match date.filter(|d| !d.is_empty()) {
            Some(date) => Self {
                version: version.to_string(),
                commit: commit.filter(|c| !c.is_empty()).unwrap_or("?").to_string(),
                date: date.to_string(),
            },
            None => Self {
                version: version.to_string(),
                commit: "unknown".to_string(),
                date: "(unknown)".to_string(),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (commit {}, built {})", self.version, self.commit, self.date)
    }
}

/// [`BuildInfo`] of the calling crate.
///
/// The version is the package version; commit and date come from the
/// `BUILD_COMMIT` and `BUILD_DATE` variables at compile time.
///
/// ```
/// let info = dragon_cli::build_info!();
/// assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
/// ```
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::version::BuildInfo::resolve(
            env!("CARGO_PKG_VERSION"),
            option_env!("BUILD_COMMIT"),
            option_env!("BUILD_DATE"),
        )
    };
}
