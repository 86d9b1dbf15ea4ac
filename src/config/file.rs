//! Config file discovery and parsing.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::{Map, Value};
use walkdir::WalkDir;

use super::ConfigError;

/// Extensions tried, in order, when looking for a config file.
pub const CONFIG_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_extension(ext: &str) -> Self {
        match ext {
            "json" => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// A file found in an overlay directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub path: PathBuf,
    pub format: Format,
    pub suffixed: bool,
}

/// Matches overlay file names against `{radix}.{ext}` and `{radix}.*.{ext}`,
/// plus the same names ending in `.{suffix}` when a suffix is configured.
#[derive(Debug)]
pub(crate) struct NameMatcher {
    set: GlobSet,
    kinds: Vec<(Format, bool)>,
    tail: Option<String>,
}

impl NameMatcher {
    pub fn new(radix: &str, suffix: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        let mut kinds = Vec::new();

        let tail = suffix.filter(|s| !s.is_empty()).map(|s| format!(".{s}"));
        let suffixes = tail
            .clone()
            .map(|t| (t, true))
            .into_iter()
            .chain(std::iter::once((String::new(), false)));

        for (tail, suffixed) in suffixes {
            for ext in CONFIG_EXTENSIONS {
                for pattern in [
                    format!("{radix}.{ext}{tail}"),
                    format!("{radix}.*.{ext}{tail}"),
                ] {
                    let glob = Glob::new(&pattern)
                        .map_err(|source| ConfigError::InvalidPattern { pattern, source })?;
                    builder.add(glob);
                    kinds.push((Format::from_extension(ext), suffixed));
                }
            }
        }

        let set = builder.build().map_err(|source| ConfigError::InvalidPattern {
            pattern: radix.to_string(),
            source,
        })?;
        Ok(Self { set, kinds, tail })
    }

    /// Format and suffixed-ness of `file_name`, if it is a candidate.
    pub fn classify(&self, file_name: &str) -> Option<(Format, bool)> {
        let index = self.set.matches(file_name).into_iter().min()?;
        self.kinds.get(index).copied()
    }

    /// Path of the plain file a suffixed candidate stands in for.
    fn unsuffixed(&self, path: &Path) -> Option<PathBuf> {
        let tail = self.tail.as_deref()?;
        let name = path.file_name()?.to_str()?.strip_suffix(tail)?;
        Some(path.with_file_name(name))
    }
}

/// Reads `{base}/{radix}.{ext}` for the first extension that exists.
pub(crate) fn read_root(
    base: &Path,
    radix: &str,
) -> Result<Option<(PathBuf, Map<String, Value>)>, ConfigError> {
    for ext in CONFIG_EXTENSIONS {
        let path = base.join(format!("{radix}.{ext}"));
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let map = parse_document(&path, &contents, Format::from_extension(ext))?;
                return Ok(Some((path, map)));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }),
        }
    }
    Ok(None)
}

/// Returns the base directory's root config file path, without reading it.
pub(crate) fn find_root(base: &Path, radix: &str) -> Option<PathBuf> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| base.join(format!("{radix}.{ext}")))
        .find(|path| path.is_file())
}

pub(crate) fn read_candidate(candidate: &Candidate) -> Result<Map<String, Value>, ConfigError> {
    let contents =
        std::fs::read_to_string(&candidate.path).map_err(|e| ConfigError::ReadError {
            path: candidate.path.clone(),
            source: e,
        })?;
    parse_document(&candidate.path, &contents, candidate.format)
}

/// Parses a config document. Empty documents are empty maps.
pub(crate) fn parse_document(
    path: &Path,
    contents: &str,
    format: Format,
) -> Result<Map<String, Value>, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(Map::new());
    }

    let value = match format {
        Format::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(contents).map_err(|e| ConfigError::YamlError {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            serde_json::to_value(yaml).map_err(|e| ConfigError::JsonError {
                path: path.to_path_buf(),
                source: e,
            })?
        }
        Format::Json => serde_json::from_str(contents).map_err(|e| ConfigError::JsonError {
            path: path.to_path_buf(),
            source: e,
        })?,
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Collects candidate files under `dir`, walked in file name order.
///
/// A missing directory yields nothing. When both `X.{suffix}` and `X` are
/// found, only `X.{suffix}` is kept.
pub(crate) fn walk_overlay(dir: &Path, matcher: &NameMatcher) -> Result<Vec<Candidate>, ConfigError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Ok(Vec::new()),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ConfigError::WalkError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        // symlinked files count; symlinked dirs are not descended
        if !entry.path().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if let Some((format, suffixed)) = matcher.classify(name) {
            candidates.push(Candidate {
                path: entry.into_path(),
                format,
                suffixed,
            });
        }
    }

    let shadowed: HashSet<PathBuf> = candidates
        .iter()
        .filter(|c| c.suffixed)
        .filter_map(|c| matcher.unsuffixed(&c.path))
        .collect();
    candidates.retain(|c| c.suffixed || !shadowed.contains(&c.path));

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn names(candidates: &[Candidate], root: &Path) -> Vec<String> {
        candidates
            .iter()
            .map(|c| {
                c.path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_classify() {
        let matcher = NameMatcher::new("config", Some("dec")).unwrap();
        assert_eq!(matcher.classify("config.yaml"), Some((Format::Yaml, false)));
        assert_eq!(matcher.classify("config.db.yml"), Some((Format::Yaml, false)));
        assert_eq!(matcher.classify("config.json"), Some((Format::Json, false)));
        assert_eq!(matcher.classify("config.yaml.dec"), Some((Format::Yaml, true)));
        assert_eq!(matcher.classify("config.a.b.json.dec"), Some((Format::Json, true)));
        assert_eq!(matcher.classify("config.toml"), None);
        assert_eq!(matcher.classify("secrets.yaml"), None);
        assert_eq!(matcher.classify("myconfig.yaml"), None);
        assert_eq!(matcher.classify("config.yaml.bak"), None);
    }

    #[test]
    fn test_classify_without_suffix() {
        let matcher = NameMatcher::new("config", None).unwrap();
        assert_eq!(matcher.classify("config.yaml.dec"), None);
        assert_eq!(matcher.classify("config.yaml"), Some((Format::Yaml, false)));
    }

    #[test]
    fn test_read_root_extension_order() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("config.json"), r#"{"from": "json"}"#);
        write(&dir.path().join("config.yml"), "from: yml\n");

        let (path, map) = read_root(dir.path(), "config").unwrap().unwrap();
        assert_eq!(path, dir.path().join("config.yml"));
        assert_eq!(map.get("from"), Some(&json!("yml")));

        write(&dir.path().join("config.yaml"), "from: yaml\n");
        let (path, _) = read_root(dir.path(), "config").unwrap().unwrap();
        assert_eq!(path, dir.path().join("config.yaml"));
        assert_eq!(find_root(dir.path(), "config"), Some(path));
    }

    #[test]
    fn test_read_root_missing() {
        let dir = tempdir().unwrap();
        assert!(read_root(dir.path(), "config").unwrap().is_none());
        assert!(find_root(dir.path(), "config").is_none());
    }

    #[test]
    fn test_parse_document() {
        let path = Path::new("test.yaml");
        let map = parse_document(path, "a:\n  b: 1\nlist: [x, y]\n", Format::Yaml).unwrap();
        assert_eq!(Value::Object(map), json!({"a": {"b": 1}, "list": ["x", "y"]}));

        assert!(parse_document(path, "", Format::Yaml).unwrap().is_empty());
        assert!(parse_document(path, "~\n", Format::Yaml).unwrap().is_empty());
        assert!(parse_document(path, "  \n", Format::Json).unwrap().is_empty());
    }

    #[test]
    fn test_parse_document_errors() {
        let path = Path::new("bad.yaml");
        assert!(matches!(
            parse_document(path, "a: [unclosed\n", Format::Yaml),
            Err(ConfigError::YamlError { .. })
        ));
        assert!(matches!(
            parse_document(path, "{not json", Format::Json),
            Err(ConfigError::JsonError { .. })
        ));
        assert!(matches!(
            parse_document(path, "- a\n- b\n", Format::Yaml),
            Err(ConfigError::NotAMapping { .. })
        ));
    }

    #[test]
    fn test_walk_overlay_sorted_and_recursive() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("b/config.yaml"), "");
        write(&root.join("config.z.json"), "{}");
        write(&root.join("a/config.yaml"), "");
        write(&root.join("config.yaml"), "");
        write(&root.join("notes.txt"), "");

        let matcher = NameMatcher::new("config", None).unwrap();
        let found = walk_overlay(root, &matcher).unwrap();
        assert_eq!(
            names(&found, root),
            vec!["a/config.yaml", "b/config.yaml", "config.yaml", "config.z.json"]
        );
    }

    #[test]
    fn test_walk_overlay_suffix_shadows_plain() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("config.yaml"), "");
        write(&root.join("config.yaml.dec"), "");
        write(&root.join("config.db.yaml"), "");

        let matcher = NameMatcher::new("config", Some("dec")).unwrap();
        let found = walk_overlay(root, &matcher).unwrap();
        assert_eq!(names(&found, root), vec!["config.db.yaml", "config.yaml.dec"]);
        assert!(found[1].suffixed);
    }

    #[test]
    fn test_walk_overlay_dotted_suffix_shadows_plain() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("config.yaml"), "");
        write(&root.join("config.yaml.dec.v2"), "");

        let matcher = NameMatcher::new("config", Some("dec.v2")).unwrap();
        let found = walk_overlay(root, &matcher).unwrap();
        assert_eq!(names(&found, root), vec!["config.yaml.dec.v2"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_overlay_follows_file_symlinks() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("data/config.yaml"), "a: 1\n");
        fs::create_dir_all(root.join("overlay")).unwrap();
        std::os::unix::fs::symlink(
            root.join("data/config.yaml"),
            root.join("overlay/config.yaml"),
        )
        .unwrap();

        let matcher = NameMatcher::new("config", None).unwrap();
        let found = walk_overlay(&root.join("overlay"), &matcher).unwrap();
        assert_eq!(names(&found, root), vec!["overlay/config.yaml"]);
    }

    #[test]
    fn test_walk_overlay_missing_dir() {
        let dir = tempdir().unwrap();
        let matcher = NameMatcher::new("config", None).unwrap();
        assert!(walk_overlay(&dir.path().join("nope"), &matcher)
            .unwrap()
            .is_empty());
    }
}
