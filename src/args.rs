//! Argument mapping construction.
//!
//! The default arguments are a pure function of an [`Ambient`] snapshot, so
//! the rendering engine itself never reads process state. Additional values
//! come from an argument document (JSON or YAML) given as a file or on stdin.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::{Map, Value};

use crate::constants::{AUTHOR_FALLBACKS, ENV_REPOSITORY, ENV_WORKSPACE};
use crate::error::{Error, Result};

/// Snapshot of the process state the default arguments are derived from.
#[derive(Debug, Clone, Default)]
pub struct Ambient {
    pub vars: HashMap<String, String>,
    pub cwd: PathBuf,
}

impl Ambient {
    /// Captures the environment variables and working directory of the
    /// current process.
    pub fn from_process() -> Result<Self> {
        Ok(Self { vars: std::env::vars().collect(), cwd: std::env::current_dir()? })
    }

    fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str).filter(|value| !value.is_empty())
    }
}

/// Builds the default argument mapping.
///
/// * `Author` - owner part of `GITHUB_REPOSITORY`, else the first of
///   `GITHUB_ACTOR`, `USER`, `USERNAME` that is set, else empty
/// * `RepoName` - name part of `GITHUB_REPOSITORY`, else the name of the
///   working directory
/// * `Workspace` - `GITHUB_WORKSPACE`, else the working directory
///
/// # Errors
/// * `Error::ArgumentsError` if `GITHUB_REPOSITORY` is not `owner/name`
pub fn default_args(ambient: &Ambient) -> Result<Value> {
    let repository = match ambient.var(ENV_REPOSITORY) {
        Some(repository) => Some(split_repository(repository)?),
        None => None,
    };

    let author = match repository {
        Some((owner, _)) => owner.to_string(),
        None => AUTHOR_FALLBACKS
            .iter()
            .find_map(|key| ambient.var(key))
            .unwrap_or_default()
            .to_string(),
    };

    let repo_name = match repository {
        Some((_, name)) => name.to_string(),
        None => ambient
            .cwd
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let workspace = match ambient.var(ENV_WORKSPACE) {
        Some(workspace) => workspace.to_string(),
        None => ambient.cwd.display().to_string(),
    };

    debug!("Default arguments: author '{}', repository '{}'.", author, repo_name);

    let mut args = Map::new();
    args.insert("Author".to_string(), Value::String(author));
    args.insert("RepoName".to_string(), Value::String(repo_name));
    args.insert("Workspace".to_string(), Value::String(workspace));
    Ok(Value::Object(args))
}

fn split_repository(repository: &str) -> Result<(&str, &str)> {
    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(Error::ArgumentsError(format!(
            "{ENV_REPOSITORY} must look like 'owner/name', got '{repository}'"
        ))),
    }
}

/// Parses an argument document. JSON is tried first, then YAML.
///
/// # Errors
/// * `Error::ArgumentsError` if the content parses as neither, or is not a
///   mapping
pub fn parse_args(content: &str) -> Result<Value> {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ArgumentsError(format!("Invalid arguments format: {e}")))?,
    };

    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        other => Err(Error::ArgumentsError(format!("Arguments must be a mapping, got {other}"))),
    }
}

/// Reads and parses an argument file.
pub fn load_args_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    debug!("Loading arguments from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ArgumentsError(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    parse_args(&content)
}

/// Reads and parses an argument document from stdin.
pub fn load_from_stdin() -> Result<Value> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    let content = buffer.trim();
    if content.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    parse_args(content)
}

/// Shallow merge: keys of `overrides` replace those of `base`.
pub fn merge_args(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Object(mut base), Value::Object(overrides)) => {
            base.extend(overrides);
            Value::Object(base)
        }
        (base, Value::Null) => base,
        (_, overrides) => overrides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ambient(vars: &[(&str, &str)], cwd: &str) -> Ambient {
        Ambient {
            vars: vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            cwd: PathBuf::from(cwd),
        }
    }

    #[test]
    fn test_args_from_github_environment() {
        let ambient = ambient(
            &[
                ("GITHUB_REPOSITORY", "parrogo/templatedir"),
                ("GITHUB_WORKSPACE", "/root"),
                ("USER", "someone-else"),
            ],
            "/tmp/elsewhere",
        );
        let args = default_args(&ambient).unwrap();
        assert_eq!(
            args,
            json!({"Author": "parrogo", "RepoName": "templatedir", "Workspace": "/root"})
        );
    }

    #[test]
    fn test_args_fall_back_to_working_directory() {
        let ambient = ambient(&[("USER", "alice")], "/home/alice/projects/widget");
        let args = default_args(&ambient).unwrap();
        assert_eq!(
            args,
            json!({
                "Author": "alice",
                "RepoName": "widget",
                "Workspace": "/home/alice/projects/widget"
            })
        );
    }

    #[test]
    fn test_actor_wins_over_user() {
        let ambient = ambient(&[("GITHUB_ACTOR", "bot"), ("USER", "alice")], "/w");
        assert_eq!(default_args(&ambient).unwrap()["Author"], json!("bot"));
    }

    #[test]
    fn test_empty_environment() {
        let args = default_args(&Ambient::default()).unwrap();
        assert_eq!(args, json!({"Author": "", "RepoName": "", "Workspace": ""}));
    }

    #[test]
    fn test_malformed_repository() {
        for bad in ["templatedir", "/templatedir", "parrogo/", "a/b/c"] {
            let ambient = ambient(&[("GITHUB_REPOSITORY", bad)], "/w");
            assert!(matches!(default_args(&ambient), Err(Error::ArgumentsError(_))), "{bad}");
        }
    }

    #[test]
    fn test_parse_json_and_yaml() {
        assert_eq!(parse_args(r#"{"Count": 42}"#).unwrap(), json!({"Count": 42}));
        assert_eq!(
            parse_args("Count: 42\nNested:\n  key: value\n").unwrap(),
            json!({"Count": 42, "Nested": {"key": "value"}})
        );
        assert_eq!(parse_args("null").unwrap(), json!({}));
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        assert!(matches!(parse_args("42"), Err(Error::ArgumentsError(_))));
        assert!(matches!(parse_args("- a\n- b\n"), Err(Error::ArgumentsError(_))));
        assert!(matches!(parse_args("{ unclosed"), Err(Error::ArgumentsError(_))));
    }

    #[test]
    fn test_merge_args() {
        let merged = merge_args(json!({"a": 1, "b": 2}), json!({"b": 3, "c": 4}));
        assert_eq!(merged, json!({"a": 1, "b": 3, "c": 4}));
        assert_eq!(merge_args(json!({"a": 1}), Value::Null), json!({"a": 1}));
    }

    #[test]
    fn test_load_args_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("args.yaml");
        std::fs::write(&path, "Count: 7\n").unwrap();
        assert_eq!(load_args_file(&path).unwrap(), json!({"Count": 7}));
        assert!(load_args_file(temp_dir.path().join("missing.yaml")).is_err());
    }
}
