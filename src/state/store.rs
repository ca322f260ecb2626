//! Working-directory persistence.
//!
//! A run reads `vars.yaml` from its working directory before the first step
//! and writes it back at the end, together with `execution-result.json`.
//! Both writes use the write-to-temp-then-rename pattern so a crash never
//! leaves a half-written file behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::context::ValueMap;
use crate::error::{Result, TaskkitError};
use crate::runner::RunResult;

/// File holding shared variables between runs.
pub const VARS_FILE: &str = "vars.yaml";

/// File holding the result of the last run.
pub const RESULT_FILE: &str = "execution-result.json";

/// Run working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workdir {
    root: PathBuf,
}

impl Workdir {
    /// Open a working directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| TaskkitError::Persistence {
            what: "working directory".to_string(),
            path: root.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { root })
    }

    /// Refer to a working directory without touching the filesystem.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of the variables file.
    pub fn vars_file(&self) -> PathBuf {
        self.root.join(VARS_FILE)
    }

    /// Path of the result file.
    pub fn result_file(&self) -> PathBuf {
        self.root.join(RESULT_FILE)
    }

    /// Load shared variables from a previous run.
    ///
    /// A missing, empty or unreadable file yields an empty map; an
    /// unreadable one is logged as a warning.
    pub fn load_vars(&self) -> ValueMap {
        let path = self.vars_file();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ValueMap::new(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
                return ValueMap::new();
            }
        };

        if content.trim().is_empty() {
            return ValueMap::new();
        }

        match serde_yaml::from_str(&content) {
            Ok(vars) => vars,
            Err(e) => {
                tracing::warn!("Ignoring corrupt {}: {}", path.display(), e);
                ValueMap::new()
            }
        }
    }

    /// Persist shared variables as YAML.
    pub fn save_vars(&self, vars: &ValueMap) -> Result<()> {
        let path = self.vars_file();
        let content = serde_yaml::to_string(vars).map_err(|e| TaskkitError::Persistence {
            what: "variables".to_string(),
            path: path.clone(),
            message: e.to_string(),
        })?;
        write_atomic(&path, &content, "variables")
    }

    /// Persist a run result as pretty JSON.
    pub fn save_result(&self, result: &RunResult) -> Result<()> {
        let path = self.result_file();
        let content =
            serde_json::to_string_pretty(result).map_err(|e| TaskkitError::Persistence {
                what: "execution result".to_string(),
                path: path.clone(),
                message: e.to_string(),
            })?;
        write_atomic(&path, &content, "execution result")
    }

    /// Load the result of the last run, if one was saved.
    pub fn load_result(&self) -> Result<Option<RunResult>> {
        let path = self.result_file();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let result = serde_json::from_str(&content).map_err(|e| TaskkitError::Persistence {
            what: "execution result".to_string(),
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(result))
    }
}

fn write_atomic(path: &Path, content: &str, what: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)
        .and_then(|()| fs::rename(&temp_path, path))
        .map_err(|e| TaskkitError::Persistence {
            what: what.to_string(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    tracing::debug!("Saved {} to {}", what, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{RunResultBuilder, RunStatus};
    use serde_json::json;
    use tempfile::TempDir;

    fn workdir() -> (TempDir, Workdir) {
        let temp = TempDir::new().unwrap();
        let workdir = Workdir::open(temp.path().join("work")).unwrap();
        (temp, workdir)
    }

    #[test]
    fn open_creates_directory() {
        let (_temp, workdir) = workdir();
        assert!(workdir.path().is_dir());
    }

    #[test]
    fn load_vars_missing_file_is_empty() {
        let (_temp, workdir) = workdir();
        assert!(workdir.load_vars().is_empty());
    }

    #[test]
    fn load_vars_empty_file_is_empty() {
        let (_temp, workdir) = workdir();
        fs::write(workdir.vars_file(), "\n").unwrap();
        assert!(workdir.load_vars().is_empty());
    }

    #[test]
    fn load_vars_corrupt_file_is_empty() {
        let (_temp, workdir) = workdir();
        fs::write(workdir.vars_file(), "key: [unclosed").unwrap();
        assert!(workdir.load_vars().is_empty());
    }

    #[test]
    fn vars_roundtrip() {
        let (_temp, workdir) = workdir();
        let mut vars = ValueMap::new();
        vars.insert("name".into(), json!("nightly"));
        vars.insert("count".into(), json!(3));
        vars.insert("ok".into(), json!(true));
        vars.insert("nested".into(), json!({"a": [1, 2]}));

        workdir.save_vars(&vars).unwrap();

        assert_eq!(workdir.load_vars(), vars);
    }

    #[test]
    fn vars_file_is_yaml() {
        let (_temp, workdir) = workdir();
        let mut vars = ValueMap::new();
        vars.insert("name".into(), json!("nightly"));
        workdir.save_vars(&vars).unwrap();

        let content = fs::read_to_string(workdir.vars_file()).unwrap();
        assert!(content.contains("name: nightly"));
    }

    #[test]
    fn save_uses_atomic_write() {
        let (_temp, workdir) = workdir();
        workdir.save_vars(&ValueMap::new()).unwrap();

        assert!(workdir.vars_file().exists());
        assert!(!workdir.vars_file().with_extension("tmp").exists());
    }

    #[test]
    fn result_roundtrip() {
        let (_temp, workdir) = workdir();
        assert!(workdir.load_result().unwrap().is_none());

        let result = RunResultBuilder::start("t1", "smoke").finish(ValueMap::new());
        workdir.save_result(&result).unwrap();

        let loaded = workdir.load_result().unwrap().unwrap();
        assert_eq!(loaded.result, RunStatus::Succeeded);
        assert_eq!(loaded.task_id, "t1");

        let content = fs::read_to_string(workdir.result_file()).unwrap();
        assert!(content.contains("\n  \"result\": \"Succeeded\""));
    }

    #[test]
    fn load_result_corrupt_is_error() {
        let (_temp, workdir) = workdir();
        fs::write(workdir.result_file(), "{not json").unwrap();
        let err = workdir.load_result().unwrap_err();
        assert!(matches!(err, TaskkitError::Persistence { .. }));
    }
}
