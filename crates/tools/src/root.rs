//! Root-relative path resolution for file actions.

use actloop_core::ActionError;
use std::path::{Component, Path, PathBuf};

/// The directory file actions operate in.
///
/// Names handed to actions by the model are always resolved against it;
/// absolute paths and `..` components are rejected so nothing escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRoot {
    dir: PathBuf,
}

impl FileRoot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a model-supplied file name to a path under the root.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf, ActionError> {
        let relative = Path::new(file_name);
        if file_name.trim().is_empty() {
            return Err(ActionError::InvalidArguments("file name is empty".into()));
        }
        if relative.is_absolute() || relative.has_root() {
            return Err(ActionError::InvalidArguments(format!(
                "absolute paths are not allowed: {file_name}"
            )));
        }
        if relative.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(ActionError::InvalidArguments(format!(
                "path escapes the root directory: {file_name}"
            )));
        }
        Ok(self.dir.join(relative))
    }
}
