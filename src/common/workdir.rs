use crate::common::error::BertSumError;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// # Temporary working directory
/// Created under the system temporary directory with a random name and removed when dropped.
/// Removal is best effort: errors on drop are ignored.
#[derive(Debug)]
pub struct WorkingDirectory {
    path: PathBuf,
}

impl WorkingDirectory {
    /// Creates a new directory named `<prefix>-<uuid>` in the system temporary directory.
    pub fn new(prefix: &str) -> Result<WorkingDirectory, BertSumError> {
        let mut path = std::env::temp_dir();
        path.push(format!("{}-{}", prefix, Uuid::new_v4()));
        fs::create_dir_all(&path)?;
        Ok(WorkingDirectory { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
