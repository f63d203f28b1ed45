use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

/// Scoped per-job working directory: created on acquisition, removed
/// recursively when dropped. The drop runs on every exit path, so chunk
/// files never outlive their job, whether it succeeded, failed or was
/// cancelled.
#[derive(Debug)]
pub(crate) struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    pub(crate) fn create(path: PathBuf) -> Result<WorkDir, anyhow::Error> {
        fs::create_dir_all(&path)
            .with_context(|| anyhow!("path: {}", path.display()))?;
        Ok(WorkDir { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if let Err(error) = fs::remove_dir_all(&self.path) {
            log::warn!(
                "Failed to remove working directory {}: {}",
                self.path.display(),
                error
            );
        }
    }
}
