//! Scratch workspace for one run.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{ProvisionError, Result};

/// Prefix of every scratch directory name.
pub const SCRATCH_PREFIX: &str = "devsetup-";

/// Uniquely named temporary directory, removed exactly once.
///
/// `cleanup` consumes the guard; if it is dropped instead (early return or
/// panic) the directory is still removed.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Creates a new scratch directory under `root`.
    ///
    /// # Errors
    /// Returns `Io` if the directory cannot be created.
    pub fn create(root: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(root)
            .map_err(|e| ProvisionError::io(root, e))?;
        debug!("Created scratch directory {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Returns the directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path for `file_name` inside the directory.
    #[must_use]
    pub fn file(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    /// Removes the directory. Failures are logged, never returned.
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("Removed scratch directory {}", path.display()),
            Err(e) => warn!(
                "Failed to remove scratch directory {}: {}",
                path.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_create_and_cleanup() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create(root.path()).unwrap();
        let path = scratch.path().to_path_buf();

        assert!(path.is_dir());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(SCRATCH_PREFIX)
        );

        fs::write(scratch.file("asset.vsix"), b"pkg").unwrap();
        scratch.cleanup();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ScratchDir::create(root.path()).unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_unique_names() {
        let root = tempfile::tempdir().unwrap();
        let a = ScratchDir::create(root.path()).unwrap();
        let b = ScratchDir::create(root.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_create_in_missing_root_fails() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("absent");
        assert!(ScratchDir::create(&missing).is_err());
    }
}
