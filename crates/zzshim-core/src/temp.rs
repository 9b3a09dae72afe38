//! Scoped temporary directories.

use crate::ArchiverError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

const TEMP_PREFIX: &str = "zzshim";

/// A freshly created, empty, uniquely named temporary directory.
///
/// The directory and everything inside it is removed when the value is
/// dropped. Use [`ScopedTempDir::close`] to observe removal errors instead of
/// having them ignored by `Drop`.
///
/// # Examples
///
/// ```
/// use zzshim_core::temp::ScopedTempDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scratch = ScopedTempDir::new()?;
/// let root = scratch.path().to_path_buf();
/// std::fs::write(scratch.path().join("note.txt"), "hi")?;
/// scratch.close()?;
/// assert!(!root.exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ScopedTempDir {
    dir: TempDir,
}

impl ScopedTempDir {
    /// Creates a new directory under the system temp location.
    ///
    /// # Errors
    ///
    /// Returns `FatalIo` if the directory cannot be created.
    pub fn new() -> Result<Self> {
        Self::new_in(std::env::temp_dir())
    }

    /// Creates a new directory below `parent`.
    ///
    /// # Errors
    ///
    /// Returns `FatalIo` if the directory cannot be created.
    pub fn new_in(parent: impl AsRef<Path>) -> Result<Self> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir_in(parent)
            .map_err(|source| ArchiverError::FatalIo {
                path: parent.to_path_buf(),
                source,
            })?;

        Ok(Self { dir })
    }

    /// Returns the directory path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path of an entry directly inside this directory.
    #[must_use]
    pub fn child(&self, name: impl AsRef<Path>) -> PathBuf {
        crate::path::join(self.path(), [name])
    }

    /// Removes the directory recursively, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns `FatalIo` if removal fails.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|source| ArchiverError::FatalIo { path, source })
    }
}
