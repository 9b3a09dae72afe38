//! Error types for archiver resolution and operations.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using `ArchiverError`.
pub type Result<T> = std::result::Result<T, ArchiverError>;

/// Filesystem permission that a path was found to be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// The path must be writable.
    Write,
    /// The path must be executable.
    Execute,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write => write!(f, "writable"),
            Self::Execute => write!(f, "executable"),
        }
    }
}

/// Errors that can occur while resolving or driving the archiver binary.
#[derive(Error, Debug)]
pub enum ArchiverError {
    /// A required archive, directory or file does not exist.
    #[error("file or directory not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// No usable archiver executable could be resolved.
    #[error("could not find a usable '{name}' binary on this system")]
    MissingBinary {
        /// The requested executable name.
        name: String,
    },

    /// A path exists but lacks a required permission.
    #[error("insufficient permission for {path}: not {permission}")]
    InsufficientPermissions {
        /// The offending path.
        path: PathBuf,
        /// The permission that is missing.
        permission: Permission,
    },

    /// The archiver exited with a non-zero status.
    #[error("archiver process failed ({})", describe_exit(*exit_code))]
    ProcessFailed {
        /// Exit code, `None` when the process was terminated by a signal.
        exit_code: Option<i32>,
        /// Captured standard output.
        output: String,
        /// Captured standard error.
        stderr: String,
    },

    /// An output that must not be overwritten already exists.
    #[error("refusing to overwrite existing path: {path}")]
    Conflict {
        /// The existing path.
        path: PathBuf,
    },

    /// Creating or removing a directory or file failed.
    #[error("filesystem operation failed for {path}: {source}")]
    FatalIo {
        /// The path being created or removed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archiver did not finish before the configured deadline.
    #[error("archiver process timed out after {timeout:?}")]
    TimedOut {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// An entry name is empty, nested, or escapes its directory.
    #[error("invalid entry name: {name:?}")]
    InvalidEntryName {
        /// The rejected name.
        name: String,
    },

    /// An add operation was given no files.
    #[error("no files given to add to {archive}")]
    EmptyFileList {
        /// Archive that would have been updated.
        archive: PathBuf,
    },

    /// Archive format identifier is unknown.
    #[error("unknown archive format: {0}")]
    InvalidFormat(String),

    /// No install root could be derived for bundled binary lookup.
    #[error("cannot determine install root for bundled binaries")]
    UnsupportedPlatform,

    /// Spawning or waiting on a process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(exit_code: Option<i32>) -> String {
    exit_code.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit code {code}"),
    )
}

impl ArchiverError {
    /// Returns `true` if this error reports a missing path or binary.
    ///
    /// # Examples
    ///
    /// ```
    /// use zzshim_core::ArchiverError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiverError::NotFound {
    ///     path: PathBuf::from("missing.7z"),
    /// };
    /// assert!(err.is_not_found());
    ///
    /// let err = ArchiverError::Conflict {
    ///     path: PathBuf::from("out.7z"),
    /// };
    /// assert!(!err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::MissingBinary { .. })
    }

    /// Returns the archiver's exit code for a failed process.
    ///
    /// # Examples
    ///
    /// ```
    /// use zzshim_core::ArchiverError;
    ///
    /// let err = ArchiverError::ProcessFailed {
    ///     exit_code: Some(2),
    ///     output: String::new(),
    ///     stderr: "ERROR: archive is corrupt".to_string(),
    /// };
    /// assert_eq!(err.exit_code(), Some(2));
    /// ```
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ProcessFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    /// Returns captured diagnostics of a failed process.
    ///
    /// Prefers standard error and falls back to standard output, since
    /// 7-Zip prints most of its messages on stdout.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::ProcessFailed { output, stderr, .. } => {
                if stderr.trim().is_empty() {
                    Some(output)
                } else {
                    Some(stderr)
                }
            }
            _ => None,
        }
    }

    /// Returns the path this error is about, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::NotFound { path }
            | Self::InsufficientPermissions { path, .. }
            | Self::Conflict { path }
            | Self::FatalIo { path, .. }
            | Self::EmptyFileList { archive: path } => Some(path),
            _ => None,
        }
    }
}
