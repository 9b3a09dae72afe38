//! Resolve and drive an external 7-Zip binary with typed results.
//!
//! `zzshim-core` locates a `7zz` executable (on `PATH`, in extra search
//! directories, or as a bundled per-platform binary), builds argument
//! vectors for archive operations, runs the binary as a subprocess and
//! turns its exit status into [`Result`] values. No archive format is parsed
//! here; all archive work is delegated to 7-Zip.
//!
//! # Examples
//!
//! ```no_run
//! use zzshim_core::ArchiveFormat;
//! use zzshim_core::Archiver;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archiver = Archiver::new()?;
//! archiver.compress_dir("/data/report", "/backups/report.7z", ArchiveFormat::SevenZ)?;
//! archiver.test_integrity("/backups/report.7z")?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archiver;
pub mod config;
pub mod error;
pub mod format;
pub mod path;
pub mod process;
pub mod resolver;
pub mod temp;
pub mod test_utils;

// Re-export main API types
pub use archiver::Archiver;
pub use archiver::Operation;
pub use config::ArchiverConfig;
pub use config::ResolverConfig;
pub use error::ArchiverError;
pub use error::Permission;
pub use error::Result;
pub use format::ArchiveFormat;
pub use process::CommandRunner;
pub use process::ProcessOutput;
pub use process::SystemRunner;
pub use resolver::BinarySource;
pub use resolver::ResolvedBinary;
