//! Archive operations driven through the resolved 7-Zip binary.

use crate::ArchiveFormat;
use crate::ArchiverConfig;
use crate::ArchiverError;
use crate::Permission;
use crate::ResolverConfig;
use crate::Result;
use crate::path;
use crate::process::CommandRunner;
use crate::process::ProcessOutput;
use crate::process::SystemRunner;
use crate::resolver::ResolvedBinary;
use crate::resolver::resolve;
use crate::temp::ScopedTempDir;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::warn;

/// One archiver invocation, before it is turned into an argument vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    /// `t <archive>`
    Test {
        /// Archive to test.
        archive: &'a Path,
    },
    /// `x <archive> -y -o<destination>`
    Extract {
        /// Archive to extract.
        archive: &'a Path,
        /// Output directory.
        destination: &'a Path,
    },
    /// `-t<format> a <output> <source>/*`
    Compress {
        /// Format of the new archive.
        format: ArchiveFormat,
        /// Archive to create.
        output: &'a Path,
        /// Directory whose contents are added.
        source: &'a Path,
    },
    /// `a <archive> <item>...`
    Add {
        /// Existing archive.
        archive: &'a Path,
        /// Files or directories to add.
        items: &'a [OsString],
    },
}

impl Operation<'_> {
    /// Short name used in logs and CLI output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Test { .. } => "test",
            Self::Extract { .. } => "extract",
            Self::Compress { .. } => "compress",
            Self::Add { .. } => "add",
        }
    }

    /// Builds the argument vector, one element per switch or path.
    ///
    /// Relative paths starting with `-` are passed as `./-…` so 7-Zip does
    /// not parse them as switches. The extraction destination is glued to
    /// `-o` and needs no such guard.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use zzshim_core::Operation;
    ///
    /// let op = Operation::Extract {
    ///     archive: Path::new("in.7z"),
    ///     destination: Path::new("out"),
    /// };
    /// assert_eq!(op.to_args(), ["x", "in.7z", "-y", "-oout"]);
    /// ```
    #[must_use]
    pub fn to_args(&self) -> Vec<OsString> {
        match *self {
            Self::Test { archive } => vec!["t".into(), path::operand(archive).into()],
            Self::Extract {
                archive,
                destination,
            } => {
                let mut output_switch = OsString::from("-o");
                output_switch.push(destination);
                vec![
                    "x".into(),
                    path::operand(archive).into(),
                    "-y".into(),
                    output_switch,
                ]
            }
            Self::Compress {
                format,
                output,
                source,
            } => vec![
                format!("-t{format}").into(),
                "a".into(),
                path::operand(output).into(),
                path::dir_wildcard(source),
            ],
            Self::Add { archive, items } => {
                let mut args = Vec::with_capacity(items.len() + 2);
                args.push("a".into());
                args.push(path::operand(archive).into());
                args.extend(
                    items
                        .iter()
                        .map(|item| path::operand(Path::new(item)).into_os_string()),
                );
                args
            }
        }
    }
}

/// Drives one resolved archiver binary.
///
/// The binary is resolved once, at construction. Each operation validates
/// its inputs, spawns exactly one archiver process, and maps a non-zero exit
/// to [`ArchiverError::ProcessFailed`]. Operations hold no state between
/// calls, so one `Archiver` can serve several threads working on different
/// archives.
///
/// # Examples
///
/// ```no_run
/// use zzshim_core::ArchiveFormat;
/// use zzshim_core::Archiver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let archiver = Archiver::new()?;
/// let archive = archiver.compress_dir("project/", "project.7z", ArchiveFormat::SevenZ)?;
/// archiver.add_string(&archive, "built by CI", "BUILD_INFO")?;
/// archiver.test_integrity(&archive)?;
/// archiver.extract(&archive, "restore/", true)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Archiver<R = SystemRunner> {
    binary: ResolvedBinary,
    runner: R,
}

impl Archiver<SystemRunner> {
    /// Resolves `7zz` with default settings.
    ///
    /// # Errors
    ///
    /// Returns `MissingBinary` if no usable binary is found.
    pub fn new() -> Result<Self> {
        Self::with_config(&ArchiverConfig::default())
    }

    /// Resolves the binary described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `MissingBinary` if no usable binary is found.
    pub fn with_config(config: &ArchiverConfig) -> Result<Self> {
        let runner = SystemRunner::new().with_timeout(config.timeout);
        Self::with_runner(&config.resolver, runner)
    }
}

impl<R: CommandRunner> Archiver<R> {
    /// Resolves the binary using `runner` for the help check and all operations.
    ///
    /// # Errors
    ///
    /// Returns `MissingBinary` if no usable binary is found.
    pub fn with_runner(config: &ResolverConfig, runner: R) -> Result<Self> {
        let binary = resolve(config, &runner)?;
        Ok(Self { binary, runner })
    }

    /// Wraps an already resolved binary.
    pub fn from_parts(binary: ResolvedBinary, runner: R) -> Self {
        Self { binary, runner }
    }

    /// Returns the binary every operation runs.
    #[must_use]
    pub fn binary(&self) -> &ResolvedBinary {
        &self.binary
    }

    /// Tests archive integrity (`t`).
    ///
    /// # Errors
    ///
    /// `NotFound` if the archive is missing, `ProcessFailed` if 7-Zip
    /// reports a problem.
    pub fn test_integrity(&self, archive: impl AsRef<Path>) -> Result<()> {
        let archive = archive.as_ref();
        require_exists(archive)?;

        self.execute(&Operation::Test { archive }).map(drop)
    }

    /// Extracts an archive into `destination`, overwriting existing files.
    ///
    /// With `create_parents`, a missing destination is created together
    /// with any missing ancestors. A destination that exists but is not a
    /// directory is rejected with `FatalIo` whether or not parents may be
    /// created.
    ///
    /// # Errors
    ///
    /// - `NotFound`: archive missing, or destination missing and
    ///   `create_parents` is off
    /// - `FatalIo`: destination could not be created or is not a directory
    /// - `InsufficientPermissions`: destination is not writable
    /// - `ProcessFailed`: 7-Zip exited non-zero
    pub fn extract(
        &self,
        archive: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        create_parents: bool,
    ) -> Result<()> {
        let archive = archive.as_ref();
        let destination = destination.as_ref();
        require_exists(archive)?;

        if !path::exists(destination) {
            if !create_parents {
                return Err(ArchiverError::NotFound {
                    path: destination.to_path_buf(),
                });
            }
            debug!(path = %destination.display(), "creating extraction directory");
            path::create_dir(destination, true)?;
        } else if !destination.is_dir() {
            return Err(ArchiverError::FatalIo {
                path: destination.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "extraction destination is not a directory",
                ),
            });
        }

        if !path::is_writable(destination) {
            return Err(ArchiverError::InsufficientPermissions {
                path: destination.to_path_buf(),
                permission: Permission::Write,
            });
        }

        self.execute(&Operation::Extract {
            archive,
            destination,
        })
        .map(drop)
    }

    /// Compresses the contents of `source` into a new archive at `output`.
    ///
    /// Entries are stored relative to `source`; the directory itself is not
    /// a top-level entry.
    ///
    /// # Errors
    ///
    /// `NotFound` if `source` is missing, `Conflict` if `output` already
    /// exists, `ProcessFailed` if 7-Zip exits non-zero.
    pub fn compress_dir(
        &self,
        source: impl AsRef<Path>,
        output: impl AsRef<Path>,
        format: ArchiveFormat,
    ) -> Result<PathBuf> {
        let source = source.as_ref();
        let output = output.as_ref();
        require_exists(source)?;

        if path::exists(output) {
            return Err(ArchiverError::Conflict {
                path: output.to_path_buf(),
            });
        }

        self.execute(&Operation::Compress {
            format,
            output,
            source,
        })?;
        Ok(output.to_path_buf())
    }

    /// Adds files to an existing archive.
    ///
    /// An empty list is rejected before anything runs, since 7-Zip treats a
    /// bare `a <archive>` as "add everything in the working directory".
    ///
    /// # Errors
    ///
    /// `NotFound` if the archive is missing, `EmptyFileList` if `files` is
    /// empty, `ProcessFailed` if 7-Zip exits non-zero.
    pub fn add_files<P: AsRef<Path>>(&self, archive: impl AsRef<Path>, files: &[P]) -> Result<()> {
        let archive = archive.as_ref();
        require_exists(archive)?;
        if files.is_empty() {
            return Err(ArchiverError::EmptyFileList {
                archive: archive.to_path_buf(),
            });
        }

        let items: Vec<OsString> = files
            .iter()
            .map(|f| f.as_ref().as_os_str().to_os_string())
            .collect();
        self.execute(&Operation::Add {
            archive,
            items: &items,
        })
        .map(drop)
    }

    /// Adds `content` to an existing archive as a file named `file_name`.
    ///
    /// The content is staged in a fresh temporary directory which is
    /// removed before returning, whether or not 7-Zip succeeded.
    ///
    /// # Errors
    ///
    /// `NotFound` if the archive is missing, `InvalidEntryName` if
    /// `file_name` is not a single path component, `FatalIo` if staging or
    /// cleanup fails, `ProcessFailed` if 7-Zip exits non-zero.
    pub fn add_string(
        &self,
        archive: impl AsRef<Path>,
        content: impl AsRef<[u8]>,
        file_name: &str,
    ) -> Result<()> {
        let archive = archive.as_ref();
        require_exists(archive)?;
        validate_entry_name(file_name)?;

        let scratch = ScopedTempDir::new()?;
        let staged = scratch.child(file_name);

        let result = std::fs::write(&staged, content.as_ref())
            .map_err(|source| ArchiverError::FatalIo {
                path: staged.clone(),
                source,
            })
            .and_then(|()| {
                self.execute(&Operation::Add {
                    archive,
                    items: &[staged.into_os_string()],
                })
            });

        finish_scoped(scratch, result)
    }

    /// Adds an empty directory named `dir_name` to an existing archive.
    ///
    /// # Errors
    ///
    /// `NotFound` if the archive is missing, `InvalidEntryName` if
    /// `dir_name` is not a single path component, `FatalIo` if staging or
    /// cleanup fails, `ProcessFailed` if 7-Zip exits non-zero.
    pub fn add_empty_dir(&self, archive: impl AsRef<Path>, dir_name: &str) -> Result<()> {
        let archive = archive.as_ref();
        require_exists(archive)?;
        validate_entry_name(dir_name)?;

        let scratch = ScopedTempDir::new()?;
        let staged = scratch.child(dir_name);

        let result = path::create_dir(&staged, false).and_then(|()| {
            self.execute(&Operation::Add {
                archive,
                items: &[path::with_trailing_separator(&staged)],
            })
        });

        finish_scoped(scratch, result)
    }

    fn execute(&self, operation: &Operation<'_>) -> Result<ProcessOutput> {
        let args = operation.to_args();
        debug!(
            operation = operation.name(),
            binary = %self.binary.path().display(),
            "invoking archiver"
        );

        let output = self.runner.run(self.binary.path(), &args)?;
        if !output.success() {
            debug!(
                operation = operation.name(),
                exit_code = ?output.exit_code,
                "archiver reported failure"
            );
        }
        output.into_result()
    }
}

fn require_exists(path: &Path) -> Result<()> {
    if path::exists(path) {
        Ok(())
    } else {
        Err(ArchiverError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Accepts only a single normal path component.
fn validate_entry_name(name: &str) -> Result<()> {
    let trimmed = name.trim_end_matches(['/', '\\']);
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == OsStr::new(trimmed) => Ok(()),
        _ => Err(ArchiverError::InvalidEntryName {
            name: name.to_string(),
        }),
    }
}

/// Removes the scratch directory and merges its outcome with `result`.
///
/// A process failure takes precedence over a cleanup failure.
fn finish_scoped(scratch: ScopedTempDir, result: Result<ProcessOutput>) -> Result<()> {
    match (result, scratch.close()) {
        (Ok(_), cleanup) => cleanup,
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup)) => {
            warn!(error = %cleanup, "failed to remove temporary directory");
            Err(e)
        }
    }
}
