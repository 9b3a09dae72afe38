//! Locating and validating the archiver executable.
//!
//! Resolution order:
//!
//! 1. every match for the executable name on `PATH`, then in the configured
//!    additional directories; with strict verification the first candidate
//!    whose `--help` output contains the 7-Zip signature wins
//! 2. the bundled binary at `<install-root>/bin/<prefix>_<os>-<arch>`
//! 3. otherwise [`ArchiverError::MissingBinary`]

use crate::ArchiverError;
use crate::ResolverConfig;
use crate::Result;
use crate::path;
use crate::process::CommandRunner;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Where a resolved binary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinarySource {
    /// Found on `PATH` or in an additional search directory.
    Search,
    /// The per-platform binary shipped next to this program.
    Bundled,
    /// Supplied directly by the caller.
    Explicit,
}

impl std::fmt::Display for BinarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Bundled => write!(f, "bundled"),
            Self::Explicit => write!(f, "explicit"),
        }
    }
}

/// An archiver executable that passed validation.
///
/// The path always exists and is executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinary {
    path: PathBuf,
    source: BinarySource,
}

impl ResolvedBinary {
    pub(crate) const fn new(path: PathBuf, source: BinarySource) -> Self {
        Self { path, source }
    }

    /// Wraps a caller-chosen binary after checking it is executable.
    ///
    /// No help check is run; the caller vouches for what the binary is.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path does not exist and
    /// `InsufficientPermissions` if it is not executable.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path::exists(&path) {
            return Err(ArchiverError::NotFound { path });
        }
        if !path::is_executable(&path) {
            return Err(ArchiverError::InsufficientPermissions {
                path,
                permission: crate::Permission::Execute,
            });
        }
        Ok(Self::new(absolute(path), BinarySource::Explicit))
    }

    /// Returns the binary path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns how the binary was found.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> BinarySource {
        self.source
    }
}

/// Resolves the archiver binary according to `config`.
///
/// `runner` is only used for the `--help` verification.
///
/// # Errors
///
/// Returns `MissingBinary` naming `config.executable_name` if neither the
/// search nor the bundled fallback yields a usable binary.
///
/// # Examples
///
/// ```no_run
/// use zzshim_core::ResolverConfig;
/// use zzshim_core::process::SystemRunner;
/// use zzshim_core::resolver::resolve;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let binary = resolve(&ResolverConfig::default(), &SystemRunner::new())?;
/// println!("using {} ({})", binary.path().display(), binary.source());
/// # Ok(())
/// # }
/// ```
pub fn resolve<R: CommandRunner + ?Sized>(
    config: &ResolverConfig,
    runner: &R,
) -> Result<ResolvedBinary> {
    if let Some(found) = search(config, runner) {
        info!(path = %found.display(), "resolved archiver via search");
        return Ok(ResolvedBinary::new(absolute(found), BinarySource::Search));
    }

    let install_root = match &config.install_root {
        Some(root) => Some(root.clone()),
        None => default_install_root()
            .inspect_err(|e| warn!(error = %e, "skipping bundled binary lookup"))
            .ok(),
    };

    if let Some(root) = install_root {
        let (os, arch) = current_platform();
        let bundled = bundled_binary_path(&root, &config.bundled_prefix, &os, &arch);
        debug!(path = %bundled.display(), "checking bundled archiver");

        if path::exists(&bundled) && path::is_executable(&bundled) {
            info!(path = %bundled.display(), "resolved bundled archiver");
            return Ok(ResolvedBinary::new(absolute(bundled), BinarySource::Bundled));
        }
    }

    Err(ArchiverError::MissingBinary {
        name: config.executable_name.clone(),
    })
}

/// Returns the first acceptable search match, if any.
fn search<R: CommandRunner + ?Sized>(config: &ResolverConfig, runner: &R) -> Option<PathBuf> {
    let name = config.executable_name.as_str();
    let cwd = std::env::current_dir().unwrap_or_default();

    let mut candidates: Vec<PathBuf> = which::which_all(name)
        .map(Iterator::collect)
        .unwrap_or_default();
    for dir in &config.additional_search_paths {
        if let Ok(found) = which::which_in_all(name, Some(dir.as_os_str()), &cwd) {
            candidates.extend(found);
        }
    }

    candidates.into_iter().find(|candidate| {
        debug!(path = %candidate.display(), "considering archiver candidate");
        if !path::is_executable(candidate) {
            warn!(path = %candidate.display(), "candidate is not executable");
            return false;
        }
        if config.strict_verification && !verify(candidate, config, runner) {
            warn!(
                path = %candidate.display(),
                signature = %config.signature,
                "candidate did not identify as the expected archiver"
            );
            return false;
        }
        true
    })
}

/// Runs `binary` with the help flag and checks for the signature.
///
/// Any spawn failure or non-zero exit counts as a failed check.
#[must_use]
pub fn verify<R: CommandRunner + ?Sized>(
    binary: &Path,
    config: &ResolverConfig,
    runner: &R,
) -> bool {
    if !path::exists(binary) || !path::is_executable(binary) {
        return false;
    }

    match runner.run(binary, &[OsString::from(&config.help_flag)]) {
        Ok(output) => output.success() && output.stdout.contains(&config.signature),
        Err(e) => {
            debug!(path = %binary.display(), error = %e, "help check failed to run");
            false
        }
    }
}

/// Computes `<install_root>/bin/<prefix>_<os>-<arch>` with both platform
/// names lowercased.
///
/// This is a pure function; callers may memoize the result.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use zzshim_core::resolver::bundled_binary_path;
///
/// let path = bundled_binary_path(Path::new("/opt/zzshim"), "7zzs", "Linux", "X86_64");
/// assert_eq!(path, Path::new("/opt/zzshim/bin/7zzs_linux-x86_64"));
/// ```
#[must_use]
pub fn bundled_binary_path(install_root: &Path, prefix: &str, os: &str, arch: &str) -> PathBuf {
    install_root
        .join("bin")
        .join(bundled_binary_name(prefix, os, arch))
}

/// Returns the bundled file name `<prefix>_<os>-<arch>`, platform lowercased.
#[must_use]
pub fn bundled_binary_name(prefix: &str, os: &str, arch: &str) -> String {
    format!(
        "{prefix}_{}-{}",
        os.to_ascii_lowercase(),
        arch.to_ascii_lowercase()
    )
}

/// Maps Rust's target OS/arch names to the names used by the bundled
/// binaries, which follow `uname -s` / `uname -m`.
#[must_use]
pub fn platform_names(os: &str, arch: &str) -> (String, String) {
    let os_name = match os {
        "macos" => "darwin",
        other => other,
    };
    let arch_name = match (os, arch) {
        ("macos", "aarch64") => "arm64",
        (_, other) => other,
    };
    (os_name.to_ascii_lowercase(), arch_name.to_ascii_lowercase())
}

/// Returns the bundled-binary platform names of the running program.
#[must_use]
pub fn current_platform() -> (String, String) {
    platform_names(std::env::consts::OS, std::env::consts::ARCH)
}

/// Derives the install root from the running executable.
///
/// A program installed as `<root>/bin/zzshim` yields `<root>`.
///
/// # Errors
///
/// Returns `UnsupportedPlatform` if the executable location is unknown or
/// has no grandparent directory.
pub fn default_install_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|_| ArchiverError::UnsupportedPlatform)?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or(ArchiverError::UnsupportedPlatform)
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::process::ProcessOutput;
    use proptest::prelude::*;
    use std::cell::RefCell;

    struct HelpRunner {
        output: ProcessOutput,
        calls: RefCell<Vec<Vec<OsString>>>,
    }

    impl HelpRunner {
        fn new(exit_code: i32, stdout: &str) -> Self {
            Self {
                output: ProcessOutput {
                    exit_code: Some(exit_code),
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                },
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for HelpRunner {
        fn run(&self, _program: &Path, args: &[OsString]) -> Result<ProcessOutput> {
            self.calls.borrow_mut().push(args.to_vec());
            Ok(self.output.clone())
        }
    }

    #[test]
    fn test_bundled_binary_path_layout() {
        let path = bundled_binary_path(Path::new("/opt/app"), "7zzs", "linux", "x86_64");
        assert_eq!(path, PathBuf::from("/opt/app/bin/7zzs_linux-x86_64"));
    }

    #[test]
    fn test_bundled_name_lowercases_platform_only() {
        assert_eq!(
            bundled_binary_name("7zzS", "Darwin", "ARM64"),
            "7zzS_darwin-arm64"
        );
    }

    #[test]
    fn test_platform_names() {
        assert_eq!(
            platform_names("linux", "x86_64"),
            ("linux".to_string(), "x86_64".to_string())
        );
        assert_eq!(
            platform_names("linux", "aarch64"),
            ("linux".to_string(), "aarch64".to_string())
        );
        assert_eq!(
            platform_names("macos", "aarch64"),
            ("darwin".to_string(), "arm64".to_string())
        );
        assert_eq!(
            platform_names("macos", "x86_64"),
            ("darwin".to_string(), "x86_64".to_string())
        );
    }

    #[test]
    fn test_current_platform_is_lowercase() {
        let (os, arch) = current_platform();
        assert_eq!(os, os.to_ascii_lowercase());
        assert_eq!(arch, arch.to_ascii_lowercase());
        assert!(!os.is_empty());
    }

    #[test]
    fn test_missing_binary_names_executable() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = ResolverConfig::new("zzshim-no-such-archiver-binary")
            .with_install_root(Some(temp.path().to_path_buf()));
        let runner = HelpRunner::new(0, "7-Zip");

        match resolve(&config, &runner) {
            Err(ArchiverError::MissingBinary { name }) => {
                assert_eq!(name, "zzshim-no-such-archiver-binary");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_verify_checks_signature_and_exit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let binary = temp.path().join("7zz");
        std::fs::write(&binary, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();
        let config = ResolverConfig::default();

        let genuine = HelpRunner::new(0, "7-Zip (z) 23.01 (x64)");
        assert!(verify(&binary, &config, &genuine));
        assert_eq!(genuine.calls.borrow()[0], vec![OsString::from("--help")]);

        assert!(!verify(&binary, &config, &HelpRunner::new(0, "GNU tar")));
        assert!(!verify(&binary, &config, &HelpRunner::new(1, "7-Zip")));
    }

    #[test]
    fn test_verify_rejects_missing_path() {
        let runner = HelpRunner::new(0, "7-Zip");
        assert!(!verify(
            Path::new("/no/such/7zz"),
            &ResolverConfig::default(),
            &runner
        ));
        assert!(runner.calls.borrow().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_from_path_rejects_non_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let binary = temp.path().join("7zz");
        std::fs::write(&binary, "").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o644)).unwrap();

        assert!(matches!(
            ResolvedBinary::from_path(&binary),
            Err(ArchiverError::InsufficientPermissions { .. })
        ));
        assert!(matches!(
            ResolvedBinary::from_path(temp.path().join("nope")),
            Err(ArchiverError::NotFound { .. })
        ));

        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();
        let resolved = ResolvedBinary::from_path(&binary).unwrap();
        assert_eq!(resolved.source(), BinarySource::Explicit);
        assert!(resolved.path().is_absolute());
    }

    #[test]
    fn test_binary_source_display() {
        assert_eq!(BinarySource::Search.to_string(), "search");
        assert_eq!(BinarySource::Bundled.to_string(), "bundled");
        assert_eq!(BinarySource::Explicit.to_string(), "explicit");
    }

    proptest! {
        #[test]
        fn prop_bundled_name_shape(
            prefix in "[a-z0-9]{1,8}",
            os in "[A-Za-z]{1,10}",
            arch in "[A-Za-z0-9_]{1,10}",
        ) {
            let name = bundled_binary_name(&prefix, &os, &arch);
            let expected = format!(
                "{}_{}-{}",
                prefix,
                os.to_lowercase(),
                arch.to_lowercase()
            );
            prop_assert_eq!(&name, &expected);

            let path = bundled_binary_path(Path::new("root"), &prefix, &os, &arch);
            prop_assert!(path.starts_with(Path::new("root").join("bin")));
            prop_assert_eq!(path.file_name().unwrap().to_string_lossy(), name);
        }
    }
}
