//! Configuration for binary resolution and archiver construction.

use std::path::PathBuf;
use std::time::Duration;

/// Executable searched for on `PATH` by default.
pub const DEFAULT_EXECUTABLE: &str = "7zz";

/// File name prefix of the bundled per-platform binaries.
pub const DEFAULT_BUNDLED_PREFIX: &str = "7zzs";

/// Flag passed to a candidate binary to make it identify itself.
pub const DEFAULT_HELP_FLAG: &str = "--help";

/// Substring a genuine 7-Zip binary prints in its help output.
pub const DEFAULT_SIGNATURE: &str = "7-Zip";

/// Controls how the archiver executable is located and validated.
///
/// # Examples
///
/// ```
/// use zzshim_core::ResolverConfig;
///
/// // Look for `7zz` on PATH, then the bundled binary
/// let config = ResolverConfig::default();
///
/// // Accept p7zip's `7z` from an extra directory without probing it
/// let custom = ResolverConfig::new("7z")
///     .with_search_path("/opt/p7zip/bin")
///     .with_strict_verification(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Executable name to search for.
    ///
    /// Default: `"7zz"`.
    pub executable_name: String,

    /// Directories searched after the `PATH` locations.
    ///
    /// Default: empty.
    pub additional_search_paths: Vec<PathBuf>,

    /// Root containing the `bin/` directory of bundled binaries.
    ///
    /// `None` derives it from the location of the running executable.
    ///
    /// Default: `None`.
    pub install_root: Option<PathBuf>,

    /// File name prefix of bundled binaries.
    ///
    /// Default: `"7zzs"`.
    pub bundled_prefix: String,

    /// Flag passed to a search candidate to check what it is.
    ///
    /// Default: `"--help"`.
    pub help_flag: String,

    /// Text the help output must contain.
    ///
    /// Default: `"7-Zip"`.
    pub signature: String,

    /// Check binaries found via search before trusting them.
    ///
    /// When `false`, any executable match on the search path is accepted.
    ///
    /// Default: `true`.
    pub strict_verification: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            executable_name: DEFAULT_EXECUTABLE.to_string(),
            additional_search_paths: Vec::new(),
            install_root: None,
            bundled_prefix: DEFAULT_BUNDLED_PREFIX.to_string(),
            help_flag: DEFAULT_HELP_FLAG.to_string(),
            signature: DEFAULT_SIGNATURE.to_string(),
            strict_verification: true,
        }
    }
}

impl ResolverConfig {
    /// Creates a config searching for `executable_name`.
    #[must_use]
    pub fn new(executable_name: impl Into<String>) -> Self {
        Self {
            executable_name: executable_name.into(),
            ..Self::default()
        }
    }

    /// Adds one directory to search after `PATH`.
    #[must_use]
    pub fn with_search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.additional_search_paths.push(dir.into());
        self
    }

    /// Replaces the additional search directories.
    #[must_use]
    pub fn with_search_paths(mut self, dirs: Vec<PathBuf>) -> Self {
        self.additional_search_paths = dirs;
        self
    }

    /// Sets the install root for bundled binary lookup.
    #[must_use]
    pub fn with_install_root(mut self, root: Option<PathBuf>) -> Self {
        self.install_root = root;
        self
    }

    /// Sets the bundled binary prefix.
    #[must_use]
    pub fn with_bundled_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bundled_prefix = prefix.into();
        self
    }

    /// Sets the help flag and the signature expected in its output.
    #[must_use]
    pub fn with_help_check(
        mut self,
        help_flag: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        self.help_flag = help_flag.into();
        self.signature = signature.into();
        self
    }

    /// Sets whether search results are checked before use.
    #[must_use]
    pub fn with_strict_verification(mut self, strict: bool) -> Self {
        self.strict_verification = strict;
        self
    }
}

/// Configuration used by [`crate::Archiver::with_config`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use zzshim_core::ArchiverConfig;
/// use zzshim_core::ResolverConfig;
///
/// let config = ArchiverConfig::default()
///     .with_resolver(ResolverConfig::new("7z"))
///     .with_timeout(Some(Duration::from_secs(300)));
/// assert_eq!(config.resolver.executable_name, "7z");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiverConfig {
    /// How to find the archiver binary.
    pub resolver: ResolverConfig,

    /// Deadline for each archiver process; `None` waits indefinitely.
    ///
    /// Default: `None`.
    pub timeout: Option<Duration>,
}

impl ArchiverConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resolver configuration.
    #[must_use]
    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    /// Sets the per-process deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
