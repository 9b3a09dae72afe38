//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;
use zzshim_core::ArchiveFormat;
use zzshim_core::ArchiverConfig;
use zzshim_core::ResolverConfig;
use zzshim_core::config::DEFAULT_EXECUTABLE;

#[derive(Parser)]
#[command(name = "zzshim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Executable name to search for
    #[arg(long, global = true, value_name = "NAME", default_value = DEFAULT_EXECUTABLE)]
    pub binary_name: String,

    /// Extra directory to search after PATH (can be repeated)
    #[arg(long = "search-path", global = true, value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// Root of the installation holding bin/<bundled binary>
    #[arg(long, global = true, value_name = "DIR")]
    pub install_root: Option<PathBuf>,

    /// Accept any matching executable without probing it
    #[arg(long, global = true)]
    pub no_verify: bool,

    /// Kill the archiver if it runs longer than this many seconds
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Maps the resolver and process flags onto the library configuration.
    pub fn archiver_config(&self) -> ArchiverConfig {
        let resolver = ResolverConfig::new(self.binary_name.as_str())
            .with_search_paths(self.search_paths.clone())
            .with_install_root(self.install_root.clone())
            .with_strict_verification(!self.no_verify);

        ArchiverConfig::new()
            .with_resolver(resolver)
            .with_timeout(self.timeout.map(Duration::from_secs))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which 7-Zip binary would be used
    Locate,
    /// Test archive integrity
    Test(TestArgs),
    /// Extract archive contents
    Extract(ExtractArgs),
    /// Compress a directory into a new archive
    Compress(CompressArgs),
    /// Add files or directories to an existing archive
    Add(AddArgs),
    /// Add a text entry to an existing archive
    AddString(AddStringArgs),
    /// Add an empty directory entry to an existing archive
    AddDir(AddDirArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct TestArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Create the output directory and its parents if missing
    #[arg(short = 'p', long)]
    pub create_parents: bool,
}

#[derive(clap::Args)]
pub struct CompressArgs {
    /// Directory whose contents are archived
    #[arg(value_name = "SOURCE_DIR")]
    pub source: PathBuf,

    /// Archive file to create (must not exist)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Archive format (default: detected from OUTPUT's extension)
    #[arg(short = 't', long, value_name = "FMT", value_parser = parse_format)]
    pub format: Option<ArchiveFormat>,
}

#[derive(clap::Args)]
pub struct AddArgs {
    /// Existing archive to update
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Files or directories to add
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(clap::Args)]
pub struct AddStringArgs {
    /// Existing archive to update
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Entry name inside the archive
    #[arg(short, long, value_name = "NAME")]
    pub name: String,

    /// Entry content (read from stdin when omitted)
    #[arg(value_name = "CONTENT")]
    pub content: Option<String>,
}

#[derive(clap::Args)]
pub struct AddDirArgs {
    /// Existing archive to update
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Directory entry name inside the archive
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Parse an archive format name (7z, zip, tar, gzip/gz, bzip2/bz2, xz, wim)
fn parse_format(s: &str) -> Result<ArchiveFormat, String> {
    s.parse::<ArchiveFormat>().map_err(|_| {
        let supported: Vec<&str> = ArchiveFormat::ALL
            .into_iter()
            .map(ArchiveFormat::as_str)
            .collect();
        format!(
            "unknown archive format '{s}' (supported: {})",
            supported.join(", ")
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("7z").unwrap(), ArchiveFormat::SevenZ);
        assert_eq!(parse_format("ZIP").unwrap(), ArchiveFormat::Zip);
        assert_eq!(parse_format("gz").unwrap(), ArchiveFormat::GZip);
        let err = parse_format("rar").unwrap_err();
        assert!(err.contains("rar"));
        assert!(err.contains("7z, zip"));
    }

    #[test]
    fn test_resolver_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "zzshim",
            "--binary-name",
            "7z",
            "--search-path",
            "/opt/a",
            "--search-path",
            "/opt/b",
            "--install-root",
            "/opt/zzshim",
            "--no-verify",
            "--timeout",
            "30",
            "locate",
        ])
        .unwrap();

        let config = cli.archiver_config();
        assert_eq!(config.resolver.executable_name, "7z");
        assert_eq!(
            config.resolver.additional_search_paths,
            vec![PathBuf::from("/opt/a"), PathBuf::from("/opt/b")]
        );
        assert_eq!(
            config.resolver.install_root,
            Some(PathBuf::from("/opt/zzshim"))
        );
        assert!(!config.resolver.strict_verification);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["zzshim", "test", "a.7z"]).unwrap();
        let config = cli.archiver_config();
        assert_eq!(config.resolver.executable_name, DEFAULT_EXECUTABLE);
        assert!(config.resolver.strict_verification);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["zzshim", "--timeout", "0", "locate"]).is_err());
    }

    #[test]
    fn test_add_requires_files() {
        assert!(Cli::try_parse_from(["zzshim", "add", "a.7z"]).is_err());
    }

    #[test]
    fn test_extract_flags() {
        let cli = Cli::try_parse_from(["zzshim", "extract", "a.7z", "out", "-p"]).unwrap();
        match cli.command {
            Commands::Extract(args) => {
                assert!(args.create_parents);
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
            }
            _ => panic!("expected extract"),
        }
    }
}
