//! Error conversion utilities for CLI.
//!
//! Converts zzshim-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use zzshim_core::ArchiverError;

/// Longest archiver diagnostic echoed back to the user, in lines.
const MAX_DIAGNOSTIC_LINES: usize = 20;

/// Converts `ArchiverError` to user-friendly anyhow error with context
pub fn convert_archiver_error(err: ArchiverError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiverError::NotFound { path } => {
            anyhow!(
                "'{}' does not exist\n\
                 HINT: Check the path, or pass --create-parents when extracting into a new directory.",
                path.display()
            )
        }
        ArchiverError::MissingBinary { .. } | ArchiverError::UnsupportedPlatform => {
            convert_resolver_error(err)
        }
        ArchiverError::InsufficientPermissions { path, permission } => {
            anyhow!(
                "'{}' is not {permission}\n\
                 HINT: Fix the permissions or choose a different location.",
                path.display()
            )
        }
        ArchiverError::ProcessFailed { .. } => {
            let code = err
                .exit_code()
                .map_or_else(|| "a signal".to_string(), |c| format!("exit code {c}"));
            let details = err.output().map(tail).unwrap_or_default();
            anyhow!(
                "7-Zip failed on '{}' with {code}\n{details}\
                 HINT: The archive may be corrupted, encrypted, or in an unsupported format.",
                archive.display()
            )
        }
        ArchiverError::Conflict { path } => {
            anyhow!(
                "Refusing to overwrite '{}': file already exists\n\
                 HINT: Remove it first or choose another output path.",
                path.display()
            )
        }
        ArchiverError::TimedOut { timeout } => {
            anyhow!(
                "7-Zip did not finish '{}' within {} seconds and was stopped\n\
                 HINT: Raise --timeout for large archives.",
                archive.display(),
                timeout.as_secs()
            )
        }
        ArchiverError::InvalidEntryName { name } => {
            anyhow!(
                "Invalid entry name '{name}'\n\
                 HINT: Entry names must be a single path component without separators or '..'."
            )
        }
        ArchiverError::InvalidFormat(format) => {
            anyhow!(
                "Cannot determine archive format for '{}' ({format})\n\
                 HINT: Pass --format explicitly (7z, zip, tar, gzip, bzip2, xz, wim).",
                archive.display()
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Converts a binary resolution failure into an error with setup hints
pub fn convert_resolver_error(err: ArchiverError) -> anyhow::Error {
    match err {
        ArchiverError::MissingBinary { name } => {
            anyhow!(
                "No usable 7-Zip binary named '{name}' was found\n\
                 HINT: Install 7-Zip, or point to it with --search-path, --binary-name or --install-root.\n\
                 HINT: Use --no-verify if the binary does not print the usual 7-Zip banner."
            )
        }
        ArchiverError::UnsupportedPlatform => {
            anyhow!(
                "Cannot locate the bundled 7-Zip binary for this installation\n\
                 HINT: Pass --install-root to the directory containing bin/."
            )
        }
        _ => anyhow::Error::from(err).context("Failed to locate 7-Zip"),
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ArchiverError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archiver_error(e, archive))
}

/// Keeps the last lines of archiver output, each indented, with a trailing newline.
fn tail(output: &str) -> String {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(MAX_DIAGNOSTIC_LINES);
    lines[start..].iter().fold(String::new(), |mut acc, line| {
        acc.push_str("  ");
        acc.push_str(line);
        acc.push('\n');
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_convert_missing_binary_error() {
        let err = ArchiverError::MissingBinary {
            name: "7zz".to_string(),
        };
        let converted = convert_archiver_error(err, Path::new("a.7z"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("'7zz'"));
        assert!(msg.contains("--search-path"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_process_failed_error() {
        let err = ArchiverError::ProcessFailed {
            exit_code: Some(2),
            output: "Scanning\nERROR: a.7z : Can not open the file as archive\n".to_string(),
            stderr: String::new(),
        };
        let converted = convert_archiver_error(err, Path::new("a.7z"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("exit code 2"));
        assert!(msg.contains("  ERROR: a.7z : Can not open the file as archive\n"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_killed_process_error() {
        let err = ArchiverError::ProcessFailed {
            exit_code: None,
            output: String::new(),
            stderr: String::new(),
        };
        let msg = format!("{:?}", convert_archiver_error(err, Path::new("a.7z")));
        assert!(msg.contains("with a signal"));
    }

    #[test]
    fn test_convert_conflict_error() {
        let err = ArchiverError::Conflict {
            path: PathBuf::from("out.7z"),
        };
        let msg = format!("{:?}", convert_archiver_error(err, Path::new("out.7z")));
        assert!(msg.contains("already exists"));
    }

    #[test]
    fn test_convert_timeout_error() {
        let err = ArchiverError::TimedOut {
            timeout: Duration::from_secs(5),
        };
        let msg = format!("{:?}", convert_archiver_error(err, Path::new("big.7z")));
        assert!(msg.contains("within 5 seconds"));
        assert!(msg.contains("--timeout"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = ArchiverError::Io(io_err);
        let converted = convert_archiver_error(err, Path::new("archive.7z"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("Error processing archive 'archive.7z'"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_tail_keeps_last_lines() {
        let output: String = (0..30).map(|i| format!("line {i}\n")).collect();
        let kept = tail(&output);
        assert_eq!(kept.lines().count(), MAX_DIAGNOSTIC_LINES);
        assert!(kept.starts_with("  line 10\n"));
        assert!(kept.ends_with("  line 29\n"));
    }
}
