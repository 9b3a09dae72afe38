//! Filesystem predicates and path helpers.
//!
//! These are thin wrappers over `std::fs` plus the `access(2)` checks used
//! for writability and executability on Unix, so callers test effective
//! permissions of the current process instead of raw mode bits.

use crate::ArchiverError;
use crate::Result;
use std::ffi::OsString;
use std::path::MAIN_SEPARATOR;
use std::path::Path;
use std::path::PathBuf;

/// Returns `true` if the path exists (following symlinks).
#[must_use]
pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Returns `true` if the current process may write to the path.
#[must_use]
pub fn is_writable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        access(path, libc::W_OK)
    }

    #[cfg(not(unix))]
    {
        std::fs::metadata(path).is_ok_and(|m| !m.permissions().readonly())
    }
}

/// Returns `true` if the path is a file the current process may execute.
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        access(path, libc::X_OK)
    }

    #[cfg(not(unix))]
    {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ["exe", "com", "bat", "cmd"].iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

#[cfg(unix)]
fn access(path: &Path, mode: libc::c_int) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(path_cstring) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };

    // SAFETY: access() reads the NUL-terminated string only for the duration
    // of the call and does not retain the pointer.
    #[allow(unsafe_code)]
    let result = unsafe { libc::access(path_cstring.as_ptr(), mode) };
    result == 0
}

/// Joins path segments with the platform separator.
///
/// Unlike [`Path::join`], a segment with a leading separator does not
/// replace what came before it; it is appended below the previous segments.
///
/// # Examples
///
/// ```
/// use zzshim_core::path::join;
/// use std::path::PathBuf;
///
/// let joined = join("/tmp/work", ["/nested/", "file.txt"]);
/// assert_eq!(joined, PathBuf::from("/tmp/work/nested/file.txt"));
/// ```
pub fn join<P, I, S>(base: P, segments: I) -> PathBuf
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut joined = base.as_ref().to_path_buf();
    for segment in segments {
        let relative: PathBuf = segment
            .as_ref()
            .components()
            .filter(|c| {
                !matches!(
                    c,
                    std::path::Component::RootDir | std::path::Component::Prefix(_)
                )
            })
            .collect();
        joined.push(relative);
    }
    joined
}

/// Returns the path with exactly one trailing platform separator.
///
/// 7-Zip treats an argument ending in a separator as "this directory
/// itself", which is how empty directories are added to an archive.
#[must_use]
pub fn with_trailing_separator(path: &Path) -> OsString {
    let mut os = path.as_os_str().to_os_string();
    let text = os.to_string_lossy();
    let is_terminated = text.ends_with(MAIN_SEPARATOR) || text.ends_with('/');
    if !is_terminated {
        os.push(MAIN_SEPARATOR.to_string());
    }
    os
}

/// Appends the archiver's "all entries" wildcard below a directory.
///
/// The wildcard is expanded by 7-Zip itself, never by a shell.
#[must_use]
pub fn dir_wildcard(dir: &Path) -> OsString {
    let mut os = with_trailing_separator(&operand(dir));
    os.push("*");
    os
}

/// Returns a path argument 7-Zip cannot mistake for a switch.
///
/// A relative path starting with `-` is prefixed with `./`; every other
/// path is returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use zzshim_core::path::operand;
///
/// assert_eq!(operand(Path::new("-sdel")), Path::new(".").join("-sdel"));
/// assert_eq!(operand(Path::new("report.txt")), Path::new("report.txt"));
/// ```
#[must_use]
pub fn operand(path: &Path) -> PathBuf {
    if path.as_os_str().as_encoded_bytes().first() == Some(&b'-') {
        Path::new(".").join(path)
    } else {
        path.to_path_buf()
    }
}

/// Creates a directory, optionally with all missing parents.
///
/// # Errors
///
/// Returns `FatalIo` when the directory could not be created and does not
/// exist as a directory afterwards.
pub fn create_dir(path: &Path, parents: bool) -> Result<()> {
    let result = if parents {
        std::fs::create_dir_all(path)
    } else {
        std::fs::create_dir(path)
    };

    match result {
        Ok(()) => Ok(()),
        // Lost a creation race against another caller; the outcome is the same.
        Err(_) if path.is_dir() => Ok(()),
        Err(source) => Err(ArchiverError::FatalIo {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exists() {
        let temp = TempDir::new().unwrap();
        assert!(exists(temp.path()));
        assert!(!exists(&temp.path().join("nope")));
    }

    #[test]
    fn test_is_writable_directory() {
        let temp = TempDir::new().unwrap();
        assert!(is_writable(temp.path()));
        assert!(!is_writable(&temp.path().join("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_executable_respects_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("tool");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&script));

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&script));
    }

    #[test]
    fn test_directory_is_not_executable() {
        let temp = TempDir::new().unwrap();
        assert!(!is_executable(temp.path()));
    }

    #[test]
    fn test_join_plain_segments() {
        let joined = join("base", ["a", "b.txt"]);
        assert_eq!(joined, PathBuf::from("base").join("a").join("b.txt"));
    }

    #[test]
    fn test_join_strips_root_of_later_segments() {
        let joined = join("/base", ["/etc/passwd"]);
        assert!(joined.starts_with("/base"));
        assert!(joined.ends_with("etc/passwd"));
    }

    #[test]
    fn test_with_trailing_separator() {
        let dir = PathBuf::from("tmp").join("empty");
        let os = with_trailing_separator(&dir);
        assert!(os.to_string_lossy().ends_with(MAIN_SEPARATOR));

        let again = with_trailing_separator(Path::new(&os));
        assert_eq!(again, os);
    }

    #[test]
    fn test_dir_wildcard() {
        let os = dir_wildcard(Path::new("src"));
        assert_eq!(os, OsString::from(format!("src{MAIN_SEPARATOR}*")));
    }

    #[test]
    fn test_create_dir_with_parents() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b").join("c");

        assert!(create_dir(&nested, false).is_err());
        create_dir(&nested, true).unwrap();
        assert!(nested.is_dir());

        // Existing directory is fine
        create_dir(&nested, true).unwrap();
    }

    #[test]
    fn test_operand_guards_leading_dash() {
        assert_eq!(operand(Path::new("-sdel")), Path::new(".").join("-sdel"));
        assert_eq!(
            operand(Path::new("-dir/file.txt")),
            Path::new(".").join("-dir/file.txt")
        );
        assert_eq!(operand(Path::new("a-b.txt")), Path::new("a-b.txt"));
        assert_eq!(operand(Path::new("/tmp/-x")), Path::new("/tmp/-x"));
        assert_eq!(operand(Path::new("")), Path::new(""));
    }

    #[test]
    fn test_dir_wildcard_guards_leading_dash() {
        let wildcard = dir_wildcard(Path::new("-src"));
        assert!(wildcard.to_string_lossy().starts_with('.'));
        assert!(wildcard.to_string_lossy().ends_with('*'));
    }

    #[test]
    fn test_create_dir_through_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        std::fs::write(&file, "x").unwrap();

        let result = create_dir(&file.join("child"), true);
        assert!(matches!(result, Err(ArchiverError::FatalIo { .. })));
    }
}
