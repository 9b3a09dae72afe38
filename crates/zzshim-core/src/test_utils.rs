//! Test doubles for the process seam and fake archiver binaries.
//!
//! # Panics
//!
//! Helpers in this module panic on I/O errors since they are designed for
//! test use only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use crate::Result;
use crate::process::CommandRunner;
use crate::process::ProcessOutput;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

/// One call observed by [`RecordingRunner`].
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Program that would have been executed.
    pub program: PathBuf,
    /// Argument vector.
    pub args: Vec<OsString>,
    /// For each argument: the file's contents if it named a regular file
    /// at call time.
    pub file_contents: Vec<Option<Vec<u8>>>,
    /// For each argument: whether it named a directory at call time.
    pub is_dir: Vec<bool>,
}

impl Invocation {
    /// Returns the arguments as lossy strings.
    #[must_use]
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// A [`CommandRunner`] that records calls and returns a canned result.
///
/// # Examples
///
/// ```
/// use std::ffi::OsString;
/// use std::path::Path;
/// use zzshim_core::process::CommandRunner;
/// use zzshim_core::test_utils::RecordingRunner;
///
/// let runner = RecordingRunner::succeeding();
/// runner.run(Path::new("7zz"), &[OsString::from("t")]).unwrap();
/// assert_eq!(runner.calls()[0].args_lossy(), vec!["t"]);
/// ```
#[derive(Debug)]
pub struct RecordingRunner {
    output: ProcessOutput,
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    /// Creates a runner returning `output` for every call.
    #[must_use]
    pub fn new(output: ProcessOutput) -> Self {
        Self {
            output,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a runner whose process always exits with status zero.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::new(ProcessOutput {
            exit_code: Some(0),
            stdout: "Everything is Ok\n".to_string(),
            stderr: String::new(),
        })
    }

    /// Creates a runner whose process always exits with `exit_code`.
    #[must_use]
    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        Self::new(ProcessOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    /// Returns every recorded call.
    #[must_use]
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput> {
        let file_contents = args
            .iter()
            .map(|a| {
                let p = Path::new(a);
                p.is_file().then(|| std::fs::read(p).unwrap())
            })
            .collect();
        let is_dir = args.iter().map(|a| Path::new(a).is_dir()).collect();

        self.calls.lock().unwrap().push(Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
            file_contents,
            is_dir,
        });
        Ok(self.output.clone())
    }
}

/// Writes an executable shell script named `name` into `dir`.
///
/// The script body runs under `/bin/sh`; use it to impersonate an archiver
/// (or a binary that only pretends to be one).
#[cfg(unix)]
pub fn write_fake_binary(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Script body that answers `--help` like 7-Zip and appends every other
/// argument vector to `log`, then exits with `exit_code`.
#[cfg(unix)]
#[must_use]
pub fn fake_archiver_script(log: &Path, exit_code: i32) -> String {
    format!(
        r#"if [ "$1" = "--help" ]; then
  echo "7-Zip (z) 24.08 (x64) : Copyright (c) 1999-2024 Igor Pavlov"
  exit 0
fi
printf '%s\n' "$*" >> "{log}"
exit {exit_code}"#,
        log = log.display()
    )
}
