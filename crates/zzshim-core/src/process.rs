//! Synchronous execution of external programs.

use crate::ArchiverError;
use crate::Result;
use std::ffi::OsString;
use std::io::Read;
use std::path::Path;
use std::process::Child;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;
use std::time::Instant;
use tracing::debug;
use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ProcessOutput {
    /// Returns `true` if the process exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    /// Converts a non-zero exit into `ProcessFailed`.
    ///
    /// # Errors
    ///
    /// Returns `ProcessFailed` carrying the captured output if the process
    /// did not exit successfully.
    pub fn into_result(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ArchiverError::ProcessFailed {
                exit_code: self.exit_code,
                output: self.stdout,
                stderr: self.stderr,
            })
        }
    }

    fn from_parts(status: ExitStatus, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        Self {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        }
    }
}

/// Executes a program with an argument vector and waits for it.
///
/// Implementations must not treat a non-zero exit as an error; the exit
/// status is reported in [`ProcessOutput`] and callers decide what it means.
pub trait CommandRunner {
    /// Runs `program` with `args` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process could not be spawned or waited
    /// on, or if a configured deadline was exceeded.
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
///
/// Arguments are passed as discrete elements, never through a shell.
/// Standard input is closed so an archiver that wants to prompt (e.g. for a
/// password) fails instead of blocking.
///
/// # Examples
///
/// ```no_run
/// use std::ffi::OsString;
/// use std::path::Path;
/// use std::time::Duration;
/// use zzshim_core::process::CommandRunner;
/// use zzshim_core::process::SystemRunner;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let runner = SystemRunner::new().with_timeout(Some(Duration::from_secs(30)));
/// let output = runner.run(Path::new("/usr/bin/7zz"), &[OsString::from("--help")])?;
/// assert!(output.success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Creates a runner without a deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an optional deadline after which the child is killed.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn run_with_deadline(mut command: Command, timeout: Duration) -> Result<ProcessOutput> {
        let mut child = command.spawn()?;

        // Both pipes are drained while polling; a full pipe would block the child.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = std::thread::spawn(move || drain(stdout));
        let stderr_reader = std::thread::spawn(move || drain(stderr));

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    stop(&mut child, "failed to kill archiver after wait error");
                    return Err(e.into());
                }
            }
            if Instant::now() >= deadline {
                stop(&mut child, "failed to kill timed out archiver");
                return Err(ArchiverError::TimedOut { timeout });
            }
            std::thread::sleep(POLL_INTERVAL);
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();
        Ok(ProcessOutput::from_parts(status, stdout, stderr))
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput> {
        debug!(program = %program.display(), ?args, "running archiver");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = match self.timeout {
            Some(timeout) => Self::run_with_deadline(command, timeout)?,
            None => {
                let out = command.output()?;
                ProcessOutput::from_parts(out.status, out.stdout, out.stderr)
            }
        };

        debug!(exit_code = ?output.exit_code, "archiver finished");
        Ok(output)
    }
}

/// Kills and reaps `child`; the pipe readers finish once its pipes close.
fn stop(child: &mut Child, kill_failed: &str) {
    if let Err(e) = child.kill() {
        warn!(error = %e, "{kill_failed}");
    }
    if let Err(e) = child.wait() {
        warn!(error = %e, "failed to reap archiver");
    }
}

fn drain<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf) {
            debug!(error = %e, bytes = buf.len(), "archiver output truncated");
        }
    }
    buf
}
