//! Subcommand implementations.

pub mod add;
pub mod add_dir;
pub mod add_string;
pub mod completion;
pub mod compress;
pub mod extract;
pub mod locate;

use crate::error::convert_resolver_error;
use crate::output::OperationReport;
use crate::output::OutputFormatter;
use crate::progress::with_spinner;
use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use std::time::Instant;
use zzshim_core::Archiver;
use zzshim_core::ArchiverConfig;

/// Resolved archiver plus output settings shared by all subcommands.
pub struct Session<'a> {
    pub archiver: Archiver,
    pub formatter: &'a dyn OutputFormatter,
    show_progress: bool,
}

impl<'a> Session<'a> {
    /// Resolves the archiver binary for this invocation.
    pub fn open(
        config: &ArchiverConfig,
        formatter: &'a dyn OutputFormatter,
        show_progress: bool,
    ) -> Result<Self> {
        let archiver = Archiver::with_config(config).map_err(convert_resolver_error)?;
        Ok(Self {
            archiver,
            formatter,
            show_progress,
        })
    }

    /// Runs one archiver call under a spinner and measures it.
    pub fn run<T>(&self, message: &str, f: impl FnOnce(&Archiver) -> T) -> (T, Duration) {
        let started = Instant::now();
        let result = with_spinner(self.show_progress, message, || f(&self.archiver));
        (result, started.elapsed())
    }

    /// Starts a report for an operation that just completed.
    pub fn report(
        &self,
        operation: &'static str,
        archive: &Path,
        elapsed: Duration,
    ) -> OperationReport {
        OperationReport::new(operation, archive, self.archiver.binary(), elapsed)
    }
}
