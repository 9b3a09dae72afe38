//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use zzshim_core::ResolvedBinary;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the binary selected by `locate`
    fn format_located(&self, binary: &ResolvedBinary) -> Result<()>;

    /// Format the result of one archive operation
    fn format_operation_result(&self, report: &OperationReport) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Outcome of one successful archive operation.
#[derive(Debug, Serialize)]
pub struct OperationReport {
    #[serde(skip)]
    pub operation: &'static str,
    pub archive: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<String>,
    pub binary: PathBuf,
    pub duration_ms: u128,
}

impl OperationReport {
    pub fn new(
        operation: &'static str,
        archive: impl Into<PathBuf>,
        binary: &ResolvedBinary,
        duration: Duration,
    ) -> Self {
        Self {
            operation,
            archive: archive.into(),
            destination: None,
            entries: Vec::new(),
            binary: binary.path().to_path_buf(),
            duration_ms: duration.as_millis(),
        }
    }

    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    #[must_use]
    pub fn with_entries(mut self, entries: Vec<String>) -> Self {
        self.entries = entries;
        self
    }
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data,
        }
    }
}
