//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OperationReport;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use zzshim_core::ResolvedBinary;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct LocateOutput {
    path: String,
    source: String,
}

impl LocateOutput {
    fn new(binary: &ResolvedBinary) -> Self {
        Self {
            path: binary.path().display().to_string(),
            source: binary.source().to_string(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_located(&self, binary: &ResolvedBinary) -> Result<()> {
        Self::output(&JsonOutput::success("locate", LocateOutput::new(binary)))
    }

    fn format_operation_result(&self, report: &OperationReport) -> Result<()> {
        Self::output(&JsonOutput::success(report.operation, report))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_operation_report_structure() {
        let binary = ResolvedBinary::from_path(std::env::current_exe().unwrap()).unwrap();
        let report = OperationReport::new("extract", "in.7z", &binary, Duration::from_millis(12))
            .with_destination("out");

        let json = serde_json::to_value(JsonOutput::success(report.operation, &report)).unwrap();
        assert_eq!(json["operation"], "extract");
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["archive"], "in.7z");
        assert_eq!(json["data"]["destination"], "out");
        assert_eq!(json["data"]["duration_ms"], 12);
        assert!(json["data"].get("entries").is_none());
        assert!(json["data"].get("operation").is_none());
    }

    #[test]
    fn test_locate_output_structure() {
        let binary = ResolvedBinary::from_path(std::env::current_exe().unwrap()).unwrap();
        let json = serde_json::to_value(LocateOutput::new(&binary)).unwrap();
        assert_eq!(json["source"], "explicit");
        assert!(json["path"].as_str().unwrap().len() > 1);
    }
}
