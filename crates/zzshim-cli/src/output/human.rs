//! Human-readable output formatter with colors and styling.

use super::formatter::OperationReport;
use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::time::Duration;
use zzshim_core::ResolvedBinary;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn headline(report: &OperationReport) -> String {
        let archive = report.archive.display();
        match report.operation {
            "test" => format!("Archive OK: {archive}"),
            "extract" => match &report.destination {
                Some(dest) => format!("Extracted {archive} into {}", dest.display()),
                None => format!("Extracted {archive}"),
            },
            "compress" => format!("Archive created: {archive}"),
            _ => format!("Archive updated: {archive}"),
        }
    }

    fn format_duration(duration: Duration) -> String {
        let millis = duration.as_millis();
        if millis >= 60_000 {
            let secs = duration.as_secs();
            format!("{}m{}s", secs / 60, secs % 60)
        } else if millis >= 1_000 {
            format!("{:.1}s", duration.as_secs_f64())
        } else {
            format!("{millis}ms")
        }
    }

    fn write_success(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_located(&self, binary: &ResolvedBinary) -> Result<()> {
        // The path is the answer, so it is printed even in quiet mode
        if self.quiet {
            let _ = self.term.write_line(&binary.path().display().to_string());
            return Ok(());
        }

        self.write_success(&format!("7-Zip binary: {}", binary.path().display()));
        let _ = self
            .term
            .write_line(&format!("  Source: {}", binary.source()));

        Ok(())
    }

    fn format_operation_result(&self, report: &OperationReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_success(&Self::headline(report));

        for entry in &report.entries {
            let _ = self.term.write_line(&format!("  + {entry}"));
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Binary: {}", report.binary.display()));
            let duration = u64::try_from(report.duration_ms).unwrap_or(u64::MAX);
            let _ = self.term.write_line(&format!(
                "  Duration: {}",
                Self::format_duration(Duration::from_millis(duration))
            ));
        }

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}
