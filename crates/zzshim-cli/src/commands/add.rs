//! Add command implementation.

use super::Session;
use crate::cli::AddArgs;
use crate::error::add_archive_context;
use anyhow::Result;

pub fn execute(args: &AddArgs, session: &Session<'_>) -> Result<()> {
    let message = format!("Updating {}", args.archive.display());
    let (result, elapsed) = session.run(&message, |a| a.add_files(&args.archive, &args.files));
    add_archive_context(result, &args.archive)?;

    let entries = args
        .files
        .iter()
        .map(|f| f.display().to_string())
        .collect();
    let report = session
        .report("add", &args.archive, elapsed)
        .with_entries(entries);
    session.formatter.format_operation_result(&report)
}
