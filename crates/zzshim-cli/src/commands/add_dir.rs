//! Add-dir command implementation.

use super::Session;
use crate::cli::AddDirArgs;
use crate::error::add_archive_context;
use anyhow::Result;

pub fn execute(args: &AddDirArgs, session: &Session<'_>) -> Result<()> {
    let message = format!("Updating {}", args.archive.display());
    let (result, elapsed) = session.run(&message, |a| a.add_empty_dir(&args.archive, &args.name));
    add_archive_context(result, &args.archive)?;

    let report = session
        .report("add-dir", &args.archive, elapsed)
        .with_entries(vec![format!("{}/", args.name)]);
    session.formatter.format_operation_result(&report)
}
