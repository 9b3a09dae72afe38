//! Extract command implementation.

use super::Session;
use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use anyhow::Context;
use anyhow::Result;
use std::env;

pub fn execute(args: &ExtractArgs, session: &Session<'_>) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let message = format!("Extracting {}", args.archive.display());
    let (result, elapsed) = session.run(&message, |a| {
        a.extract(&args.archive, &output_dir, args.create_parents)
    });
    add_archive_context(result, &args.archive)?;

    let report = session
        .report("extract", &args.archive, elapsed)
        .with_destination(output_dir);
    session.formatter.format_operation_result(&report)
}
