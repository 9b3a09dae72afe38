//! Compress command implementation.

use super::Session;
use crate::cli::CompressArgs;
use crate::error::add_archive_context;
use anyhow::Result;
use zzshim_core::ArchiveFormat;

pub fn execute(args: &CompressArgs, session: &Session<'_>) -> Result<()> {
    let format = match args.format {
        Some(format) => format,
        None => add_archive_context(ArchiveFormat::from_path(&args.output), &args.output)?,
    };

    let message = format!("Compressing {}", args.source.display());
    let (result, elapsed) = session.run(&message, |a| {
        a.compress_dir(&args.source, &args.output, format)
    });
    let created = add_archive_context(result, &args.output)?;

    let report = session
        .report("compress", &created, elapsed)
        .with_entries(vec![format!("{} ({format})", args.source.display())]);
    session.formatter.format_operation_result(&report)
}
