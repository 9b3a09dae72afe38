//! Add-string command implementation.

use super::Session;
use crate::cli::AddStringArgs;
use crate::error::add_archive_context;
use anyhow::Context;
use anyhow::Result;
use std::io::Read;
use std::io::{self};

pub fn execute(args: &AddStringArgs, session: &Session<'_>) -> Result<()> {
    let content = match &args.content {
        Some(content) => content.clone().into_bytes(),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read entry content from stdin")?;
            buf
        }
    };

    if content.is_empty() {
        session
            .formatter
            .format_warning(&format!("entry '{}' will be empty", args.name));
    }

    let message = format!("Updating {}", args.archive.display());
    let (result, elapsed) = session.run(&message, |a| {
        a.add_string(&args.archive, &content, &args.name)
    });
    add_archive_context(result, &args.archive)?;

    let report = session
        .report("add-string", &args.archive, elapsed)
        .with_entries(vec![args.name.clone()]);
    session.formatter.format_operation_result(&report)
}
