//! Locate command implementation.

use super::Session;
use anyhow::Result;

pub fn execute(session: &Session<'_>) -> Result<()> {
    session.formatter.format_located(session.archiver.binary())
}
