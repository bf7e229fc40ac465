//! Output formatting and persistence for site reports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::analyzers::report::SiteReport;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &SiteReport) {
    tracing::debug!("{:#?}", report);
}

/// Prints a report as pretty JSON to stdout.
pub fn print_json(report: &SiteReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes one or more reports to a JSON file (a JSON array, even for a
/// single report, so batch and single output share a shape).
pub fn write_reports(path: &str, reports: &[SiteReport]) -> Result<()> {
    let file = File::create(Path::new(path)).with_context(|| format!("creating {path}"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, reports)?;
    writer.flush()?;

    info!(path, count = reports.len(), "Reports written");
    Ok(())
}
