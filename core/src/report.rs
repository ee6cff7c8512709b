//! # Text Report
//!
//! Writes the aggregation to `AD_<name>_Summary.txt`. The file is written to
//! a temporary file next to the target and renamed into place, so a crash
//! never leaves half a report behind.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use oucount_common::aggregation::Aggregation;
use oucount_common::error::SetupError;
use tempfile::NamedTempFile;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Creates `dir` when missing and checks that files can be written into it.
pub fn prepare_output_dir(dir: &Path) -> Result<(), SetupError> {
    let as_setup_error = |source: io::Error| SetupError::OutputPath {
        path: dir.to_path_buf(),
        source,
    };
    fs::create_dir_all(dir).map_err(as_setup_error)?;
    tempfile::tempfile_in(dir).map_err(as_setup_error)?;
    Ok(())
}

/// `AD_<name>_Summary.txt`, with characters unsafe in file names replaced.
pub fn report_file_name(target_name: &str) -> String {
    let safe: String = target_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("AD_{safe}_Summary.txt")
}

pub fn render_report(target_name: &str, aggregation: &Aggregation, generated: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "AD report for target node name: '{target_name}'");
    let _ = writeln!(out, "Generated: {}", generated.format(TIMESTAMP_FORMAT));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "TOTAL computers under '{target_name}': {}",
        aggregation.total
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Summary by location (location = DN element directly above '{target_name}'):"
    );
    for summary in &aggregation.summaries {
        let _ = writeln!(out, "{} : {}", summary.location, summary.total);
    }
    out
}

/// Renders and persists the report, returning the final path.
pub fn write_report(dir: &Path, target_name: &str, aggregation: &Aggregation) -> io::Result<PathBuf> {
    let path = dir.join(report_file_name(target_name));
    let body = render_report(target_name, aggregation, Local::now());

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(body.as_bytes())?;
    tmp.flush()?;
    tmp.persist(&path).map_err(|e| e.error)?;
    Ok(path)
}
