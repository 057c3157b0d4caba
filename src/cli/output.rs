use anyhow::Result;
use colored::*;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::fixers::runner::{FixOutcome, RunSummary};
use crate::utils::fs::display_name;

pub struct RunReport<'a> {
    pub root: &'a Path,
    pub results: &'a [(PathBuf, FixOutcome)],
    pub dry_run: bool,
}

impl RunReport<'_> {
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_outcomes(self.results)
    }
}

/// Table output is streamed: the header goes out before the first file and
/// each file's line as soon as it is done, so an aborted run still shows
/// which reports were already rewritten. JSON output is written once, at the
/// end of a completed run.
pub struct OutputFormatter {
    format: String,
}

impl OutputFormatter {
    pub fn new(format: &str) -> Self {
        Self {
            format: format.to_string(),
        }
    }

    fn is_json(&self) -> bool {
        self.format == "json"
    }

    pub fn header<W: Write>(&self, out: &mut W, count: usize, extension: &str) -> Result<()> {
        if self.is_json() {
            return Ok(());
        }
        writeln!(
            out,
            "Found {} {} files",
            count,
            extension.trim_start_matches('.').to_uppercase()
        )?;
        writeln!(out, "{}", "-".repeat(60))?;
        Ok(())
    }

    pub fn file<W: Write>(&self, out: &mut W, path: &Path, outcome: &FixOutcome) -> Result<()> {
        if self.is_json() {
            return Ok(());
        }
        writeln!(out, "{}", format_line(path, outcome))?;
        out.flush()?;
        Ok(())
    }

    pub fn finish<W: Write>(&self, out: &mut W, report: &RunReport) -> Result<()> {
        if self.is_json() {
            writeln!(out, "{}", render_json(report)?)?;
            return Ok(());
        }

        let summary = report.summary();
        writeln!(out, "{}", "-".repeat(60))?;
        if report.dry_run {
            writeln!(
                out,
                "Would fix: {}, Skipped: {}",
                summary.dry_run, summary.skipped
            )?;
        } else {
            writeln!(out, "Fixed: {}, Skipped: {}", summary.fixed, summary.skipped)?;
        }
        Ok(())
    }
}

/// Marker column is padded to a fixed width so filenames line up.
fn format_line(path: &Path, outcome: &FixOutcome) -> String {
    let (marker, message) = match outcome {
        FixOutcome::Applied(msg) => (format!("{:<8}", "FIXED").green(), msg),
        FixOutcome::Skipped(msg) => (format!("{:<8}", "SKIP").yellow(), msg),
        FixOutcome::DryRun(msg) => (format!("{:<8}", "DRY-RUN").cyan(), msg),
    };
    format!("  {} {:40} {}", marker, display_name(path), message)
}

fn render_json(report: &RunReport) -> Result<String> {
    let files: Vec<_> = report
        .results
        .iter()
        .map(|(path, outcome)| {
            serde_json::json!({
                "path": path.to_string_lossy(),
                "outcome": outcome,
            })
        })
        .collect();

    let output = serde_json::json!({
        "root": report.root.to_string_lossy(),
        "dry_run": report.dry_run,
        "files": files,
        "summary": report.summary(),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
