use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::traits::{FixResult, Fixer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum FixOutcome {
    Applied(String),
    Skipped(String),
    DryRun(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub fixed: usize,
    pub skipped: usize,
    pub dry_run: usize,
}

impl RunSummary {
    pub fn from_outcomes(results: &[(PathBuf, FixOutcome)]) -> Self {
        let mut summary = RunSummary::default();
        for (_, outcome) in results {
            match outcome {
                FixOutcome::Applied(_) => summary.fixed += 1,
                FixOutcome::Skipped(_) => summary.skipped += 1,
                FixOutcome::DryRun(_) => summary.dry_run += 1,
            }
        }
        summary
    }
}

pub struct FixRunner {
    fixer: Box<dyn Fixer>,
}

impl FixRunner {
    pub fn new(fixer: Box<dyn Fixer>) -> Self {
        Self { fixer }
    }

    /// Runs the fixer over `files` in order. `on_outcome` sees each file as
    /// soon as it is done. The first I/O error aborts the run; files patched
    /// before it stay patched.
    pub fn run(
        &self,
        files: &[PathBuf],
        dry_run: bool,
        mut on_file: impl FnMut(&Path),
        mut on_outcome: impl FnMut(&Path, &FixOutcome) -> Result<()>,
    ) -> Result<Vec<(PathBuf, FixOutcome)>> {
        let mut results = Vec::with_capacity(files.len());

        for path in files {
            on_file(path);
            debug!(fixer = self.fixer.name(), file = %path.display(), "inspecting");
            let outcome = if dry_run {
                match self.fixer.describe(path)? {
                    FixResult::Applied { description } => FixOutcome::DryRun(description),
                    FixResult::Skipped { reason } => FixOutcome::Skipped(reason),
                }
            } else {
                match self.fixer.apply(path)? {
                    FixResult::Applied { description } => FixOutcome::Applied(description),
                    FixResult::Skipped { reason } => FixOutcome::Skipped(reason),
                }
            };
            on_outcome(path, &outcome)?;
            results.push((path.clone(), outcome));
        }

        Ok(results)
    }
}

pub fn default_runner() -> Result<FixRunner> {
    let fixer = super::hierarchy::TablixHierarchyFixer::new()?;
    Ok(FixRunner::new(Box::new(fixer)))
}
