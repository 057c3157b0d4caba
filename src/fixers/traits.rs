use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixResult {
    Applied { description: String },
    Skipped { reason: String },
}

pub trait Fixer {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Describe what would be done (for dry-run)
    fn describe(&self, path: &Path) -> Result<FixResult>;

    /// Apply the fix, rewriting the file in place
    fn apply(&self, path: &Path) -> Result<FixResult>;
}
