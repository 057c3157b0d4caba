//! Tablix hierarchy patching for SSRS report definitions.
//!
//! Report Builder refuses to open a Tablix that has a `<TablixBody>` but no
//! `<TablixColumnHierarchy>` / `<TablixRowHierarchy>`. The fixer synthesizes
//! both blocks and splices them between `</TablixBody>` and `<DataSetName>`.
//!
//! Documents are handled as plain text. A single Tablix per report is
//! assumed: the column count is taken over the whole document and every
//! anchor occurrence receives the same fragment.

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::traits::{FixResult, Fixer};

pub const COLUMN_MARKER: &str = "<TablixColumn>";
pub const COLUMN_HIERARCHY_MARKER: &str = "<TablixColumnHierarchy>";
pub const ROW_HIERARCHY_MARKER: &str = "<TablixRowHierarchy>";

const ANCHOR_PATTERN: &str = r"(</TablixBody>)\s*(<DataSetName>)";

/// Nesting depth of the hierarchy blocks inside `<Tablix>`.
const INDENT: &str = "            ";
const MEMBER_PLACEHOLDER: &str = "                <TablixMember />";

pub const ALREADY_FIXED: &str = "already has hierarchy";
pub const NO_TABLIX: &str = "no tabular region found";
pub const NO_INSERTION_POINT: &str = "insertion point not found";

/// Non-overlapping occurrences of `<TablixColumn>`.
pub fn count_columns(content: &str) -> usize {
    content.matches(COLUMN_MARKER).count()
}

pub fn has_hierarchy(content: &str) -> bool {
    content.contains(COLUMN_HIERARCHY_MARKER) && content.contains(ROW_HIERARCHY_MARKER)
}

/// True when exactly one of the two hierarchy blocks is present. Such a
/// document is still patched, which duplicates the block it already has.
pub fn has_partial_hierarchy(content: &str) -> bool {
    content.contains(COLUMN_HIERARCHY_MARKER) != content.contains(ROW_HIERARCHY_MARKER)
}

pub fn generate_hierarchy(num_columns: usize) -> String {
    let col_members = vec![MEMBER_PLACEHOLDER; num_columns].join("\n");

    format!(
        r#"            <TablixColumnHierarchy>
              <TablixMembers>
{col_members}
              </TablixMembers>
            </TablixColumnHierarchy>
            <TablixRowHierarchy>
              <TablixMembers>
                <TablixMember>
                  <KeepWithGroup>After</KeepWithGroup>
                </TablixMember>
                <TablixMember>
                  <Group Name="Details" />
                </TablixMember>
              </TablixMembers>
            </TablixRowHierarchy>"#
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    AlreadyHasHierarchy,
    NoTablix,
    NoInsertionPoint,
    Patched { content: String, columns: usize },
}

impl Patch {
    fn into_result(self, dry_run: bool) -> (FixResult, Option<String>) {
        match self {
            Patch::AlreadyHasHierarchy => (skipped(ALREADY_FIXED), None),
            Patch::NoTablix => (skipped(NO_TABLIX), None),
            Patch::NoInsertionPoint => (skipped(NO_INSERTION_POINT), None),
            Patch::Patched { content, columns } => {
                let description = if dry_run {
                    format!("would patch {} columns", columns)
                } else {
                    format!("fixed: patched {} columns", columns)
                };
                (FixResult::Applied { description }, Some(content))
            }
        }
    }
}

fn write_back(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

fn skipped(reason: &str) -> FixResult {
    FixResult::Skipped {
        reason: reason.to_string(),
    }
}

pub struct TablixHierarchyFixer {
    anchor: Regex,
}

impl TablixHierarchyFixer {
    pub fn new() -> Result<Self> {
        let anchor = Regex::new(ANCHOR_PATTERN).context("invalid anchor pattern")?;
        Ok(Self { anchor })
    }

    /// Computes the patched text without touching the filesystem.
    pub fn patch(&self, content: &str) -> Patch {
        if has_hierarchy(content) {
            return Patch::AlreadyHasHierarchy;
        }

        let columns = count_columns(content);
        if columns == 0 {
            return Patch::NoTablix;
        }

        let hierarchy = generate_hierarchy(columns);

        if !self.anchor.is_match(content) {
            return Patch::NoInsertionPoint;
        }

        let patched = self
            .anchor
            .replace_all(content, |caps: &Captures| {
                format!("{}\n{}\n{}{}", &caps[1], hierarchy, INDENT, &caps[2])
            })
            .into_owned();

        Patch::Patched {
            content: patched,
            columns,
        }
    }

    fn run(&self, path: &Path, dry_run: bool) -> Result<FixResult> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        if has_partial_hierarchy(&content) {
            warn!(
                file = %path.display(),
                "only one hierarchy block present; patching will duplicate it"
            );
        }

        let (result, patched) = self.patch(&content).into_result(dry_run);

        match (&result, patched) {
            (FixResult::Applied { .. }, Some(new_content)) if !dry_run => {
                write_back(path, &new_content)?;
                info!(file = %path.display(), "patched report");
            }
            (FixResult::Skipped { reason }, _) => {
                debug!(file = %path.display(), reason = %reason, "skipped report");
            }
            _ => {
                debug!(file = %path.display(), "dry run, report left unchanged");
            }
        }

        Ok(result)
    }
}

impl Fixer for TablixHierarchyFixer {
    fn name(&self) -> &'static str {
        "tablix-hierarchy"
    }

    fn describe(&self, path: &Path) -> Result<FixResult> {
        self.run(path, true)
    }

    fn apply(&self, path: &Path) -> Result<FixResult> {
        self.run(path, false)
    }
}
