use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::cli::output::{OutputFormatter, RunReport};
use crate::cli::progress::FixProgress;
use crate::core::config::Config;
use crate::fixers::default_runner;
use crate::fixers::runner::RunSummary;
use crate::utils::fs::find_files_with_extension;

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Directory containing the reports (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Print what would be fixed without modifying files
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,
}

pub fn execute(args: &FixArgs) -> Result<RunSummary> {
    let stdout = std::io::stdout();
    run(args, &mut stdout.lock())
}

fn run<W: Write>(args: &FixArgs, out: &mut W) -> Result<RunSummary> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("cannot open {}", args.path.display()))?;
    let config = Config::load(&root)?;

    let progress = FixProgress::new();
    progress.set_discovering(&root);
    let files = find_files_with_extension(&root, config.extension(), config.ignored_paths());
    let files = match files {
        Ok(files) => files,
        Err(e) => {
            progress.finish();
            return Err(e);
        }
    };
    info!(count = files.len(), root = %root.display(), "discovered reports");

    let formatter = OutputFormatter::new(&args.format);
    let runner = default_runner()?;
    let results = progress
        .suspend(|| formatter.header(out, files.len(), config.extension()))
        .and_then(|()| {
            runner.run(
                &files,
                args.dry_run,
                |path| progress.set_file(path),
                |path, outcome| progress.suspend(|| formatter.file(out, path, outcome)),
            )
        });
    progress.finish();
    let results = results?;

    let report = RunReport {
        root: &root,
        results: &results,
        dry_run: args.dry_run,
    };
    formatter.finish(out, &report)?;

    Ok(report.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BROKEN: &str = "<Tablix>\n<TablixColumn><Width>2in</Width></TablixColumn>\n</TablixBody>\n          <DataSetName>Hosts</DataSetName>\n</Tablix>\n";

    fn args(tmp: &TempDir, dry_run: bool) -> FixArgs {
        FixArgs {
            path: tmp.path().to_path_buf(),
            dry_run,
            format: "json".to_string(),
        }
    }

    #[test]
    fn test_fix_patches_reports_in_tree() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("capacity")).unwrap();
        fs::write(tmp.path().join("capacity/Hosts.rdl"), BROKEN).unwrap();
        fs::write(tmp.path().join("Empty.rdl"), "<Report />").unwrap();
        fs::write(tmp.path().join("readme.txt"), BROKEN).unwrap();

        let summary = execute(&args(&tmp, false)).unwrap();

        assert_eq!(summary.fixed, 1);
        assert_eq!(summary.skipped, 1);
        let patched = fs::read_to_string(tmp.path().join("capacity/Hosts.rdl")).unwrap();
        assert!(patched.contains("<TablixRowHierarchy>"));
        assert_eq!(
            fs::read_to_string(tmp.path().join("readme.txt")).unwrap(),
            BROKEN
        );
    }

    #[test]
    fn test_second_run_skips_everything() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Hosts.rdl"), BROKEN).unwrap();

        execute(&args(&tmp, false)).unwrap();
        let after_first = fs::read_to_string(tmp.path().join("Hosts.rdl")).unwrap();
        let summary = execute(&args(&tmp, false)).unwrap();

        assert_eq!(summary.fixed, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            fs::read_to_string(tmp.path().join("Hosts.rdl")).unwrap(),
            after_first
        );
    }

    #[test]
    fn test_dry_run_leaves_files_untouched() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Hosts.rdl"), BROKEN).unwrap();

        let summary = execute(&args(&tmp, true)).unwrap();

        assert_eq!(summary.dry_run, 1);
        assert_eq!(summary.fixed, 0);
        assert_eq!(
            fs::read_to_string(tmp.path().join("Hosts.rdl")).unwrap(),
            BROKEN
        );
    }

    #[test]
    fn test_config_extension_is_honored() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".rdlfix.yml"), "extension: rdlc\n").unwrap();
        fs::write(tmp.path().join("Local.rdlc"), BROKEN).unwrap();
        fs::write(tmp.path().join("Server.rdl"), BROKEN).unwrap();

        let summary = execute(&args(&tmp, false)).unwrap();

        assert_eq!(summary.fixed, 1);
        assert_eq!(
            fs::read_to_string(tmp.path().join("Server.rdl")).unwrap(),
            BROKEN
        );
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let args = FixArgs {
            path: tmp.path().join("nope"),
            dry_run: false,
            format: "table".to_string(),
        };
        assert!(execute(&args).is_err());
    }

    #[test]
    fn test_table_lines_are_written_before_a_fatal_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("A.rdl"), BROKEN).unwrap();
        fs::write(tmp.path().join("B.rdl"), [0xff, 0xfe]).unwrap();
        let args = FixArgs {
            path: tmp.path().to_path_buf(),
            dry_run: false,
            format: "table".to_string(),
        };

        let mut out = Vec::new();
        let err = run(&args, &mut out).unwrap_err();

        assert!(err.to_string().contains("failed to read"));
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Found 2 RDL files");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("FIXED") && lines[2].contains("A.rdl"));
        assert!(!text.contains("Fixed:"));
        let patched = fs::read_to_string(tmp.path().join("A.rdl")).unwrap();
        assert!(patched.contains("<TablixRowHierarchy>"));
    }
}
