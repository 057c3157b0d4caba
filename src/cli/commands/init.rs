use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::core::config::{CONFIG_FILE, DEFAULT_EXTENSION};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory containing the reports (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing .rdlfix.yml
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: &InitArgs) -> Result<()> {
    let path = args
        .path
        .canonicalize()
        .with_context(|| format!("cannot open {}", args.path.display()))?;
    let config_path = path.join(CONFIG_FILE);

    if config_path.exists() && !args.force {
        println!(
            "  {} {} already exists. Use {} to overwrite.",
            "SKIP".yellow(),
            CONFIG_FILE,
            "--force".bold()
        );
        return Ok(());
    }

    std::fs::write(&config_path, generate_config())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!("  {} {} created", "DONE".green(), CONFIG_FILE);
    println!(
        "  Edit {} to change the report extension or ignored directories.",
        config_path.display()
    );

    Ok(())
}

fn generate_config() -> String {
    format!(
        r#"# rdlfix configuration

# Report file extension to scan for
extension: {DEFAULT_EXTENSION}

# Directories (by name) that are never descended into
ignore:
  paths:
    - bin
    - obj
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_config_file() {
        let tmp = TempDir::new().unwrap();
        let args = InitArgs {
            path: tmp.path().to_path_buf(),
            force: false,
        };
        execute(&args).unwrap();
        assert!(tmp.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_init_skips_existing_without_force() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "existing").unwrap();
        let args = InitArgs {
            path: tmp.path().to_path_buf(),
            force: false,
        };
        execute(&args).unwrap();
        let content = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "existing");
    }

    #[test]
    fn test_init_overwrites_with_force() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "old").unwrap();
        let args = InitArgs {
            path: tmp.path().to_path_buf(),
            force: true,
        };
        execute(&args).unwrap();
        let content = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(content.contains("extension: rdl"));
    }

    #[test]
    fn test_generated_config_round_trips_through_loader() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), generate_config()).unwrap();
        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.extension(), "rdl");
        assert_eq!(
            config.ignored_paths(),
            &["bin".to_string(), "obj".to_string()]
        );
    }
}
