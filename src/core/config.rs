use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = ".rdlfix.yml";
pub const DEFAULT_EXTENSION: &str = "rdl";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub extension: Option<String>,
    pub ignore: Option<IgnoreConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    pub paths: Option<Vec<String>>,
}

impl Config {
    /// Loads `.rdlfix.yml` from the scan root. A missing file yields the
    /// defaults; a file that exists but does not parse is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config = serde_yaml::from_str::<Config>(&content)
            .with_context(|| format!("invalid config in {}", config_path.display()))?;
        Ok(config)
    }

    pub fn extension(&self) -> &str {
        self.extension
            .as_deref()
            .map(|e| e.trim_start_matches('.'))
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_EXTENSION)
    }

    pub fn ignored_paths(&self) -> &[String] {
        self.ignore
            .as_ref()
            .and_then(|i| i.paths.as_deref())
            .unwrap_or(&[])
    }
}
