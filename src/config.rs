use crate::exclusion::HiddenNames;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub config_version: u32,
    /// Names and extensions always left out of the colorized tree.
    pub hidden_names: Vec<String>,
    pub select_all_on_start: bool,
    pub export_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: 1,
            hidden_names: vec![".git".to_string(), ".DS_Store".to_string()],
            select_all_on_start: true,
            export_file_name: "tree.txt".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_or_default() -> Result<Self> {
        let path = config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        let parsed = toml::from_str::<AppConfig>(&raw)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;

        Ok(parsed)
    }

    pub fn hidden(&self) -> HiddenNames {
        self.hidden_names.iter().collect()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("could not resolve config directory")?;
    Ok(base.join("dirviz").join("config.toml"))
}
