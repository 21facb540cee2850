use anyhow::{Context, Result};
use chromakit_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the application directory.
pub const HOME_ENV: &str = "CHROMAKIT_HOME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_log_retention")]
    pub log_retention_count: usize,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_log_retention() -> usize {
    10
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_retention_count: default_log_retention(),
            engine: EngineConfig::default(),
        }
    }
}

pub struct Settings {
    config_path: PathBuf,
    pub app_data_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl Settings {
    /// Resolve the application directory from `CHROMAKIT_HOME`, falling back
    /// to `./.chromakit`.
    pub fn new() -> Result<Self> {
        let app_data_dir = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".chromakit"));
        Self::at(app_data_dir)
    }

    pub fn at<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let app_data_dir = dir.as_ref().to_path_buf();
        let config_path = app_data_dir.join("config.json");
        let logs_dir = app_data_dir.join("logs");

        fs::create_dir_all(&app_data_dir)
            .context("Failed to create app data directory")?;
        fs::create_dir_all(&logs_dir)
            .context("Failed to create logs directory")?;

        Ok(Self {
            config_path,
            app_data_dir,
            logs_dir,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<AppSettings> {
        if !self.config_path.exists() {
            return Ok(AppSettings::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .context("Failed to read config file")?;

        let settings: AppSettings = serde_json::from_str(&content)
            .context("Failed to parse config file")?;

        settings.engine.validate()
            .context("Invalid engine section in config file")?;

        Ok(settings)
    }

    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)
            .context("Failed to serialize config")?;

        fs::write(&self.config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }
}
