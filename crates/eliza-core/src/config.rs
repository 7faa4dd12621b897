use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::Result;

/// Top-level configuration for the ELIZA application.
///
/// Loaded from `~/.eliza/config.toml` by default. Every section is optional;
/// missing keys fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElizaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl ElizaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ElizaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}

/// General application settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Fixed seed for reply selection. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            seed: None,
        }
    }
}

/// Location of the response data files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the verb table and the filler responses.
    pub data_dir: String,
    /// JSON object mapping first-person singular forms to second-person plural.
    pub verbs_file: String,
    /// JSON array of filler responses.
    pub fillers_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            verbs_file: "verbs.json".to_string(),
            fillers_file: "random.json".to_string(),
        }
    }
}

impl DataConfig {
    pub fn verbs_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.verbs_file)
    }

    pub fn fillers_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.fillers_file)
    }
}

/// Search settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Strategy used when a search command does not name one:
    /// "substring", "word" or "regex".
    pub default_strategy: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_strategy: "substring".to_string(),
        }
    }
}
