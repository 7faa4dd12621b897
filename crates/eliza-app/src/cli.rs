//! CLI argument definitions for the `eliza` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// ELIZA, a French-speaking Rogerian chatbot for the terminal.
#[derive(Parser, Debug)]
#[command(name = "eliza", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Directory holding verbs.json and random.json.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Seed for reply selection, for reproducible sessions.
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > ELIZA_CONFIG env var > ~/.eliza/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("ELIZA_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory.
    ///
    /// Returns `None` if not overridden (use the config value).
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Resolve the reply seed.
    ///
    /// Priority: --seed flag > ELIZA_SEED env var > config file value.
    pub fn resolve_seed(&self, config_seed: Option<u64>) -> Option<u64> {
        if self.seed.is_some() {
            return self.seed;
        }
        if let Ok(val) = std::env::var("ELIZA_SEED") {
            if let Ok(seed) = val.parse::<u64>() {
                return Some(seed);
            }
        }
        config_seed
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".eliza").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".eliza").join("config.toml");
    }
    PathBuf::from("config.toml")
}
