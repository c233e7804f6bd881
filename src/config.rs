//! Configuration loading and management
//!
//! Handles parsing of `trellolite.toml` from the data directory.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Assistant configuration
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// File name of the persisted state inside the data directory
    #[serde(default = "default_state_file")]
    pub file: String,
}

fn default_state_file() -> String {
    crate::storage::STATE_FILE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: default_state_file(),
        }
    }
}

/// Assistant-related configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Shell command that answers assistant requests over stdin/stdout
    #[serde(default)]
    pub command: Option<String>,

    /// How long to wait for a reply (e.g. "30s", "2m")
    #[serde(default = "default_assistant_timeout")]
    pub timeout: String,

    /// How many recent task titles go into the request context
    #[serde(default = "default_recent_tasks")]
    pub recent_tasks: usize,
}

fn default_assistant_timeout() -> String {
    "30s".to_string()
}

fn default_recent_tasks() -> usize {
    20
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout: default_assistant_timeout(),
            recent_tasks: default_recent_tasks(),
        }
    }
}

impl AssistantConfig {
    /// Parsed [`AssistantConfig::timeout`]
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout)
    }

    fn validate(&self) -> Result<()> {
        if let Some(command) = &self.command {
            if command.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "assistant.command cannot be empty".to_string(),
                ));
            }
        }
        let timeout = parse_duration(&self.timeout)
            .map_err(|err| Error::InvalidConfig(format!("assistant.timeout: {err}")))?;
        if timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "assistant.timeout must be > 0".to_string(),
            ));
        }
        if self.recent_tasks == 0 {
            return Err(Error::InvalidConfig(
                "assistant.recent_tasks must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        let file = self.file.trim();
        if file.is_empty() {
            return Err(Error::InvalidConfig(
                "storage.file cannot be empty".to_string(),
            ));
        }
        if file == "." || file == ".." {
            return Err(Error::InvalidConfig(format!(
                "storage.file must name a file, got '{file}'"
            )));
        }
        if file.contains(['/', '\\']) {
            return Err(Error::InvalidConfig(format!(
                "storage.file must be a plain file name, got '{file}'"
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `trellolite.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a data directory, or return defaults when the
    /// file is missing
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(crate::storage::CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.assistant.validate()?;
        Ok(())
    }
}

/// Parse a duration like "30s", "5m", "1h"; bare numbers are seconds
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidArgument("Duration cannot be empty".to_string()));
    }

    let (num_str, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(pos) => (&s[..pos], s[pos..].trim()),
        None => (s, "s"),
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("Invalid duration number: {num_str}")))?;

    let secs = match unit.to_lowercase().as_str() {
        "ms" => return Ok(Duration::from_millis(num)),
        "s" | "sec" | "second" | "seconds" => num,
        "m" | "min" | "minute" | "minutes" => num * 60,
        "h" | "hr" | "hour" | "hours" => num * 3600,
        _ => {
            return Err(Error::InvalidArgument(format!(
                "Invalid duration unit '{unit}'. Expected: ms, s, m, h"
            )));
        }
    };
    Ok(Duration::from_secs(secs))
}
