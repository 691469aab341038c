//! Configuration management for resume fit

use crate::error::{Result, ResumeFitError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub thresholds: ThresholdConfig,
    pub input: InputConfig,
    pub remote: RemoteConfig,
    pub output: OutputConfig,
    pub tracker: TrackerConfig,
}

/// Score cutoffs shared by the evaluator and the aggregator.
///
/// Every cutoff is an inclusive lower bound: an overall score of exactly
/// `strong_cutoff` is a strong match, a requirement score of exactly
/// `status_yes_cutoff` is a `Yes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub strong_cutoff: u8,
    pub moderate_cutoff: u8,
    pub status_yes_cutoff: u8,
    pub status_partial_cutoff: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Minimum trimmed character count for both the resume and the job description
    pub min_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub data_file: PathBuf,
}

/// Written in lowercase, matching the values `--output` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    #[serde(alias = "md")]
    Markdown,
    Html,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            strong_cutoff: 71,
            moderate_cutoff: 40,
            status_yes_cutoff: 60,
            status_partial_cutoff: 30,
        }
    }
}

impl ThresholdConfig {
    /// Reject tables whose tiers overlap or leave part of [0, 100] unmapped.
    pub fn validate(&self) -> Result<()> {
        if !(0 < self.moderate_cutoff
            && self.moderate_cutoff < self.strong_cutoff
            && self.strong_cutoff <= 100)
        {
            return Err(ResumeFitError::Configuration(format!(
                "classification cutoffs must satisfy 0 < moderate ({}) < strong ({}) <= 100",
                self.moderate_cutoff, self.strong_cutoff
            )));
        }
        if !(0 < self.status_partial_cutoff
            && self.status_partial_cutoff < self.status_yes_cutoff
            && self.status_yes_cutoff <= 100)
        {
            return Err(ResumeFitError::Configuration(format!(
                "status cutoffs must satisfy 0 < partial ({}) < yes ({}) <= 100",
                self.status_partial_cutoff, self.status_yes_cutoff
            )));
        }
        Ok(())
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
            max_tokens: 1200,
            temperature: 0.3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_file = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-fit")
            .join("applications.json");

        Self {
            thresholds: ThresholdConfig::default(),
            input: InputConfig { min_chars: 50 },
            remote: RemoteConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
            tracker: TrackerConfig { data_file },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path, writing defaults there when the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeFitError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeFitError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-fit")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if self.remote.timeout_secs == 0 {
            return Err(ResumeFitError::Configuration(
                "remote.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Update a single value addressed by a dotted key such as
    /// `thresholds.strong_cutoff`. The result is revalidated before it
    /// replaces `self`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut root = toml::Value::try_from(&*self)
            .map_err(|e| ResumeFitError::Configuration(e.to_string()))?;

        let mut slot = &mut root;
        for part in key.split('.') {
            slot = slot
                .get_mut(part)
                .ok_or_else(|| ResumeFitError::Configuration(format!("Unknown configuration key: {}", key)))?;
        }
        if slot.is_table() {
            return Err(ResumeFitError::Configuration(format!(
                "{} is a section, not a value",
                key
            )));
        }
        *slot = parse_value_like(slot, value)?;

        let updated: Config = root
            .try_into()
            .map_err(|e| ResumeFitError::Configuration(format!("Invalid value for {}: {}", key, e)))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// Parse `raw` into the same TOML type as the value it replaces.
fn parse_value_like(current: &toml::Value, raw: &str) -> Result<toml::Value> {
    let invalid = |kind: &str| ResumeFitError::Configuration(format!("Expected {} but got '{}'", kind, raw));
    match current {
        toml::Value::Boolean(_) => raw.parse::<bool>().map(toml::Value::Boolean).map_err(|_| invalid("a boolean")),
        toml::Value::Integer(_) => raw.parse::<i64>().map(toml::Value::Integer).map_err(|_| invalid("an integer")),
        toml::Value::Float(_) => raw.parse::<f64>().map(toml::Value::Float).map_err(|_| invalid("a number")),
        _ => Ok(toml::Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds.strong_cutoff, 71);
        assert_eq!(config.input.min_chars, 50);
        assert!(!config.remote.enabled);
    }

    #[test]
    fn test_overlapping_thresholds_rejected() {
        let thresholds = ThresholdConfig {
            strong_cutoff: 40,
            moderate_cutoff: 40,
            ..ThresholdConfig::default()
        };
        assert!(thresholds.validate().is_err());

        let thresholds = ThresholdConfig {
            status_yes_cutoff: 20,
            status_partial_cutoff: 30,
            ..ThresholdConfig::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_set_dotted_key() {
        let mut config = Config::default();
        config.set("thresholds.strong_cutoff", "80").unwrap();
        assert_eq!(config.thresholds.strong_cutoff, 80);

        config.set("remote.enabled", "true").unwrap();
        assert!(config.remote.enabled);

        config.set("remote.model", "gpt-4o-mini").unwrap();
        assert_eq!(config.remote.model, "gpt-4o-mini");
    }

    #[test]
    fn test_output_format_uses_cli_spelling() {
        let mut config = Config::default();
        config.set("output.format", "json").unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);

        config.set("output.format", "md").unwrap();
        assert_eq!(config.output.format, OutputFormat::Markdown);

        let written = toml::to_string(&config).unwrap();
        assert!(written.contains("format = \"markdown\""));
        assert!(config.set("output.format", "Console").is_err());
    }

    #[test]
    fn test_set_rejects_unknown_and_invalid() {
        let mut config = Config::default();
        assert!(config.set("thresholds.missing", "1").is_err());
        assert!(config.set("thresholds", "1").is_err());
        assert!(config.set("remote.enabled", "maybe").is_err());
        // Would make moderate >= strong
        assert!(config.set("thresholds.moderate_cutoff", "90").is_err());
        assert_eq!(config.thresholds.moderate_cutoff, 40);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.thresholds, ThresholdConfig::default());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.remote.model, config.remote.model);
    }
}
