//! Configuration management for Cinder
//!
//! This module handles loading and saving project-specific configuration
//! stored in `.cinder/config.toml`, and resolving the project root from the
//! `CINDER_PROJECT_DIR` environment variable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the project directory the assistant works in.
pub const PROJECT_DIR_ENV: &str = "CINDER_PROJECT_DIR";

/// Errors that can occur during configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error while reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure for Cinder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Project-specific settings
    #[serde(default)]
    pub project: ProjectConfig,

    /// AI agent settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// URL fetcher settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Project-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Project name
    pub name: Option<String>,

    /// Project root directory
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

/// AI agent configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Model to use (e.g., "claude-sonnet-4-20250514")
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Maximum tool-use round trips per user turn
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> usize {
    4096
}

fn default_max_turns() -> u32 {
    25
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            max_turns: default_max_turns(),
        }
    }
}

/// URL fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum characters of extracted text returned to the model
    #[serde(default = "default_fetch_max_chars")]
    pub max_chars: usize,
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_fetch_max_chars() -> usize {
    12000
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout_secs(),
            max_chars: default_fetch_max_chars(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            agent: AgentConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a `.cinder` directory under the project root
    pub fn load<P: AsRef<Path>>(project_root: P) -> Result<Self, ConfigError> {
        let config_path = project_root.as_ref().join(".cinder").join("config.toml");

        if !config_path.exists() {
            // Return default config if file doesn't exist
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            let mut config = Config::default();
            config.project.root = Some(project_root.as_ref().to_path_buf());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.project.root = Some(project_root.as_ref().to_path_buf());
        tracing::debug!(path = %config_path.display(), "loaded config");

        Ok(config)
    }

    /// Save configuration to a `.cinder` directory under the project root
    pub fn save<P: AsRef<Path>>(&self, project_root: P) -> Result<(), ConfigError> {
        let config_dir = project_root.as_ref().join(".cinder");
        let config_path = config_dir.join("config.toml");

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        tracing::debug!(path = %config_path.display(), "saved config");

        Ok(())
    }

    /// Get the project root, falling back to the current directory
    pub fn project_root(&self) -> PathBuf {
        self.project
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Resolve the project root from `CINDER_PROJECT_DIR`, falling back to the
/// process working directory.
pub fn project_root_from_env() -> PathBuf {
    std::env::var_os(PROJECT_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.model, "claude-sonnet-4-20250514");
        assert_eq!(config.agent.max_tokens, 4096);
        assert_eq!(config.agent.max_turns, 25);
        assert_eq!(config.fetch.timeout_secs, 10);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let project_root = temp_dir.path();

        let mut config = Config::default();
        config.project.name = Some("TestProject".to_string());
        config.agent.model = "claude-opus-4".to_string();

        config.save(project_root).unwrap();

        let loaded_config = Config::load(project_root).unwrap();
        assert_eq!(loaded_config.project.name, Some("TestProject".to_string()));
        assert_eq!(loaded_config.agent.model, "claude-opus-4");
    }

    #[test]
    fn test_config_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let project_root = temp_dir.path();

        // Should return default config when file doesn't exist
        let config = Config::load(project_root).unwrap();
        assert_eq!(config.agent.model, "claude-sonnet-4-20250514");
        assert_eq!(config.project.root, Some(project_root.to_path_buf()));
    }

    #[test]
    fn test_partial_config_uses_field_defaults() {
        let config: Config = toml::from_str("[agent]\nmodel = \"claude-haiku-4\"\n").unwrap();
        assert_eq!(config.agent.model, "claude-haiku-4");
        assert_eq!(config.agent.max_tokens, 4096);
        assert_eq!(config.fetch.max_chars, 12000);
    }
}
