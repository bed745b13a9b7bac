use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const KEYS: [&str; 4] = ["snapshot_path", "api_base_url", "api_key", "log_file"];

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_config_file_path()?)
    }

    /// A missing file yields the default configuration.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&get_config_file_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = toml::to_string(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(config_path, content)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        let value = match key {
            "snapshot_path" => &self.snapshot_path,
            "api_base_url" => &self.api_base_url,
            "api_key" => &self.api_key,
            "log_file" => &self.log_file,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value.as_deref())
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        let slot = match key {
            "snapshot_path" => &mut self.snapshot_path,
            "api_base_url" => &mut self.api_base_url,
            "api_key" => &mut self.api_key,
            "log_file" => &mut self.log_file,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        *slot = if value.is_empty() { None } else { Some(value) };
        Ok(())
    }

    /// Base URL and key, when both are configured.
    pub fn remote(&self) -> Option<(&str, &str)> {
        match (self.api_base_url.as_deref(), self.api_key.as_deref()) {
            (Some(url), Some(key)) => Some((url, key)),
            _ => None,
        }
    }
}

fn get_config_file_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?;

    Ok(config_dir.join("todo").join("config.toml"))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find config directory")]
    ConfigDirNotFound,
    #[error("Unknown configuration key '{0}'. Supported keys: snapshot_path, api_base_url, api_key, log_file")]
    UnknownKey(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Failed to parse config file: {0}")]
    ParseError(String),
    #[error("Failed to serialize config: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo").join("config.toml");

        let mut config = Config::default();
        config.set("api_base_url", "http://localhost:8080".to_string()).unwrap();
        config.set("api_key", "secret".to_string()).unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.remote(), Some(("http://localhost:8080", "secret")));
    }

    #[test]
    fn test_unknown_key() {
        let mut config = Config::default();
        assert!(matches!(config.get("file_path"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            config.set("file_path", "x".to_string()),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_empty_value_unsets_key() {
        let mut config = Config::default();
        config.set("log_file", "/tmp/todo.log".to_string()).unwrap();
        assert_eq!(config.get("log_file").unwrap(), Some("/tmp/todo.log"));

        config.set("log_file", String::new()).unwrap();
        assert_eq!(config.get("log_file").unwrap(), None);
    }

    #[test]
    fn test_remote_requires_both_values() {
        let mut config = Config::default();
        config.set("api_base_url", "http://localhost".to_string()).unwrap();
        assert_eq!(config.remote(), None);
    }

    #[test]
    fn test_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "snapshot_path = [").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseError(_))));
    }
}
