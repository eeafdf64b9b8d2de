//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::application::messaging::parser::DEFAULT_SIGILS;

/// Bridge configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub server: ServerConfig,
    pub commands: CommandsConfig,
    pub storage: StorageConfig,
    pub lang: LangConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub name: String,
    /// Shown when a plugin takes over one of the game's own commands
    pub game_name: String,
    /// Ignore the host's own local player
    pub dedicated: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CommandsConfig {
    /// Names no plugin may register
    pub restricted: Vec<String>,
    pub sigils: Vec<char>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LangConfig {
    pub default: String,
    /// language -> key -> template
    pub messages: HashMap<String, HashMap<String, String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "My plugbridge Server".to_string(),
            game_name: "the game".to_string(),
            dedicated: false,
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            restricted: Vec::new(),
            sigils: DEFAULT_SIGILS.to_vec(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/players.json"),
        }
    }
}

impl Default for LangConfig {
    fn default() -> Self {
        Self {
            default: "en".to_string(),
            messages: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(name) = std::env::var("PLUGBRIDGE_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(path) = std::env::var("PLUGBRIDGE_STORE") {
            config.storage.path = PathBuf::from(path);
        }

        config
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.commands.sigils.is_empty() {
            return Err(ConfigError::InvalidValue(
                "commands.sigils must name at least one prefix".to_string(),
            ));
        }
        if self.commands.sigils.iter().any(|c| c.is_whitespace() || *c == '"') {
            return Err(ConfigError::InvalidValue(
                "commands.sigils may not contain whitespace or quotes".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml(
            "server:\n  game-name: Test Game\n  dedicated: true\ncommands:\n  restricted: [quit, save]\n",
        )
        .unwrap();

        assert_eq!(config.server.game_name, "Test Game");
        assert!(config.server.dedicated);
        assert_eq!(config.commands.restricted, vec!["quit", "save"]);
        assert_eq!(config.commands.sigils, vec!['/', '!']);
        assert_eq!(config.storage.path, PathBuf::from("data/players.json"));
        assert_eq!(config.lang.default, "en");
    }

    #[test]
    fn test_rejects_empty_sigils() {
        let err = Config::from_yaml("commands:\n  sigils: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.server.name, Config::default().server.name);
        assert_eq!(config.commands.sigils, DEFAULT_SIGILS.to_vec());
    }
}
