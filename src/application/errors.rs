//! Application layer errors

use thiserror::Error;

/// General bridge errors
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Host error: {0}")]
    Host(String),
}

/// Command registration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command '{0}' is restricted and cannot be registered")]
    Restricted(String),

    #[error("Command '{0}' belongs to the core plugin and cannot be overridden")]
    Locked(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Plugin lifecycle errors
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin '{0}' already loaded")]
    AlreadyLoaded(String),

    #[error("Plugin '{0}' not found")]
    NotFound(String),

    #[error("Plugin '{plugin}' failed to register commands: {source}")]
    Command {
        plugin: String,
        #[source]
        source: CommandError,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
