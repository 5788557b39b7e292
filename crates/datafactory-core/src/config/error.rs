//! Configuration errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write config file {path}: {source}")]
    SaveError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file is not valid TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Could not encode config as TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profiles configured. {suggestion}")]
    NoProfiles { suggestion: String },

    /// A profile secret could not be resolved
    #[error("{0}")]
    CredentialError(String),

    #[cfg(feature = "secure-storage")]
    #[error("OS keyring: {0}")]
    KeyringError(String),

    #[error("No platform config directory for adfctl")]
    ConfigDirError,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
