//! The `config.toml` file: named profiles and the default profile
//!
//! Secrets are resolved lazily by [`Profile::resolve`], so a file can name
//! profiles whose tokens are only present on some machines.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::credential::CredentialStore;
use super::error::{ConfigError, Result};
use super::long_running::LongRunningConfig;

/// Default Azure Resource Manager endpoint
pub const DEFAULT_API_URL: &str = "https://management.azure.com";

/// Default Data Factory management API version
pub const DEFAULT_API_VERSION: &str = "2015-10-01";

pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
pub const ENV_ACCESS_TOKEN: &str = "AZURE_ACCESS_TOKEN";
pub const ENV_API_URL: &str = "ADFCTL_API_URL";

/// Contents of `config.toml`
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is given explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    /// Subscription that owns the data factories
    pub subscription_id: String,
    /// Bearer token; may be a `keyring:` reference
    pub access_token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Resource group used when a command omits `--resource-group`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    /// Data factory used when a command omits `--factory`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_factory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_running: Option<LongRunningConfig>,
}

/// A profile with every secret resolved
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    pub subscription_id: String,
    pub access_token: String,
    pub api_url: String,
    pub api_version: String,
    pub resource_group: Option<String>,
    pub data_factory: Option<String>,
    pub long_running: LongRunningConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl Profile {
    pub fn new(subscription_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            access_token: access_token.into(),
            api_url: default_api_url(),
            api_version: default_api_version(),
            resource_group: None,
            data_factory: None,
            long_running: None,
        }
    }

    /// Check whether the token lives in the OS keyring
    pub fn uses_keyring(&self) -> bool {
        CredentialStore::is_keyring_reference(&self.access_token)
            || CredentialStore::is_keyring_reference(&self.subscription_id)
    }

    /// Resolve secrets, with environment overrides when `use_env` is set
    pub fn resolve(&self, use_env: bool) -> Result<ResolvedProfile> {
        let store = CredentialStore::new();
        let env = |var: &'static str| use_env.then_some(var);

        let subscription_id = store
            .resolve(&self.subscription_id, env(ENV_SUBSCRIPTION_ID))
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve subscription id: {}", e))
            })?;
        let access_token = store
            .resolve(&self.access_token, env(ENV_ACCESS_TOKEN))
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve access token: {}", e))
            })?;
        let api_url = store
            .resolve(&self.api_url, env(ENV_API_URL))
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve API URL: {}", e))
            })?;

        Ok(ResolvedProfile {
            subscription_id,
            access_token,
            api_url,
            api_version: self.api_version.clone(),
            resource_group: self.resource_group.clone(),
            data_factory: self.data_factory.clone(),
            long_running: self.long_running.clone().unwrap_or_default(),
        })
    }
}

impl Config {
    /// Resolve which profile a command should use
    ///
    /// Explicit name, then `default_profile`, then the first profile by name.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(name) = explicit {
            if !self.profiles.contains_key(name) {
                return Err(ConfigError::ProfileNotFound {
                    name: name.to_string(),
                });
            }
            return Ok(name.to_string());
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        self.list_profiles()
            .first()
            .map(|(name, _)| name.to_string())
            .ok_or_else(|| ConfigError::NoProfiles {
                suggestion: "Use 'adfctl profile set' to create a profile.".to_string(),
            })
    }

    /// Look up the profile a command should use
    pub fn resolve_profile(&self, explicit: Option<&str>) -> Result<(String, &Profile)> {
        let name = self.resolve_profile_name(explicit)?;
        let profile = self
            .profiles
            .get(&name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.clone() })?;
        Ok((name, profile))
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path; a missing file yields the default
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!("no config at {}, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded = Self::expand_env_vars(&content);
        Ok(toml::from_str(&expanded)?)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name, clearing the default if it pointed there
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, `~/.config/adfctl/config.toml` wins when it (or its directory)
    /// exists; otherwise the platform directory is used:
    ///
    /// On Linux: ~/.config/adfctl/config.toml
    /// On Windows: %APPDATA%\adfctl\adfctl\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("adfctl")
                    .join("config.toml");

                if linux_style_path.exists()
                    || linux_style_path
                        .parent()
                        .map(|p| p.exists())
                        .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("dev", "adfctl", "adfctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand `${VAR}` and `${VAR:-default}` references
    ///
    /// Unset variables without a default are left untouched so profiles that
    /// are never used don't need their variables exported.
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok()).to_string()
    }
}
