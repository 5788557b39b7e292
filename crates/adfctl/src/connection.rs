//! Connection management: profile resolution and client construction

use crate::cli::ScopeArgs;
use crate::error::{AdfCtlError, Result as CliResult};
use anyhow::Context;
use datafactory_core::{DataFactoryClient, DataFactoryClientBuilder};
use datafactory_core::config::config::{ENV_ACCESS_TOKEN, ENV_SUBSCRIPTION_ID};
use datafactory_core::config::{Config, Profile, ResolvedProfile};
use std::path::PathBuf;
use tracing::{debug, info};

/// User agent string for adfctl HTTP requests
const ADFCTL_USER_AGENT: &str = concat!("adfctl/", env!("CARGO_PKG_VERSION"));

/// Resource group and data factory after flag/profile fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub resource_group: String,
    pub data_factory: String,
}

/// Connection manager for creating authenticated clients
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    /// Create a connection manager; an explicit `config_path` disables env overrides
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save the configuration to the appropriate location
    pub fn save_config(&self, config: &Config) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            config
                .save_to_path(path)
                .context("Failed to save configuration")?;
        } else {
            config.save().context("Failed to save configuration")?;
        }
        Ok(())
    }

    /// Path of the config file in use
    pub fn effective_config_path(&self) -> CliResult<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }

    /// Resolve the profile a command should run against
    ///
    /// When --config-file is given, environment variables are ignored so the
    /// file alone decides. Otherwise, with no profiles configured,
    /// `AZURE_SUBSCRIPTION_ID` and `AZURE_ACCESS_TOKEN` together stand in for one.
    pub fn resolve_profile(&self, profile_name: Option<&str>) -> CliResult<ResolvedProfile> {
        let use_env_vars = self.config_path.is_none();
        debug!(
            "Config path: {:?}, use_env_vars: {}",
            self.config_path, use_env_vars
        );

        if use_env_vars && profile_name.is_none() && self.config.profiles.is_empty() {
            let subscription = std::env::var(ENV_SUBSCRIPTION_ID).ok();
            let token = std::env::var(ENV_ACCESS_TOKEN).ok();
            if let (Some(subscription), Some(token)) = (subscription, token) {
                info!("Using credentials from environment variables");
                return Ok(Profile::new(subscription, token).resolve(true)?);
            }
        }

        let (name, profile) = self.config.resolve_profile(profile_name)?;
        info!("Using profile: {}", name);
        Ok(profile.resolve(use_env_vars)?)
    }

    /// Build a client for the resolved profile
    pub fn create_client(&self, profile: &ResolvedProfile) -> CliResult<DataFactoryClient> {
        let client = DataFactoryClientBuilder::from_profile(profile)
            .user_agent(ADFCTL_USER_AGENT)
            .build()?;
        Ok(client)
    }

    /// Fill resource group and factory from flags, then from the profile
    pub fn resolve_target(&self, args: &ScopeArgs, profile: &ResolvedProfile) -> CliResult<Target> {
        let resource_group = args
            .resource_group
            .clone()
            .or_else(|| profile.resource_group.clone())
            .ok_or(AdfCtlError::MissingScope {
                what: "resource group",
                flag: "--resource-group",
                field: "resource_group",
            })?;
        let data_factory = args
            .factory
            .clone()
            .or_else(|| profile.data_factory.clone())
            .ok_or(AdfCtlError::MissingScope {
                what: "data factory",
                flag: "--factory",
                field: "data_factory",
            })?;

        Ok(Target {
            resource_group,
            data_factory,
        })
    }
}
