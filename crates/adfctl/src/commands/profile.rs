//! Profile management command implementations

use crate::cli::{OutputFormat, ProfileCommands};
use crate::connection::ConnectionManager;
use crate::error::{AdfCtlError, Result as CliResult};
use crate::output;
use datafactory_core::config::credential::KEYRING_PREFIX;
use datafactory_core::config::{Config, CredentialStore, LongRunningConfig, Profile};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, info};

/// Handle profile management commands
pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    use ProfileCommands::*;

    match profile_cmd {
        List => handle_list(conn_mgr, output_format),
        Path => handle_path(conn_mgr, output_format),
        Show { name } => handle_show(conn_mgr, name, output_format),
        Set {
            name,
            subscription_id,
            access_token,
            api_url,
            api_version,
            resource_group,
            factory,
            initial_delay,
            retry_delay,
            timeout,
            default,
            #[cfg(feature = "secure-storage")]
            use_keyring,
        } => {
            let mut profile = Profile::new(subscription_id, access_token);
            profile.api_url = api_url.clone();
            profile.api_version = api_version.clone();
            profile.resource_group = resource_group.clone();
            profile.data_factory = factory.clone();
            profile.long_running = long_running_settings(*initial_delay, *retry_delay, *timeout);

            #[cfg(feature = "secure-storage")]
            let stored_token = if *use_keyring {
                let store = CredentialStore::with_keyring();
                let stored = store.store(&token_entry(name), access_token)?;
                info!("Access token stored via {}", store.storage().as_str());
                stored
            } else {
                access_token.clone()
            };
            #[cfg(feature = "secure-storage")]
            {
                profile.access_token = stored_token;
            }

            handle_set(conn_mgr, name, profile, *default)
        }
        Remove { name, yes } => handle_remove(conn_mgr, name, *yes),
        Default { name } => handle_default(conn_mgr, name),
    }
}

/// Keyring entry that holds a profile's access token
#[cfg_attr(not(feature = "secure-storage"), allow(dead_code))]
fn token_entry(profile_name: &str) -> String {
    format!("{profile_name}-access-token")
}

/// Polling overrides, or `None` when no flag was given
fn long_running_settings(
    initial_delay: Option<u64>,
    retry_delay: Option<u64>,
    timeout: Option<u64>,
) -> Option<LongRunningConfig> {
    if initial_delay.is_none() && retry_delay.is_none() && timeout.is_none() {
        return None;
    }

    let mut settings = LongRunningConfig::default();
    settings.initial_delay_secs = initial_delay;
    settings.retry_delay_secs = retry_delay;
    if let Some(timeout) = timeout {
        settings.timeout_secs = timeout;
    }
    Some(settings)
}

/// Show the token's first characters only, unless it points into the keyring
fn mask_token(token: &str) -> String {
    if CredentialStore::is_keyring_reference(token) {
        return token.to_string();
    }
    if token.chars().count() <= 4 {
        return "...".to_string();
    }
    let preview: String = token.chars().take(4).collect();
    format!("{}...", preview)
}

fn structured(output_format: OutputFormat) -> Option<output::OutputFormat> {
    match output_format {
        OutputFormat::Json => Some(output::OutputFormat::Json),
        OutputFormat::Yaml => Some(output::OutputFormat::Yaml),
        OutputFormat::Auto | OutputFormat::Table => None,
    }
}

#[derive(Debug, Serialize)]
struct ProfileSummary<'a> {
    name: &'a str,
    subscription_id: &'a str,
    api_url: &'a str,
    api_version: &'a str,
    resource_group: Option<&'a str>,
    data_factory: Option<&'a str>,
    is_default: bool,
}

impl<'a> ProfileSummary<'a> {
    fn new(config: &'a Config, name: &'a str, profile: &'a Profile) -> Self {
        Self {
            name,
            subscription_id: &profile.subscription_id,
            api_url: &profile.api_url,
            api_version: &profile.api_version,
            resource_group: profile.resource_group.as_deref(),
            data_factory: profile.data_factory.as_deref(),
            is_default: config.default_profile.as_deref() == Some(name),
        }
    }
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let config = &conn_mgr.config;
    let profiles: Vec<ProfileSummary<'_>> = config
        .list_profiles()
        .into_iter()
        .map(|(name, profile)| ProfileSummary::new(config, name, profile))
        .collect();

    if let Some(fmt) = structured(output_format) {
        let config_path = conn_mgr
            .effective_config_path()
            .ok()
            .map(|p| p.display().to_string());
        let output_data = serde_json::json!({
            "config_path": config_path,
            "profiles": profiles,
            "count": profiles.len(),
        });
        output::print_output(&output_data, fmt, None)?;
        return Ok(());
    }

    if let Ok(path) = conn_mgr.effective_config_path() {
        println!("Configuration file: {}", path.display());
        println!();
    }

    if profiles.is_empty() {
        info!("No profiles configured");
        println!("No profiles configured.");
        println!("Use 'adfctl profile set' to create a profile.");
        return Ok(());
    }

    let rows: Vec<serde_json::Value> = profiles
        .iter()
        .map(|p| {
            let marker = if p.is_default { "*" } else { "" };
            serde_json::json!({
                "default": marker,
                "name": p.name,
                "subscription": p.subscription_id,
                "resourceGroup": p.resource_group,
                "factory": p.data_factory,
            })
        })
        .collect();
    output::print_output(&rows, output::OutputFormat::Table, None)?;
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let config_path = conn_mgr.effective_config_path()?;

    match structured(output_format) {
        Some(fmt) => {
            let output_data = serde_json::json!({
                "config_path": config_path.display().to_string(),
            });
            output::print_output(&output_data, fmt, None)?;
        }
        None => println!("{}", config_path.display()),
    }
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let profile = conn_mgr
        .config
        .profiles
        .get(name)
        .ok_or_else(|| AdfCtlError::ProfileNotFound {
            name: name.to_string(),
        })?;

    let summary = ProfileSummary::new(&conn_mgr.config, name, profile);
    let mut output_data = serde_json::to_value(&summary)?;
    output_data["access_token"] = serde_json::json!(mask_token(&profile.access_token));
    if let Some(long_running) = &profile.long_running {
        output_data["long_running"] = serde_json::to_value(long_running)?;
    }

    let fmt = structured(output_format).unwrap_or(output::OutputFormat::Table);
    output::print_output(&output_data, fmt, None)?;
    Ok(())
}

fn handle_set(
    conn_mgr: &ConnectionManager,
    name: &str,
    profile: Profile,
    make_default: bool,
) -> CliResult<()> {
    debug!("Setting profile: {}", name);

    let mut config = conn_mgr.config.clone();
    let existed = config.profiles.contains_key(name);
    config.set_profile(name.to_string(), profile);

    if make_default || config.default_profile.is_none() {
        config.default_profile = Some(name.to_string());
    }

    conn_mgr.save_config(&config)?;

    let verb = if existed { "updated" } else { "created" };
    println!("Profile '{}' {}.", name, verb);
    if config.default_profile.as_deref() == Some(name) {
        println!("'{}' is the default profile.", name);
    }
    Ok(())
}

fn handle_remove(conn_mgr: &ConnectionManager, name: &str, yes: bool) -> CliResult<()> {
    debug!("Removing profile: {}", name);

    let Some(profile) = conn_mgr.config.profiles.get(name) else {
        return Err(AdfCtlError::ProfileNotFound {
            name: name.to_string(),
        });
    };

    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);
    if is_default {
        println!("Warning: '{}' is the default profile.", name);
    }

    if !yes && !confirm(&format!("Remove profile '{}'?", name))? {
        println!("Profile removal cancelled.");
        return Ok(());
    }

    if let Some(entry) = profile.access_token.strip_prefix(KEYRING_PREFIX) {
        remove_keyring_entry(entry);
    }

    let mut config = conn_mgr.config.clone();
    config.remove_profile(name);
    if is_default {
        config.default_profile = None;
        println!("Default profile cleared.");
    }

    conn_mgr.save_config(&config)?;
    println!("Profile '{}' removed.", name);
    Ok(())
}

#[cfg(feature = "secure-storage")]
fn remove_keyring_entry(entry: &str) {
    if let Err(e) = CredentialStore::with_keyring().delete(entry) {
        tracing::warn!("could not remove keyring entry '{}': {}", entry, e);
    }
}

#[cfg(not(feature = "secure-storage"))]
fn remove_keyring_entry(entry: &str) {
    tracing::warn!(
        "keyring entry '{}' left in place; secure-storage support is not compiled in",
        entry
    );
}

fn handle_default(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    if !conn_mgr.config.profiles.contains_key(name) {
        return Err(AdfCtlError::ProfileNotFound {
            name: name.to_string(),
        });
    }

    let mut config = conn_mgr.config.clone();
    config.default_profile = Some(name.to_string());
    conn_mgr.save_config(&config)?;

    println!("Default profile set to '{}'.", name);
    Ok(())
}

/// Ask a yes/no question on stdin; anything but y/yes is a no
fn confirm(question: &str) -> CliResult<bool> {
    print!("{} (y/N): ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
