//! Credential resolution for profile secrets
//!
//! A configured secret (access token, subscription id) is resolved in order:
//! an environment variable override, a `keyring:<entry>` reference into the
//! OS keyring (with the `secure-storage` feature), or the plaintext value.

use super::error::{ConfigError, Result};
use std::env;

/// Prefix that marks a value as a keyring reference
pub const KEYRING_PREFIX: &str = "keyring:";

#[cfg(feature = "secure-storage")]
const SERVICE_NAME: &str = "adfctl";

/// Where newly stored secrets end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStorage {
    #[cfg(feature = "secure-storage")]
    Keyring,
    Plaintext,
}

impl CredentialStorage {
    pub fn as_str(&self) -> &'static str {
        match self {
            #[cfg(feature = "secure-storage")]
            CredentialStorage::Keyring => "keyring",
            CredentialStorage::Plaintext => "plaintext",
        }
    }
}

/// Resolves and stores profile secrets
#[derive(Debug, Clone)]
pub struct CredentialStore {
    storage: CredentialStorage,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    /// Plaintext store; secrets are written to the config file as given
    pub fn new() -> Self {
        Self {
            storage: CredentialStorage::Plaintext,
        }
    }

    /// Keyring-backed store, falling back to plaintext when no keyring service answers
    #[cfg(feature = "secure-storage")]
    pub fn with_keyring() -> Self {
        let storage = match keyring::Entry::new(SERVICE_NAME, "__availability_check__") {
            Ok(entry) => {
                let _ = entry.get_password();
                CredentialStorage::Keyring
            }
            Err(e) => {
                tracing::warn!("keyring unavailable, storing credentials in plaintext: {}", e);
                CredentialStorage::Plaintext
            }
        };
        Self { storage }
    }

    pub fn storage(&self) -> CredentialStorage {
        self.storage
    }

    /// Store a secret and return the value to write into the config file
    pub fn store(&self, entry: &str, secret: &str) -> Result<String> {
        match self.storage {
            #[cfg(feature = "secure-storage")]
            CredentialStorage::Keyring => {
                keyring::Entry::new(SERVICE_NAME, entry)
                    .and_then(|e| e.set_password(secret))
                    .map_err(|e| {
                        ConfigError::KeyringError(format!("failed to store '{entry}': {e}"))
                    })?;
                Ok(format!("{KEYRING_PREFIX}{entry}"))
            }
            CredentialStorage::Plaintext => {
                let _ = entry;
                Ok(secret.to_string())
            }
        }
    }

    /// Resolve a configured value, honouring an optional environment override
    pub fn resolve(&self, value: &str, env_var: Option<&str>) -> Result<String> {
        if let Some(var) = env_var
            && let Ok(from_env) = env::var(var)
            && !from_env.is_empty()
        {
            tracing::debug!("using {} from environment", var);
            return Ok(from_env);
        }

        let Some(entry) = value.strip_prefix(KEYRING_PREFIX) else {
            return Ok(value.to_string());
        };

        #[cfg(feature = "secure-storage")]
        {
            keyring::Entry::new(SERVICE_NAME, entry)
                .and_then(|e| e.get_password())
                .map_err(|e| ConfigError::KeyringError(format!("failed to read '{entry}': {e}")))
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            Err(ConfigError::CredentialError(format!(
                "'{entry}' is a keyring reference but secure-storage support is not compiled in"
            )))
        }
    }

    /// Remove a keyring entry; missing entries are not an error
    pub fn delete(&self, entry: &str) -> Result<()> {
        match self.storage {
            #[cfg(feature = "secure-storage")]
            CredentialStorage::Keyring => {
                let handle = keyring::Entry::new(SERVICE_NAME, entry)
                    .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
                match handle.delete_credential() {
                    Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                    Err(e) => Err(ConfigError::KeyringError(format!(
                        "failed to delete '{entry}': {e}"
                    ))),
                }
            }
            CredentialStorage::Plaintext => {
                let _ = entry;
                Ok(())
            }
        }
    }

    pub fn is_keyring_reference(value: &str) -> bool {
        value.starts_with(KEYRING_PREFIX)
    }
}
