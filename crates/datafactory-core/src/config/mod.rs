//! Profiles, credentials and polling settings
//!
//! A TOML file holds named profiles, each naming a subscription, an access
//! token and optional default resource group and factory. Secrets may be
//! `${VAR}` expansions or `keyring:` references; see [`CredentialStore`].

#![allow(clippy::module_inception)]

pub mod config;
pub mod credential;
pub mod error;
pub mod long_running;

pub use config::{Config, Profile, ResolvedProfile};
pub use credential::{CredentialStorage, CredentialStore};
pub use error::{ConfigError, Result};
pub use long_running::LongRunningConfig;
