//! Request parameter types
//!
//! These mirror the shapes the service accepts. Query-string parameters
//! are rendered by `query_pairs`; body parameters serialize directly.

use super::activity_type::ActivityType;
use serde::{Deserialize, Serialize};

/// Parameters for creating or updating an activity type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTypeCreateOrUpdateParameters {
    pub activity_type: ActivityType,
}

impl ActivityTypeCreateOrUpdateParameters {
    pub fn new(activity_type: ActivityType) -> Self {
        Self { activity_type }
    }
}

/// Create-or-update with a caller-supplied JSON document as the request body
///
/// The content is sent verbatim, so fields this crate does not model
/// reach the service untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTypeCreateOrUpdateWithRawJsonContentParameters {
    pub content: String,
}

impl ActivityTypeCreateOrUpdateWithRawJsonContentParameters {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Parameters for fetching one activity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTypeGetParameters {
    pub activity_type_name: String,
    /// Scope the type was registered under; the service default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_scope: Option<String>,
}

impl ActivityTypeGetParameters {
    pub fn new(activity_type_name: impl Into<String>) -> Self {
        Self {
            activity_type_name: activity_type_name.into(),
            registration_scope: None,
        }
    }

    #[must_use]
    pub fn with_registration_scope(mut self, scope: impl Into<String>) -> Self {
        self.registration_scope = Some(scope.into());
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.registration_scope
            .iter()
            .map(|scope| ("scope", scope.clone()))
            .collect()
    }
}

/// Parameters for listing activity types
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTypeListParameters {
    /// Only return types with this name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_scope: Option<String>,
    /// Return every registered version instead of the latest only
    #[serde(default)]
    pub include_all_versions: bool,
}

impl ActivityTypeListParameters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_activity_type_name(mut self, name: impl Into<String>) -> Self {
        self.activity_type_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_registration_scope(mut self, scope: impl Into<String>) -> Self {
        self.registration_scope = Some(scope.into());
        self
    }

    #[must_use]
    pub fn with_all_versions(mut self, include: bool) -> Self {
        self.include_all_versions = include;
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.activity_type_name {
            pairs.push(("name", name.clone()));
        }
        if let Some(scope) = &self.registration_scope {
            pairs.push(("scope", scope.clone()));
        }
        if self.include_all_versions {
            pairs.push(("includeAllVersions", "true".to_string()));
        }
        pairs
    }
}
