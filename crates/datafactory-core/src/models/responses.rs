//! Response wrappers
//!
//! Each wrapper carries the HTTP status and the service request id next to
//! the payload, so callers can correlate calls with service-side logs.

use super::activity_type::ActivityType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTypeCreateOrUpdateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub status_code: u16,
    /// The stored definition, when the service echoes it back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    /// `Location` header of a 201 response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ActivityTypeCreateOrUpdateResponse {
    /// True when the service created a new definition rather than replacing one
    pub fn created(&self) -> bool {
        self.status_code == 201
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTypeGetResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub status_code: u16,
    pub activity_type: ActivityType,
}

/// One page of activity types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTypeListResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub status_code: u16,
    pub activity_types: Vec<ActivityType>,
    /// Absolute URL of the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

impl ActivityTypeListResponse {
    pub fn has_next(&self) -> bool {
        self.next_link.as_deref().is_some_and(|link| !link.is_empty())
    }
}

/// Body of a list page as the service sends it
#[derive(Debug, Deserialize)]
pub(crate) struct ActivityTypePage {
    #[serde(default)]
    pub value: Vec<ActivityType>,
    #[serde(default, rename = "nextLink", alias = "odata.nextLink")]
    pub next_link: Option<String>,
}
