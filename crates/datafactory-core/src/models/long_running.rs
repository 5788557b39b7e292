//! Long-running operation tracking types

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a long-running operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    InProgress,
    Succeeded,
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationStatus::InProgress)
    }

    /// Map a status string from an operation body, case-insensitively
    pub fn parse(status: &str) -> Option<Self> {
        match status.to_ascii_lowercase().as_str() {
            "inprogress" | "in_progress" | "running" | "accepted" | "creating" | "deleting" => {
                Some(OperationStatus::InProgress)
            }
            "succeeded" | "success" | "completed" => Some(OperationStatus::Succeeded),
            "failed" | "canceled" | "cancelled" => Some(OperationStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationStatus::InProgress => write!(f, "InProgress"),
            OperationStatus::Succeeded => write!(f, "Succeeded"),
            OperationStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Error detail reported by the service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default, alias = "Code", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, alias = "Message")]
    pub message: String,
    #[serde(default, alias = "Target", skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(alias = "Error")]
    error: OperationError,
}

impl OperationError {
    /// Parse `{"error": {...}}` or a flat `{"code", "message"}` body
    pub fn from_body(body: &str) -> Option<Self> {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
            return Some(envelope.error);
        }
        serde_json::from_str::<OperationError>(body)
            .ok()
            .filter(|e| e.code.is_some() || !e.message.is_empty())
    }
}

/// Standard service response for long-running operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongRunningOperationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub status_code: u16,
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    /// URL to poll for the next status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_status_link: Option<String>,
    /// Server's suggested delay before the next poll, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl LongRunningOperationResponse {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
