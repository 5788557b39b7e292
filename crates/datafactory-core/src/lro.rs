//! Long-running operation polling
//!
//! A delete answered with `202 Accepted` carries a status link in the
//! `Azure-AsyncOperation` or `Location` header. This module polls that
//! link until the service reports a terminal state, with optional progress
//! callbacks for UI updates.

use crate::client::{DataFactoryClient, RawResponse};
use crate::config::LongRunningConfig;
use crate::error::{CoreError, Result};
use crate::models::{LongRunningOperationResponse, OperationError, OperationStatus};
use reqwest::Method;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Progress events emitted while polling
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Polling has begun
    Started { operation: String },
    /// One status check finished
    Polling {
        operation: String,
        status: OperationStatus,
        elapsed: Duration,
    },
    Completed {
        operation: String,
        elapsed: Duration,
    },
    Failed { operation: String, error: String },
}

/// Callback type for progress updates
///
/// The CLI uses this to drive its spinner.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

#[derive(Debug, Default, Deserialize)]
struct StatusBody {
    #[serde(default, alias = "Status")]
    status: Option<String>,
    #[serde(default, alias = "Error")]
    error: Option<OperationError>,
}

/// Status link advertised by an accepted response
pub(crate) fn status_link(raw: &RawResponse) -> Option<String> {
    raw.header("azure-asyncoperation")
        .or_else(|| raw.header("location"))
        .map(str::to_string)
}

impl DataFactoryClient {
    /// Check the state of a long-running operation once
    ///
    /// HTTP error statuses are reported as a `Failed` operation rather than
    /// an error, so a poller sees the service's reason. Transport failures
    /// are still errors.
    pub async fn get_long_running_operation_status(
        &self,
        operation_status_link: &str,
    ) -> Result<LongRunningOperationResponse> {
        if operation_status_link.trim().is_empty() {
            return Err(CoreError::Validation(
                "operation status link must not be empty".to_string(),
            ));
        }
        let url = Url::parse(operation_status_link).map_err(|e| {
            CoreError::Validation(format!(
                "invalid operation status link '{}': {}",
                operation_status_link, e
            ))
        })?;

        let raw = self.send(Method::GET, url, None).await?;
        let code = raw.status.as_u16();
        let next_link =
            status_link(&raw).or_else(|| Some(operation_status_link.to_string()));
        let mut response = LongRunningOperationResponse {
            request_id: raw.request_id(),
            status_code: code,
            status: OperationStatus::InProgress,
            error: None,
            operation_status_link: None,
            retry_after: raw.retry_after(),
        };

        match code {
            202 => {
                response.operation_status_link = next_link;
            }
            200 | 201 | 204 => {
                let body: StatusBody = raw.json_opt()?.unwrap_or_default();
                let status = body
                    .status
                    .as_deref()
                    .and_then(OperationStatus::parse)
                    .unwrap_or(OperationStatus::Succeeded);
                response.status = status;
                match status {
                    OperationStatus::InProgress => response.operation_status_link = next_link,
                    OperationStatus::Failed => {
                        response.error = Some(body.error.unwrap_or_else(|| OperationError {
                            message: format!(
                                "operation ended with status {}",
                                body.status.as_deref().unwrap_or("Failed")
                            ),
                            ..OperationError::default()
                        }));
                    }
                    OperationStatus::Succeeded => {}
                }
            }
            _ => {
                warn!(status = code, "status check returned an error status");
                response.status = OperationStatus::Failed;
                response.error = Some(match raw.into_error() {
                    CoreError::Api { code, message, .. } => OperationError {
                        code,
                        message,
                        target: None,
                    },
                    other => OperationError {
                        message: other.to_string(),
                        ..OperationError::default()
                    },
                });
            }
        }

        Ok(response)
    }
}

fn failure_message(response: &LongRunningOperationResponse) -> (Option<String>, String) {
    match &response.error {
        Some(err) if !err.message.is_empty() => (err.code.clone(), err.message.clone()),
        Some(err) => (err.code.clone(), "operation failed".to_string()),
        None => (None, "operation failed".to_string()),
    }
}

fn finish(
    response: LongRunningOperationResponse,
    operation: &str,
    elapsed: Duration,
    on_progress: &Option<ProgressCallback>,
) -> Result<LongRunningOperationResponse> {
    match response.status {
        OperationStatus::Succeeded => {
            emit(
                on_progress,
                ProgressEvent::Completed {
                    operation: operation.to_string(),
                    elapsed,
                },
            );
            Ok(response)
        }
        _ => {
            let (code, message) = failure_message(&response);
            emit(
                on_progress,
                ProgressEvent::Failed {
                    operation: operation.to_string(),
                    error: message.clone(),
                },
            );
            Err(CoreError::OperationFailed { code, message })
        }
    }
}

/// Poll a long-running operation until it reaches a terminal state
///
/// # Arguments
///
/// * `client` - Client used for the status requests
/// * `initial` - Response of the call that started the operation
/// * `config` - Delay overrides and overall timeout
/// * `on_progress` - Optional callback for progress updates
///
/// # Returns
///
/// The final `Succeeded` response. A `Failed` outcome becomes
/// [`CoreError::OperationFailed`]; running past the timeout becomes
/// [`CoreError::OperationTimeout`].
///
/// # Example
///
/// ```rust,ignore
/// let initial = client.begin_delete("rg", "factory", "Copy").await?;
/// let done = poll_until_complete(
///     &client,
///     initial,
///     client.long_running_config(),
///     Some(Box::new(|event| {
///         if let ProgressEvent::Polling { status, elapsed, .. } = event {
///             println!("{} ({:.0}s)", status, elapsed.as_secs());
///         }
///     })),
/// )
/// .await?;
/// ```
pub async fn poll_until_complete(
    client: &DataFactoryClient,
    initial: LongRunningOperationResponse,
    config: &LongRunningConfig,
    on_progress: Option<ProgressCallback>,
) -> Result<LongRunningOperationResponse> {
    let start = Instant::now();
    let timeout = config.timeout();
    let operation = initial
        .operation_status_link
        .clone()
        .or_else(|| initial.request_id.clone())
        .unwrap_or_else(|| "operation".to_string());

    emit(
        &on_progress,
        ProgressEvent::Started {
            operation: operation.clone(),
        },
    );

    if initial.is_terminal() {
        return finish(initial, &operation, start.elapsed(), &on_progress);
    }

    let mut link = match initial.operation_status_link.clone() {
        Some(link) => link,
        None => {
            let message = "service accepted the operation without a status link".to_string();
            emit(
                &on_progress,
                ProgressEvent::Failed {
                    operation: operation.clone(),
                    error: message.clone(),
                },
            );
            return Err(CoreError::OperationFailed {
                code: None,
                message,
            });
        }
    };
    let mut delay = config.initial_delay(initial.retry_after);

    loop {
        // The last sleep is cut short so one status check lands on the deadline
        let remaining = timeout.saturating_sub(start.elapsed());
        let at_deadline = delay >= remaining;
        let wait = delay.min(remaining);

        debug!(delay_secs = wait.as_secs(), link = %link, "waiting before status check");
        tokio::time::sleep(wait).await;

        let response = client.get_long_running_operation_status(&link).await?;
        emit(
            &on_progress,
            ProgressEvent::Polling {
                operation: operation.clone(),
                status: response.status,
                elapsed: start.elapsed(),
            },
        );

        if response.is_terminal() {
            return finish(response, &operation, start.elapsed(), &on_progress);
        }

        if at_deadline || start.elapsed() >= timeout {
            emit(
                &on_progress,
                ProgressEvent::Failed {
                    operation: operation.clone(),
                    error: format!("timed out after {}s", timeout.as_secs()),
                },
            );
            return Err(CoreError::OperationTimeout(timeout));
        }

        if let Some(next) = &response.operation_status_link {
            link = next.clone();
        }
        delay = config.retry_delay(response.retry_after);
    }
}

/// Helper to emit progress events
fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
