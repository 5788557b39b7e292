//! Command implementations

pub mod activity_type;
pub mod profile;

use crate::error::{AdfCtlError, Result as CliResult};
use datafactory_core::{CancellationToken, cancellable};
use std::future::Future;
use tracing::debug;

/// Run a library call, cancelling it when the user presses Ctrl+C
pub async fn with_ctrl_c<T, F>(future: F) -> CliResult<T>
where
    F: Future<Output = datafactory_core::Result<T>>,
{
    let token = CancellationToken::new();
    let trigger = token.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling request");
            trigger.cancel();
        }
    });

    let result = cancellable(&token, future).await;
    watcher.abort();
    result.map_err(AdfCtlError::from)
}

/// Read a document from a file path, or from stdin when the path is "-"
pub fn read_input(path: &str) -> CliResult<String> {
    let content = if path == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    };
    content.map_err(|e| AdfCtlError::FileError {
        path: path.to_string(),
        message: e.to_string(),
    })
}
