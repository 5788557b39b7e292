//! Activity type operations
//!
//! [`ActivityTypeOperations`] is the operation set for a data factory's
//! `activityTypes` collection. [`DataFactoryClient`](crate::DataFactoryClient)
//! implements it; callers that want to substitute a fake can code against
//! the trait instead.
//!
//! Every operation is a future that does nothing until polled, so dropping
//! it cancels the call. [`cancellable`] ties an operation to a
//! [`CancellationToken`] for callers that cancel from elsewhere.

mod activity_types;
pub(crate) mod validation;

use crate::error::{CoreError, Result};
use crate::models::{
    ActivityTypeCreateOrUpdateParameters, ActivityTypeCreateOrUpdateResponse,
    ActivityTypeCreateOrUpdateWithRawJsonContentParameters, ActivityTypeGetParameters,
    ActivityTypeGetResponse, ActivityTypeListParameters, ActivityTypeListResponse,
    LongRunningOperationResponse,
};
use async_trait::async_trait;
use std::future::Future;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait ActivityTypeOperations: Send + Sync {
    /// Start deleting an activity type without waiting for it to finish
    async fn begin_delete(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        activity_type_name: &str,
    ) -> Result<LongRunningOperationResponse>;

    /// Delete an activity type and wait until the service reports a terminal state
    ///
    /// A failed deletion is returned as [`CoreError::OperationFailed`].
    async fn delete(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        activity_type_name: &str,
    ) -> Result<LongRunningOperationResponse>;

    /// Create or replace an activity type definition
    async fn create_or_update(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        parameters: &ActivityTypeCreateOrUpdateParameters,
    ) -> Result<ActivityTypeCreateOrUpdateResponse>;

    /// Create or replace an activity type from a JSON document sent as-is
    async fn create_or_update_with_raw_json_content(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        activity_type_name: &str,
        parameters: &ActivityTypeCreateOrUpdateWithRawJsonContentParameters,
    ) -> Result<ActivityTypeCreateOrUpdateResponse>;

    async fn get(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        parameters: &ActivityTypeGetParameters,
    ) -> Result<ActivityTypeGetResponse>;

    /// First page of activity types
    async fn list(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        parameters: &ActivityTypeListParameters,
    ) -> Result<ActivityTypeListResponse>;

    /// Page addressed by a `next_link` from a previous list response
    async fn list_next(&self, next_link: &str) -> Result<ActivityTypeListResponse>;
}

/// Run `future` until it finishes or `token` is cancelled
///
/// ```rust,ignore
/// let token = CancellationToken::new();
/// let params = ActivityTypeGetParameters::new("Copy");
/// let response = cancellable(&token, client.get("rg", "factory", &params)).await?;
/// ```
pub async fn cancellable<T, F>(token: &CancellationToken, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(CoreError::Cancelled),
        result = future => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancellable_passes_result_through() {
        let token = CancellationToken::new();
        let value = cancellable(&token, async { Ok::<_, CoreError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_cancellable_returns_cancelled() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            child.cancel();
        });

        let result: Result<()> = cancellable(&token, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(CoreError::Cancelled)));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_wins() {
        let token = CancellationToken::new();
        token.cancel();
        let result = cancellable(&token, async { Ok::<_, CoreError>(1) }).await;
        assert!(matches!(result, Err(CoreError::Cancelled)));
    }
}
