use super::{ActivityTypeOperations, validation};
use crate::client::{DataFactoryClient, RawResponse};
use crate::error::{CoreError, Result};
use crate::lro;
use crate::models::responses::ActivityTypePage;
use crate::models::{
    ActivityType, ActivityTypeCreateOrUpdateParameters, ActivityTypeCreateOrUpdateResponse,
    ActivityTypeCreateOrUpdateWithRawJsonContentParameters, ActivityTypeGetParameters,
    ActivityTypeGetResponse, ActivityTypeListParameters, ActivityTypeListResponse,
    LongRunningOperationResponse, OperationStatus,
};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use url::Url;

fn append_query(url: &mut Url, pairs: Vec<(&'static str, String)>) {
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
}

fn upsert_response(raw: RawResponse) -> Result<ActivityTypeCreateOrUpdateResponse> {
    Ok(ActivityTypeCreateOrUpdateResponse {
        request_id: raw.request_id(),
        status_code: raw.status.as_u16(),
        activity_type: raw.json_opt::<ActivityType>()?,
        location: raw.header("location").map(str::to_string),
    })
}

fn list_response(raw: RawResponse) -> Result<ActivityTypeListResponse> {
    let page: ActivityTypePage = raw.json()?;
    Ok(ActivityTypeListResponse {
        request_id: raw.request_id(),
        status_code: raw.status.as_u16(),
        activity_types: page.value,
        next_link: page.next_link.filter(|link| !link.is_empty()),
    })
}

impl DataFactoryClient {
    async fn put_activity_type(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        activity_type_name: &str,
        body: String,
    ) -> Result<ActivityTypeCreateOrUpdateResponse> {
        let url = self.activity_types_url(
            resource_group_name,
            data_factory_name,
            Some(activity_type_name),
        )?;
        let raw = self
            .send_expect(Method::PUT, url, Some(body), &[200, 201])
            .await?;
        upsert_response(raw)
    }
}

#[async_trait]
impl ActivityTypeOperations for DataFactoryClient {
    async fn begin_delete(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        activity_type_name: &str,
    ) -> Result<LongRunningOperationResponse> {
        validation::scope(resource_group_name, data_factory_name)?;
        validation::activity_type_name(activity_type_name)?;
        debug!(
            resource_group = resource_group_name,
            data_factory = data_factory_name,
            activity_type = activity_type_name,
            "deleting activity type"
        );

        let url = self.activity_types_url(
            resource_group_name,
            data_factory_name,
            Some(activity_type_name),
        )?;
        let raw = self
            .send_expect(Method::DELETE, url, None, &[200, 202, 204])
            .await?;

        let status = if raw.status.as_u16() == 202 {
            OperationStatus::InProgress
        } else {
            OperationStatus::Succeeded
        };
        Ok(LongRunningOperationResponse {
            request_id: raw.request_id(),
            status_code: raw.status.as_u16(),
            status,
            error: None,
            operation_status_link: lro::status_link(&raw),
            retry_after: raw.retry_after(),
        })
    }

    async fn delete(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        activity_type_name: &str,
    ) -> Result<LongRunningOperationResponse> {
        let initial = self
            .begin_delete(resource_group_name, data_factory_name, activity_type_name)
            .await?;
        lro::poll_until_complete(self, initial, self.long_running_config(), None).await
    }

    async fn create_or_update(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        parameters: &ActivityTypeCreateOrUpdateParameters,
    ) -> Result<ActivityTypeCreateOrUpdateResponse> {
        let name = parameters.activity_type.name.as_str();
        validation::scope(resource_group_name, data_factory_name)?;
        validation::activity_type_name(name)?;
        debug!(
            resource_group = resource_group_name,
            data_factory = data_factory_name,
            activity_type = name,
            "creating or updating activity type"
        );

        let body = serde_json::to_string(&parameters.activity_type)?;
        self.put_activity_type(resource_group_name, data_factory_name, name, body)
            .await
    }

    async fn create_or_update_with_raw_json_content(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        activity_type_name: &str,
        parameters: &ActivityTypeCreateOrUpdateWithRawJsonContentParameters,
    ) -> Result<ActivityTypeCreateOrUpdateResponse> {
        validation::scope(resource_group_name, data_factory_name)?;
        validation::activity_type_name(activity_type_name)?;
        validation::raw_json_content(&parameters.content)?;
        debug!(
            resource_group = resource_group_name,
            data_factory = data_factory_name,
            activity_type = activity_type_name,
            "creating or updating activity type from raw JSON"
        );

        self.put_activity_type(
            resource_group_name,
            data_factory_name,
            activity_type_name,
            parameters.content.clone(),
        )
        .await
    }

    async fn get(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        parameters: &ActivityTypeGetParameters,
    ) -> Result<ActivityTypeGetResponse> {
        let name = parameters.activity_type_name.as_str();
        validation::scope(resource_group_name, data_factory_name)?;
        validation::activity_type_name(name)?;

        let mut url = self.activity_types_url(resource_group_name, data_factory_name, Some(name))?;
        append_query(&mut url, parameters.query_pairs());

        let raw = self.send_expect(Method::GET, url, None, &[200]).await?;
        Ok(ActivityTypeGetResponse {
            request_id: raw.request_id(),
            status_code: raw.status.as_u16(),
            activity_type: raw.json()?,
        })
    }

    async fn list(
        &self,
        resource_group_name: &str,
        data_factory_name: &str,
        parameters: &ActivityTypeListParameters,
    ) -> Result<ActivityTypeListResponse> {
        validation::scope(resource_group_name, data_factory_name)?;
        if let Some(name) = &parameters.activity_type_name {
            validation::activity_type_name(name)?;
        }

        let mut url = self.activity_types_url(resource_group_name, data_factory_name, None)?;
        append_query(&mut url, parameters.query_pairs());

        let raw = self.send_expect(Method::GET, url, None, &[200]).await?;
        list_response(raw)
    }

    async fn list_next(&self, next_link: &str) -> Result<ActivityTypeListResponse> {
        validation::next_link(next_link)?;
        let url = Url::parse(next_link)
            .map_err(|e| CoreError::Validation(format!("invalid next link '{}': {}", next_link, e)))?;

        let raw = self.send_expect(Method::GET, url, None, &[200]).await?;
        list_response(raw)
    }
}
