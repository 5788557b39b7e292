//! HTTP/JSON client for the Data Factory management endpoint
//!
//! [`DataFactoryClient`] owns the connection pool and the credential context
//! shared by every operation. It knows how to address the `activityTypes`
//! collection, stamp the standard headers on a request, and turn non-success
//! statuses into [`CoreError::Api`]. The operations themselves live in
//! [`crate::operations`].

use crate::config::{LongRunningConfig, ResolvedProfile};
use crate::config::config::{DEFAULT_API_URL, DEFAULT_API_VERSION};
use crate::error::{CoreError, Result};
use crate::models::OperationError;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;
use uuid::Uuid;

/// User agent string sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("datafactory-core/", env!("CARGO_PKG_VERSION"));

const PROVIDER_NAMESPACE: &str = "Microsoft.DataFactory";
const REQUEST_ID_HEADER: &str = "x-ms-request-id";
const CLIENT_REQUEST_ID_HEADER: &str = "x-ms-client-request-id";

/// Client for the activity type registration API
#[derive(Debug, Clone)]
pub struct DataFactoryClient {
    http: reqwest::Client,
    base_url: Url,
    subscription_id: String,
    access_token: String,
    api_version: String,
    long_running: LongRunningConfig,
}

/// Connection settings for [`DataFactoryClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub subscription_id: String,
    pub access_token: String,
    pub api_version: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub long_running: LongRunningConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            subscription_id: String::new(),
            access_token: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(60),
            long_running: LongRunningConfig::default(),
        }
    }
}

/// Builder for [`DataFactoryClient`]
#[derive(Debug, Clone, Default)]
pub struct DataFactoryClientBuilder {
    settings: ClientSettings,
}

impl DataFactoryClientBuilder {
    /// Builder preloaded with a resolved configuration profile
    #[must_use]
    pub fn from_profile(profile: &ResolvedProfile) -> Self {
        Self::default()
            .base_url(&profile.api_url)
            .subscription_id(&profile.subscription_id)
            .access_token(&profile.access_token)
            .api_version(&profile.api_version)
            .long_running(profile.long_running.clone())
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.settings.base_url = url.into();
        self
    }

    #[must_use]
    pub fn subscription_id(mut self, id: impl Into<String>) -> Self {
        self.settings.subscription_id = id.into();
        self
    }

    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.settings.access_token = token.into();
        self
    }

    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.settings.api_version = version.into();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn long_running(mut self, config: LongRunningConfig) -> Self {
        self.settings.long_running = config;
        self
    }

    pub fn build(self) -> Result<DataFactoryClient> {
        DataFactoryClient::new(self.settings)
    }
}

/// A fully read HTTP response
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }

    pub fn request_id(&self) -> Option<String> {
        self.header(REQUEST_ID_HEADER).map(str::to_string)
    }

    /// `Retry-After` in whole seconds; HTTP-date values are ignored
    pub fn retry_after(&self) -> Option<u64> {
        self.header("retry-after")
            .and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Body as JSON, or `None` for an empty body
    pub fn json_opt<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if self.body.trim().is_empty() {
            return Ok(None);
        }
        self.json().map(Some)
    }

    /// Convert a non-success response into an API error
    pub fn into_error(self) -> CoreError {
        let request_id = self.request_id();
        let (code, message) = match OperationError::from_body(&self.body) {
            Some(err) => (err.code, err.message),
            None if self.body.trim().is_empty() => (
                None,
                self.status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            ),
            None => (None, self.body),
        };
        CoreError::Api {
            status: self.status.as_u16(),
            code,
            message,
            request_id,
        }
    }
}

impl DataFactoryClient {
    pub fn builder() -> DataFactoryClientBuilder {
        DataFactoryClientBuilder::default()
    }

    pub fn new(settings: ClientSettings) -> Result<Self> {
        if settings.subscription_id.trim().is_empty() {
            return Err(CoreError::Config("subscription id is required".to_string()));
        }
        if settings.access_token.trim().is_empty() {
            return Err(CoreError::Config("access token is required".to_string()));
        }

        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            CoreError::Config(format!("invalid API URL '{}': {}", settings.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CoreError::Config(format!(
                "API URL '{}' cannot be used as a base",
                settings.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent)
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            subscription_id: settings.subscription_id,
            access_token: settings.access_token,
            api_version: settings.api_version,
            long_running: settings.long_running,
        })
    }

    /// Build a client from a resolved configuration profile
    pub fn from_profile(profile: &ResolvedProfile) -> Result<Self> {
        DataFactoryClientBuilder::from_profile(profile).build()
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Polling settings used by `delete`
    pub fn long_running_config(&self) -> &LongRunningConfig {
        &self.long_running
    }

    /// URL of a data factory's `activityTypes` collection, or of one member
    pub fn activity_types_url(
        &self,
        resource_group: &str,
        data_factory: &str,
        activity_type: Option<&str>,
    ) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CoreError::Config("API URL cannot be a base".to_string()))?;
            segments.pop_if_empty().extend([
                "subscriptions",
                self.subscription_id.as_str(),
                "resourcegroups",
                resource_group,
                "providers",
                PROVIDER_NAMESPACE,
                "datafactories",
                data_factory,
                "activityTypes",
            ]);
            if let Some(name) = activity_type {
                segments.push(name);
            }
        }
        Ok(url)
    }

    /// Append `api-version` unless the URL already carries one
    ///
    /// Next links and status links issued by the service include it.
    pub(crate) fn with_api_version(&self, mut url: Url) -> Url {
        if !url.query_pairs().any(|(k, _)| k == "api-version") {
            url.query_pairs_mut()
                .append_pair("api-version", &self.api_version);
        }
        url
    }

    /// Send a request and read the whole response
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<RawResponse> {
        let url = self.with_api_version(url);
        let client_request_id = Uuid::new_v4().to_string();
        debug!(%method, %url, %client_request_id, "sending request");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(&self.access_token)
            .header(CLIENT_REQUEST_ID_HEADER, &client_request_id)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(body) = body {
            trace!("request body: {}", body);
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json; charset=utf-8")
                .body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        let raw = RawResponse {
            status,
            headers,
            body,
        };
        debug!(
            %method,
            %url,
            status = status.as_u16(),
            request_id = raw.request_id().as_deref().unwrap_or("-"),
            "received response"
        );
        trace!("response body: {}", raw.body);
        Ok(raw)
    }

    /// Send a request and fail unless the status is one of `expected`
    pub(crate) async fn send_expect(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
        expected: &[u16],
    ) -> Result<RawResponse> {
        let raw = self.send(method.clone(), url.clone(), body).await?;
        if expected.contains(&raw.status.as_u16()) {
            return Ok(raw);
        }
        warn!(
            %method,
            %url,
            status = raw.status.as_u16(),
            "unexpected status from service"
        );
        Err(raw.into_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DataFactoryClient {
        DataFactoryClient::builder()
            .base_url("https://management.example.com")
            .subscription_id("sub-123")
            .access_token("token")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_credentials() {
        let err = DataFactoryClient::builder()
            .access_token("token")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("subscription id"));

        let err = DataFactoryClient::builder()
            .subscription_id("sub")
            .access_token("  ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("access token"));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = DataFactoryClient::builder()
            .base_url("not a url")
            .subscription_id("sub")
            .access_token("token")
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_activity_types_url() {
        let url = client()
            .activity_types_url("my-rg", "factory1", Some("Copy"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://management.example.com/subscriptions/sub-123/resourcegroups/my-rg/providers/Microsoft.DataFactory/datafactories/factory1/activityTypes/Copy"
        );

        let collection = client().activity_types_url("my-rg", "factory1", None).unwrap();
        assert!(collection.path().ends_with("/activityTypes"));
    }

    #[test]
    fn test_activity_types_url_encodes_segments() {
        let url = client()
            .activity_types_url("rg with space", "df", Some("a/b"))
            .unwrap();
        assert!(url.path().contains("/resourcegroups/rg%20with%20space/"));
        assert!(url.path().ends_with("/activityTypes/a%2Fb"));
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let client = DataFactoryClient::builder()
            .base_url("http://127.0.0.1:8080/arm/")
            .subscription_id("s")
            .access_token("t")
            .build()
            .unwrap();
        let url = client.activity_types_url("rg", "df", None).unwrap();
        assert_eq!(
            url.path(),
            "/arm/subscriptions/s/resourcegroups/rg/providers/Microsoft.DataFactory/datafactories/df/activityTypes"
        );
    }

    #[test]
    fn test_api_version_appended_once() {
        let client = client();
        let url = client.with_api_version(Url::parse("https://x/list").unwrap());
        assert_eq!(url.query(), Some("api-version=2015-10-01"));

        let next = Url::parse("https://x/list?api-version=2015-10-01&$skiptoken=abc").unwrap();
        let url = client.with_api_version(next.clone());
        assert_eq!(url, next);
    }

    #[test]
    fn test_into_error_parses_service_body() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, "req-42".parse().unwrap());
        let raw = RawResponse {
            status: StatusCode::CONFLICT,
            headers,
            body: r#"{"error":{"code":"Conflict","message":"already registered"}}"#.to_string(),
        };

        match raw.into_error() {
            CoreError::Api {
                status,
                code,
                message,
                request_id,
            } => {
                assert_eq!(status, 409);
                assert_eq!(code.as_deref(), Some("Conflict"));
                assert_eq!(message, "already registered");
                assert_eq!(request_id.as_deref(), Some("req-42"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_into_error_empty_and_plain_bodies() {
        let raw = RawResponse {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: String::new(),
        };
        let err = raw.into_error();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Not Found"));

        let raw = RawResponse {
            status: StatusCode::BAD_GATEWAY,
            headers: HeaderMap::new(),
            body: "upstream unavailable".to_string(),
        };
        assert!(raw.into_error().to_string().contains("upstream unavailable"));
    }

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", "12".parse().unwrap());
        let raw = RawResponse {
            status: StatusCode::ACCEPTED,
            headers,
            body: String::new(),
        };
        assert_eq!(raw.retry_after(), Some(12));

        let mut headers = HeaderMap::new();
        headers.insert("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        let raw = RawResponse {
            status: StatusCode::ACCEPTED,
            headers,
            body: String::new(),
        };
        assert_eq!(raw.retry_after(), None);
    }
}
