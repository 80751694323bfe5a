//! Authenticated client for the admin backend.
//!
//! Every call needs a signed-in principal. The client resolves the selected
//! deployment's base URL, mints a fresh bearer token, sends the request and
//! turns any failure into an [`ApiError`]. There are no retries and no caching.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::CallOptions;
use crate::application::EnvironmentSelector;
use crate::domain::admin::StaffProfile;
use crate::domain::api::ApiError;
use crate::ports::{CurrentProfileReader, IdentityProvider};

const CURRENT_USER_PATH: &str = "/users/current";

/// HTTP client that attaches the current principal's credential.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    identity: Arc<dyn IdentityProvider>,
    environments: Arc<EnvironmentSelector>,
}

impl ApiClient {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        environments: Arc<EnvironmentSelector>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_http_client(http, identity, environments))
    }

    /// Uses a caller-built `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        identity: Arc<dyn IdentityProvider>,
        environments: Arc<EnvironmentSelector>,
    ) -> Self {
        Self {
            http,
            identity,
            environments,
        }
    }

    pub fn environments(&self) -> &EnvironmentSelector {
        &self.environments
    }

    /// Sends a request and decodes the JSON response as `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        options: CallOptions,
    ) -> Result<T, ApiError> {
        let value = self.call_value(path, options).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sends a request and returns the raw JSON response.
    ///
    /// An empty success body is returned as `null`.
    pub async fn call_value(&self, path: &str, options: CallOptions) -> Result<Value, ApiError> {
        let principal = self
            .identity
            .current_principal()
            .ok_or_else(|| ApiError::unauthenticated("Not authenticated"))?;

        let base_url = self.environments.resolve_base_url(None).await;
        if base_url.is_empty() {
            return Err(ApiError::configuration("API base URL is not configured"));
        }

        let token = self
            .identity
            .id_token(&principal)
            .await
            .map_err(|e| ApiError::unauthenticated(e.to_string()))?;

        let mut authorization = HeaderValue::from_str(&token.authorization_value())
            .map_err(|_| ApiError::unauthenticated("Bearer credential is not a valid header"))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let url = join_url(&base_url, path);
        tracing::debug!(method = %options.method, path, "Admin API request");

        let mut request = self
            .http
            .request(options.method.clone(), &url)
            .headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body).map_err(|e| ApiError::Decode(e.to_string()))?;
            request = request.body(bytes);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "Admin API request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Default::default()));
            let error = ApiError::from_response(status.as_u16(), body);
            tracing::debug!(status = status.as_u16(), path, message = %error, "Admin API error");
            return Err(error);
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CurrentProfileReader for ApiClient {
    async fn current_profile(&self) -> Result<StaffProfile, ApiError> {
        self.call(CURRENT_USER_PATH, CallOptions::get()).await
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.is_empty() || path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identity::MockIdentityProvider;
    use crate::adapters::preferences::InMemoryPreferenceStore;
    use crate::config::ApiConfig;
    use crate::domain::api::{ApiEnvironment, StatusClass};
    use crate::domain::foundation::UserId;
    use crate::domain::session::Principal;
    use crate::ports::IdentityError;
    use httpmock::prelude::*;
    use reqwest::header::HeaderName;
    use serde::Deserialize;
    use serde_json::json;

    fn staff() -> Principal {
        Principal::new(UserId::new("uid-1").unwrap(), "staff@aurema.app")
    }

    fn selector_for(url: &str) -> Arc<EnvironmentSelector> {
        let config = ApiConfig::default().with_url(ApiEnvironment::Production, url);
        Arc::new(EnvironmentSelector::new(
            config,
            Arc::new(InMemoryPreferenceStore::new()),
        ))
    }

    fn client(identity: MockIdentityProvider, url: &str) -> ApiClient {
        ApiClient::new(Arc::new(identity), selector_for(url)).unwrap()
    }

    fn signed_in() -> MockIdentityProvider {
        MockIdentityProvider::new().signed_in_as(staff())
    }

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("https://a.io/", "/x"), "https://a.io/x");
        assert_eq!(join_url("https://a.io", "x"), "https://a.io/x");
        assert_eq!(join_url("https://a.io", ""), "https://a.io");
    }

    #[tokio::test]
    async fn no_principal_fails_before_network() {
        let server = MockServer::start_async().await;
        let any = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = client(MockIdentityProvider::new(), &server.base_url());
        let err = client.call_value("/admin/stats", CallOptions::get()).await.unwrap_err();

        assert_eq!(err.status(), 401);
        assert_eq!(err.status_class(), StatusClass::Unauthenticated);
        any.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn missing_base_url_is_a_configuration_error() {
        let client = client(signed_in(), "");
        let err = client.call_value("/admin/stats", CallOptions::get()).await.unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[tokio::test]
    async fn token_failure_is_unauthenticated() {
        let identity = signed_in().with_token_error(IdentityError::SessionExpired);
        let client = client(identity, "https://api.aurema.app");

        let err = client.call_value("/admin/stats", CallOptions::get()).await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthenticated { .. }));
        assert_eq!(err.message(), "Session expired");
    }

    #[tokio::test]
    async fn attaches_bearer_and_content_type() {
        let server = MockServer::start_async().await;
        let stats = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/admin/stats")
                    .header("authorization", "Bearer mock-token-uid-1")
                    .header("content-type", "application/json");
                then.status(200).json_body(json!({ "totalUsers": 3 }));
            })
            .await;

        let client = client(signed_in(), &server.base_url());
        let value = client.call_value("/admin/stats", CallOptions::get()).await.unwrap();

        stats.assert_async().await;
        assert_eq!(value["totalUsers"], 3);
    }

    #[tokio::test]
    async fn caller_headers_override_defaults() {
        let server = MockServer::start_async().await;
        let upload = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/admin/import")
                    .header("content-type", "text/csv")
                    .header("x-request-id", "req-7");
                then.status(204);
            })
            .await;

        let client = client(signed_in(), &server.base_url());
        let options = CallOptions::post(json!("a,b"))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/csv"))
            .with_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("req-7"),
            );
        let value = client.call_value("/admin/import", options).await.unwrap();

        upload.assert_async().await;
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn sends_json_body_and_query() {
        let server = MockServer::start_async().await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/admin/paths/calm")
                    .query_param("dryRun", "true")
                    .json_body(json!({ "name": "Calm" }));
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let client = client(signed_in(), &server.base_url());
        let options = CallOptions::put(json!({ "name": "Calm" })).with_query("dryRun", "true");
        client.call_value("/admin/paths/calm", options).await.unwrap();

        update.assert_async().await;
    }

    #[tokio::test]
    async fn error_message_comes_from_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/admin/users/nobody");
                then.status(404).json_body(json!({ "message": "User not found" }));
            })
            .await;

        let client = client(signed_in(), &server.base_url());
        let err = client
            .call_value("/admin/users/nobody", CallOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.status(), 404);
        assert!(err.is_not_found());
        assert_eq!(err.message(), "User not found");
        assert_eq!(err.body(), Some(&json!({ "message": "User not found" })));
    }

    #[tokio::test]
    async fn error_field_is_used_when_message_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/admin/stats");
                then.status(403).json_body(json!({ "error": "Forbidden" }));
            })
            .await;

        let client = client(signed_in(), &server.base_url());
        let err = client.call_value("/admin/stats", CallOptions::get()).await.unwrap_err();

        assert_eq!(err.status_class(), StatusClass::Forbidden);
        assert_eq!(err.message(), "Forbidden");
    }

    #[tokio::test]
    async fn unparseable_error_body_gets_generic_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/admin/stats");
                then.status(500).body("<html>upstream exploded</html>");
            })
            .await;

        let client = client(signed_in(), &server.base_url());
        let err = client.call_value("/admin/stats", CallOptions::get()).await.unwrap_err();

        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), "API error: 500");
        assert_eq!(err.body(), Some(&json!({})));
    }

    #[tokio::test]
    async fn typed_call_decodes_and_reports_shape_mismatch() {
        #[derive(Debug, Deserialize)]
        struct Count {
            count: u32,
        }

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/good");
                then.status(200).json_body(json!({ "count": 4 }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.path("/bad");
                then.status(200).json_body(json!({ "count": "four" }));
            })
            .await;

        let client = client(signed_in(), &server.base_url());

        let good: Count = client.call("/good", CallOptions::get()).await.unwrap();
        assert_eq!(good.count, 4);

        let bad = client.call::<Count>("/bad", CallOptions::get()).await.unwrap_err();
        assert!(matches!(bad, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn current_profile_reads_users_current() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users/current");
                then.status(200).json_body(json!({
                    "id": "uid-1",
                    "email": "staff@aurema.app",
                    "isStaff": true
                }));
            })
            .await;

        let client = client(signed_in(), &server.base_url());
        let profile = client.current_profile().await.unwrap();

        assert_eq!(profile.id.as_str(), "uid-1");
        assert!(profile.is_staff);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let client = client(signed_in(), "http://127.0.0.1:9");
        let err = client.call_value("/admin/stats", CallOptions::get()).await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.status(), 0);
    }
}
