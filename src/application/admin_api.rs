//! AdminApi - typed queries and commands behind the dashboard views.

use serde_json::Value;
use thiserror::Error;

use crate::adapters::http::{ApiClient, CallOptions};
use crate::domain::admin::{
    Conversation, DashboardStats, LearningPath, ListQuery, Meditation, PaginatedResponse,
    PathDraft, UserProfile, UserWithCounts,
};
use crate::domain::api::ApiError;
use crate::domain::foundation::{UserId, ValidationError};

/// Errors from loading or saving a learning path.
#[derive(Debug, Error)]
pub enum PathEditorError {
    #[error("Path \"{0}\" was not found. The admin API updates existing paths only.")]
    NotFound(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Admin resource endpoints.
#[derive(Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.client.call("/admin/stats", CallOptions::get()).await
    }

    pub async fn list_users(
        &self,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<UserProfile>, ApiError> {
        let path = format!("/admin/users?{}", query.to_query_string());
        self.client.call(&path, CallOptions::get()).await
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<UserWithCounts, ApiError> {
        let path = format!("/admin/users/{}", segment(user_id.as_str()));
        self.client.call(&path, CallOptions::get()).await
    }

    pub async fn user_conversations(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<PaginatedResponse<Conversation>, ApiError> {
        let path = format!(
            "/admin/users/{}/conversations?limit={}",
            segment(user_id.as_str()),
            limit
        );
        self.client.call(&path, CallOptions::get()).await
    }

    pub async fn user_meditations(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<PaginatedResponse<Meditation>, ApiError> {
        let path = format!(
            "/admin/users/{}/meditations?limit={}",
            segment(user_id.as_str()),
            limit
        );
        self.client.call(&path, CallOptions::get()).await
    }

    pub async fn list_conversations(
        &self,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<Conversation>, ApiError> {
        let path = format!("/admin/conversations?{}", query.to_query_string());
        self.client.call(&path, CallOptions::get()).await
    }

    pub async fn get_conversation(
        &self,
        user_id: &UserId,
        conversation_id: &str,
    ) -> Result<Conversation, ApiError> {
        let path = format!(
            "/conversations/admin/{}/{}",
            segment(user_id.as_str()),
            segment(conversation_id)
        );
        self.client.call(&path, CallOptions::get()).await
    }

    pub async fn list_meditations(
        &self,
        limit: u32,
    ) -> Result<PaginatedResponse<Meditation>, ApiError> {
        let path = format!("/admin/meditations?limit={}", limit);
        self.client.call(&path, CallOptions::get()).await
    }

    /// Loads a path for editing. Absent fields come back as empty strings.
    pub async fn load_path(&self, id: &str) -> Result<LearningPath, PathEditorError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::empty_field("id").into());
        }

        let path = format!("/admin/paths/{}", segment(id));
        let payload = self
            .client
            .call_value(&path, CallOptions::get())
            .await
            .map_err(|e| not_found_as(id, e))?;

        Ok(LearningPath::from_payload(id, payload)?)
    }

    /// Validates the draft and writes it back. Nothing is sent if validation fails.
    pub async fn save_path(&self, draft: &PathDraft) -> Result<(), PathEditorError> {
        let payload = draft.to_payload()?;
        let body = serde_json::to_value(&payload)
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let path = format!("/admin/paths/{}", segment(&payload.id));
        let _: Value = self
            .client
            .call_value(&path, CallOptions::put(body))
            .await
            .map_err(|e| not_found_as(&payload.id, e))?;

        tracing::info!(path_id = %payload.id, steps = payload.total_steps, "Path saved");
        Ok(())
    }
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn not_found_as(id: &str, error: ApiError) -> PathEditorError {
    if error.is_not_found() {
        PathEditorError::NotFound(id.to_string())
    } else {
        PathEditorError::Api(error)
    }
}
