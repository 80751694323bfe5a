//! Port for fetching the signed-in principal's backend profile.
//!
//! The session guard uses it to decide whether the principal is staff. The
//! production implementation is the authenticated `ApiClient`
//! (`GET /users/current`).

use async_trait::async_trait;

use crate::domain::admin::StaffProfile;
use crate::domain::api::ApiError;

#[async_trait]
pub trait CurrentProfileReader: Send + Sync {
    /// Profile of whoever the current bearer credential identifies.
    async fn current_profile(&self) -> Result<StaffProfile, ApiError>;
}
