//! The session value observed by views.

use crate::domain::admin::StaffProfile;
use crate::domain::foundation::ValidationError;

use super::{Principal, SessionStatus};

/// Recorded when the backend profile says the principal is not staff.
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied. Staff privileges required.";

/// Recorded when the staff profile could not be fetched.
pub const VERIFICATION_FAILED_MESSAGE: &str = "Failed to verify staff status";

/// Current principal, staff profile, status and last user-facing error.
///
/// Fields are private: every constructor upholds
/// `status == Authorized` iff a principal and a staff profile are both present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    principal: Option<Principal>,
    profile: Option<StaffProfile>,
    status: SessionStatus,
    error: Option<String>,
}

impl SessionState {
    /// State at process start, before the provider has reported anything.
    pub fn initial() -> Self {
        Self::default()
    }

    /// A principal is present and its staff profile is being fetched.
    pub fn verifying(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            profile: None,
            status: SessionStatus::Initializing,
            error: None,
        }
    }

    /// The principal is confirmed staff.
    pub fn authorized(principal: Principal, profile: StaffProfile) -> Result<Self, ValidationError> {
        if !profile.is_staff {
            return Err(ValidationError::invalid_format(
                "profile",
                "authorized session requires a staff profile",
            ));
        }
        Ok(Self {
            principal: Some(principal),
            profile: Some(profile),
            status: SessionStatus::Authorized,
            error: None,
        })
    }

    /// Nobody is signed in.
    pub fn signed_out() -> Self {
        Self {
            principal: None,
            profile: None,
            status: SessionStatus::Unauthorized,
            error: None,
        }
    }

    /// The principal was signed out for lacking staff privileges.
    pub fn denied() -> Self {
        Self {
            error: Some(ACCESS_DENIED_MESSAGE.to_string()),
            ..Self::signed_out()
        }
    }

    /// Staff verification failed and the principal was signed out.
    pub fn failed() -> Self {
        Self {
            principal: None,
            profile: None,
            status: SessionStatus::Error,
            error: Some(VERIFICATION_FAILED_MESSAGE.to_string()),
        }
    }

    /// Same session with a user-facing error recorded.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Same session with the error cleared.
    pub fn without_error(mut self) -> Self {
        self.error = None;
        self
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn profile(&self) -> Option<&StaffProfile> {
        self.profile.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Gate for every protected view.
    pub fn is_authorized(&self) -> bool {
        self.status == SessionStatus::Authorized
    }

    /// True while the session outcome is still unknown (views show a spinner).
    pub fn is_loading(&self) -> bool {
        self.status.is_pending()
    }

    /// Checks the authorization invariant.
    pub fn is_consistent(&self) -> bool {
        let staff_present = self.principal.is_some()
            && self.profile.as_ref().map(|p| p.is_staff).unwrap_or(false);
        (self.status == SessionStatus::Authorized) == staff_present
    }
}
