//! Firebase-compatible identity provider over the REST identity toolkit.
//!
//! Password sign-in goes to `{identity_url}/accounts:signInWithPassword` and
//! ID tokens are refreshed through `{token_url}/token` using the refresh
//! token from sign-in. The session lives in memory only.
//!
//! # Example
//!
//! ```ignore
//! let provider = FirebaseIdentityProvider::new(&config.identity)?;
//! let principal = provider.sign_in("staff@aurema.app", &password).await?;
//! let token = provider.id_token(&principal).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};

use crate::config::IdentityConfig;
use crate::domain::foundation::UserId;
use crate::domain::session::{BearerToken, Principal};
use crate::ports::{IdentityError, IdentityProvider};

/// Lifetime assumed when the provider omits `expiresIn`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

struct StoredSession {
    principal: Principal,
    id_token: SecretString,
    refresh_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl StoredSession {
    fn is_fresh(&self, margin: chrono::Duration) -> bool {
        self.expires_at - margin > Utc::now()
    }
}

/// Identity provider backed by the identity toolkit REST API.
pub struct FirebaseIdentityProvider {
    http: reqwest::Client,
    api_key: SecretString,
    identity_url: String,
    token_url: String,
    refresh_margin: chrono::Duration,
    session: Mutex<Option<StoredSession>>,
    auth_state: watch::Sender<Option<Principal>>,
}

impl FirebaseIdentityProvider {
    /// Creates a provider from configuration. Requires `identity.api_key`.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .map(|key| SecretString::new(key.expose_secret().trim().to_string()))
            .ok_or_else(|| IdentityError::Provider("identity.api_key is not configured".into()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| IdentityError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let refresh_margin = chrono::Duration::from_std(config.refresh_margin())
            .map_err(|_| IdentityError::Provider("identity.refresh_margin_secs is out of range".into()))?;
        let (auth_state, _) = watch::channel(None);

        Ok(Self {
            http,
            api_key,
            identity_url: config.identity_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.trim_end_matches('/').to_string(),
            refresh_margin,
            session: Mutex::new(None),
            auth_state,
        })
    }

    async fn refresh(&self, session: &StoredSession) -> Result<StoredSession, IdentityError> {
        let url = format!("{}/token", self.token_url);
        tracing::debug!(uid = %session.principal.uid, "Refreshing ID token");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.expose_secret().as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.expose_secret().as_str()),
            ])
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            return Err(refresh_error(message));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Provider(format!("Malformed refresh response: {}", e)))?;

        Ok(StoredSession {
            principal: session.principal.clone(),
            id_token: SecretString::new(body.id_token),
            refresh_token: SecretString::new(body.refresh_token),
            expires_at: expiry_from(body.expires_in.as_deref()),
        })
    }

    /// Drops the session and announces the absence if one was present.
    fn end_session(&self, session: &mut Option<StoredSession>) {
        *session = None;
        self.auth_state.send_if_modified(|current| current.take().is_some());
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Principal, IdentityError> {
        let url = format!("{}/accounts:signInWithPassword", self.identity_url);
        tracing::debug!("Signing in with password");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.expose_secret().as_str())])
            .json(&SignInRequest {
                email: email.trim(),
                password: password.expose_secret(),
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            tracing::info!(reason = %message, "Password sign-in rejected");
            return Err(sign_in_error(message));
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Provider(format!("Malformed sign-in response: {}", e)))?;

        let uid = UserId::new(body.local_id)
            .map_err(|_| IdentityError::Provider("Sign-in response has no user id".into()))?;
        let principal = Principal::new(uid, body.email.unwrap_or_else(|| email.trim().to_string()));

        let mut session = self.session.lock().await;
        *session = Some(StoredSession {
            principal: principal.clone(),
            id_token: SecretString::new(body.id_token),
            refresh_token: SecretString::new(body.refresh_token),
            expires_at: expiry_from(body.expires_in.as_deref()),
        });
        self.auth_state.send_replace(Some(principal.clone()));

        tracing::info!(uid = %principal.uid, "Signed in");
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let mut session = self.session.lock().await;
        self.end_session(&mut session);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Principal>> {
        self.auth_state.subscribe()
    }

    fn current_principal(&self) -> Option<Principal> {
        self.auth_state.borrow().clone()
    }

    async fn id_token(&self, principal: &Principal) -> Result<BearerToken, IdentityError> {
        let mut session = self.session.lock().await;

        let current = match session.as_ref() {
            Some(current) if current.principal == *principal => current,
            _ => return Err(IdentityError::NoSession),
        };

        if current.is_fresh(self.refresh_margin) {
            return Ok(BearerToken::new(current.id_token.expose_secret().clone()));
        }

        let refreshed = self.refresh(current).await;
        match refreshed {
            Ok(refreshed) => {
                let token = BearerToken::new(refreshed.id_token.expose_secret().clone());
                *session = Some(refreshed);
                Ok(token)
            }
            Err(IdentityError::SessionExpired) => {
                tracing::warn!(uid = %principal.uid, "Refresh token rejected, ending session");
                self.end_session(&mut session);
                Err(IdentityError::SessionExpired)
            }
            Err(e) => Err(e),
        }
    }
}

fn expiry_from(expires_in: Option<&str>) -> DateTime<Utc> {
    let seconds = expires_in
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    Utc::now() + chrono::Duration::seconds(seconds)
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorEnvelope>().await {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => format!("Identity provider returned {}", status.as_u16()),
    }
}

/// Messages look like `INVALID_PASSWORD` or `TOO_MANY_ATTEMPTS_TRY_LATER : ...`.
fn error_code(message: &str) -> &str {
    message.split(':').next().unwrap_or(message).trim()
}

fn sign_in_error(message: String) -> IdentityError {
    match error_code(&message) {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL"
        | "USER_DISABLED" | "MISSING_PASSWORD" => IdentityError::InvalidCredentials(message),
        _ => IdentityError::Provider(message),
    }
}

fn refresh_error(message: String) -> IdentityError {
    match error_code(&message) {
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_DISABLED" | "USER_NOT_FOUND" => {
            IdentityError::SessionExpired
        }
        _ => IdentityError::Provider(message),
    }
}
