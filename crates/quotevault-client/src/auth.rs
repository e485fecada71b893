//! Email/password authentication against the hosted auth endpoints.
//!
//! A successful sign-in yields a [`Session`] whose bearer token is attached
//! to every table request. The password-recovery flow mails a link of the
//! form `quotevault://reset-password?code=...`; the code is exchanged for a
//! session with the verifier remembered when the mail was requested.

use std::path::Path;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use quotevault_shared::constants::{HOST_RESET_PASSWORD, URL_SCHEME};
use quotevault_shared::validation::{
    validate_email, validate_password, validate_password_confirmation, SignUpForm,
};
use quotevault_shared::{Field, QuoteVaultError, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::rest::{rejection, status_error, transport_error};
use crate::config::ClientConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl Session {
    /// Treats tokens within a minute of expiry as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(60) >= self.expires_at
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionState {
    session: Option<Session>,
    /// PKCE verifier for an outstanding password-recovery mail.
    pending_verifier: Option<String>,
}

/// Shared handle to the signed-in session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Session> {
        self.read().session.clone()
    }

    pub fn set(&self, session: Session) {
        self.write().session = Some(session);
    }

    pub fn clear(&self) {
        self.write().session = None;
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().session.as_ref().map(|s| s.access_token.clone())
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.read().session.as_ref().map(|s| s.user.id)
    }

    fn set_verifier(&self, verifier: String) {
        self.write().pending_verifier = Some(verifier);
    }

    fn take_verifier(&self) -> Option<String> {
        self.write().pending_verifier.take()
    }

    /// Restores a store saved with [`SessionStore::save`]. A missing file
    /// yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let state = match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(e) => return Err(QuoteVaultError::Storage(e.to_string())),
        };
        Ok(Self {
            inner: Arc::new(RwLock::new(state)),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&*self.read())?;
        std::fs::write(path, json).map_err(|e| QuoteVaultError::Storage(e.to_string()))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Result of a sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// The account exists but the email address must be confirmed first.
    ConfirmationRequired { user_id: Uuid },
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: Utc::now() + Duration::seconds(self.expires_in),
            user: self.user,
        }
    }
}

pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    session: SessionStore,
}

impl AuthClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self> {
        let base_url = config
            .api_url
            .clone()
            .ok_or_else(|| QuoteVaultError::Config("QUOTEVAULT_API_URL is not set".into()))?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| QuoteVaultError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone().unwrap_or_default(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn post(&self, path: &str, body: &serde_json::Value) -> RequestBuilder {
        self.http
            .post(self.url(path))
            .header("apikey", &self.api_key)
            .json(body)
    }

    /// Auth endpoints answer 400 or 422 for rejected input such as a wrong
    /// password or a spent code. Those become validation errors on `field`;
    /// without a field the session itself was refused.
    async fn send(request: RequestBuilder, field: Option<Field>) -> Result<Response> {
        let response = request.send().await.map_err(transport_error)?;
        rejection(response)
            .await
            .map_err(|(status, message)| match (status, field) {
                (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, Some(field)) => {
                    QuoteVaultError::validation(field, message)
                }
                (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, None) => {
                    QuoteVaultError::Unauthorized
                }
                (status, _) => status_error(status, message, "Account"),
            })
    }

    async fn token_grant(
        &self,
        grant: &str,
        body: serde_json::Value,
        field: Option<Field>,
    ) -> Result<Session> {
        let request = self.post("token", &body).query(&[("grant_type", grant)]);
        let response = Self::send(request, field).await?;
        let token: TokenResponse = response.json().await.map_err(|e| {
            warn!(error = %e, grant, "token response did not decode");
            QuoteVaultError::Decode("Could not read session from server".into())
        })?;
        let session = token.into_session();
        self.session.set(session.clone());
        Ok(session)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        validate_email(email)?;
        validate_password(password)?;

        let session = self
            .token_grant(
                "password",
                serde_json::json!({ "email": email.trim(), "password": password }),
                Some(Field::Password),
            )
            .await?;
        info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpOutcome> {
        form.validate()?;

        let body = serde_json::json!({
            "email": form.email.trim(),
            "password": form.password,
            "data": { "name": form.name.trim() },
        });
        let response = Self::send(self.post("signup", &body), Some(Field::Email)).await?;
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| QuoteVaultError::Decode(e.to_string()))?;

        if value.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(value)?;
            let session = token.into_session();
            self.session.set(session.clone());
            info!(user_id = %session.user.id, "signed up");
            return Ok(SignUpOutcome::SignedIn(session));
        }

        let user: AuthUser = serde_json::from_value(value)?;
        info!(user_id = %user.id, "sign-up awaiting email confirmation");
        Ok(SignUpOutcome::ConfirmationRequired { user_id: user.id })
    }

    /// Mails a recovery link that opens `quotevault://reset-password`.
    pub async fn send_password_reset(&self, email: &str) -> Result<()> {
        validate_email(email)?;

        let verifier = new_verifier();
        let body = serde_json::json!({
            "email": email.trim(),
            "code_challenge": verifier,
            "code_challenge_method": "plain",
        });
        let redirect = format!("{URL_SCHEME}://{HOST_RESET_PASSWORD}");
        let request = self
            .post("recover", &body)
            .query(&[("redirect_to", redirect.as_str())]);
        Self::send(request, Some(Field::Email)).await?;
        self.session.set_verifier(verifier);
        info!("password reset mail requested");
        Ok(())
    }

    /// Exchanges the code from the recovery deep link for a session.
    pub async fn exchange_code(&self, code: &str) -> Result<Session> {
        let code = code.trim();
        if code.is_empty() {
            return Err(QuoteVaultError::validation(
                Field::Code,
                "The reset link is missing its code",
            ));
        }
        let verifier = self.session.take_verifier().ok_or_else(|| {
            QuoteVaultError::validation(
                Field::Code,
                "This reset link was not requested from this device",
            )
        })?;
        self.token_grant(
            "pkce",
            serde_json::json!({ "auth_code": code, "code_verifier": verifier }),
            Some(Field::Code),
        )
        .await
    }

    /// Sets a new password for the signed-in user.
    pub async fn update_password(&self, password: &str, confirmation: &str) -> Result<()> {
        validate_password(password)?;
        validate_password_confirmation(password, confirmation)?;
        let token = self
            .session
            .access_token()
            .ok_or(QuoteVaultError::Unauthorized)?;

        let request = self
            .http
            .put(self.url("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .json(&serde_json::json!({ "password": password }));
        Self::send(request, Some(Field::Password)).await?;
        info!("password updated");
        Ok(())
    }

    /// Renews the session when it is close to expiry.
    pub async fn refresh_if_needed(&self) -> Result<Option<Session>> {
        let Some(session) = self.session.current() else {
            return Ok(None);
        };
        if !session.is_expired(Utc::now()) {
            return Ok(Some(session));
        }
        let refreshed = self
            .token_grant(
                "refresh_token",
                serde_json::json!({ "refresh_token": session.refresh_token }),
                None,
            )
            .await?;
        info!(user_id = %refreshed.user.id, "session refreshed");
        Ok(Some(refreshed))
    }

    /// Revokes the session remotely and forgets it locally either way.
    pub async fn sign_out(&self) -> Result<()> {
        let token = self.session.access_token();
        self.session.clear();
        if let Some(token) = token {
            let request = self.post("logout", &serde_json::json!({})).bearer_auth(token);
            if let Err(e) = Self::send(request, None).await {
                warn!(error = %e, "remote sign-out failed");
            }
        }
        info!("signed out");
        Ok(())
    }
}

fn new_verifier() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in_secs: i64) -> Session {
        Session {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: Some("reader@example.com".into()),
            },
        }
    }

    #[test]
    fn expiry_has_margin() {
        assert!(!session(3600).is_expired(Utc::now()));
        assert!(session(30).is_expired(Utc::now()));
    }

    #[test]
    fn store_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let empty = SessionStore::load(&path).unwrap();
        assert!(empty.current().is_none());

        let store = SessionStore::new();
        let s = session(3600);
        store.set(s.clone());
        store.set_verifier("v".into());
        store.save(&path).unwrap();

        let restored = SessionStore::load(&path).unwrap();
        assert_eq!(restored.current(), Some(s.clone()));
        assert_eq!(restored.user_id(), Some(s.user.id));
        assert_eq!(restored.take_verifier().as_deref(), Some("v"));
        assert_eq!(restored.take_verifier(), None);
    }

    #[test]
    fn verifier_is_long_enough_for_pkce() {
        let v = new_verifier();
        assert_eq!(v.len(), 64);
        assert_ne!(v, new_verifier());
    }

    #[tokio::test]
    async fn sign_in_validates_before_sending() {
        let config = ClientConfig {
            // Nothing listens here; validation must fail first.
            api_url: Some("http://127.0.0.1:9".into()),
            ..ClientConfig::default()
        };
        let auth = AuthClient::new(&config, SessionStore::new()).unwrap();
        let err = auth.sign_in("not-an-email", "secret").await.unwrap_err();
        assert_eq!(err.field(), Some(Field::Email));

        let err = auth.sign_in("a@b.co", "123").await.unwrap_err();
        assert_eq!(err.field(), Some(Field::Password));
    }

    #[tokio::test]
    async fn exchange_without_request_is_rejected() {
        let config = ClientConfig {
            api_url: Some("http://127.0.0.1:9".into()),
            ..ClientConfig::default()
        };
        let auth = AuthClient::new(&config, SessionStore::new()).unwrap();
        let err = auth.exchange_code("abc").await.unwrap_err();
        assert_eq!(err.field(), Some(Field::Code));
    }
}
