//! Session resolver and current-user state.
//!
//! `AuthSession` is built once at startup and owned by whoever drives the
//! shell. It is the only writer of the current user and permission set:
//! `restore_session`, `login`, `logout` and `load_permissions` are the four
//! mutating operations, and every access check afterwards is answered from
//! memory.
//!
//! Failure policy: only `login` reports anything to its caller. Lookup and
//! storage failures elsewhere are logged and resolve to the safest state
//! (anonymous user, empty permissions, dropped audit entry).

use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::audit::AuditLogger;
use super::credentials::CredentialVerifier;
use super::permissions::{PermissionSet, fetch_permissions};
use super::AuthError;
use crate::cache::TokenStore;
use crate::client::{
    Collection, DataClient, Filter, ListQuery, Record, create_from, first_as,
};
use crate::models::{AuditAction, Role, SessionRecord, User, UserRecord};
use crate::utils::{generate_session_token, new_record_id};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

/// `Uninitialized → Loading → {Anonymous | Authenticated}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Uninitialized,
    Loading,
    Anonymous,
    Authenticated,
}

/// Result of [`AuthSession::login`]. Login never fails with an error type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            error: Some(message.to_string()),
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct AuthSession {
    client: Arc<dyn DataClient>,
    tokens: Arc<dyn TokenStore>,
    credentials: Arc<dyn CredentialVerifier>,
    audit: AuditLogger,
    ttl: Duration,
    status: AuthStatus,
    user: Option<User>,
    permissions: PermissionSet,
}

impl AuthSession {
    pub fn new(
        client: Arc<dyn DataClient>,
        tokens: Arc<dyn TokenStore>,
        credentials: Arc<dyn CredentialVerifier>,
        ttl: std::time::Duration,
        user_agent: &str,
    ) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or_else(|_| Duration::hours(24));
        Self {
            audit: AuditLogger::new(client.clone(), user_agent),
            client,
            tokens,
            credentials,
            ttl,
            status: AuthStatus::Uninitialized,
            user: None,
            permissions: PermissionSet::empty(),
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    /// True until the first restore or an in-flight login settles.
    pub fn is_loading(&self) -> bool {
        matches!(self.status, AuthStatus::Uninitialized | AuthStatus::Loading)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn can_access(&self, module: &str) -> bool {
        self.user.is_some() && self.permissions.can_access(module)
    }

    pub fn has_permission(&self, module: &str, verb: &str) -> bool {
        self.user.is_some() && self.permissions.has_permission(module, verb)
    }

    /// Re-establish the user behind the persisted token, if any.
    ///
    /// Expiry is checked here only; an authenticated session is not
    /// re-validated while it stays in memory.
    pub async fn restore_session(&mut self) -> AuthStatus {
        self.status = AuthStatus::Loading;

        match self.resolve_stored_session().await {
            Ok(Some(user)) => {
                tracing::info!("restored session for {}", user.email);
                let role = user.role;
                self.user = Some(user);
                self.load_permissions(role).await;
                self.status = AuthStatus::Authenticated;
            }
            Ok(None) => self.become_anonymous(),
            Err(e) => {
                tracing::error!("Session check failed: {}", e);
                self.discard_token().await;
                self.become_anonymous();
            }
        }
        self.status
    }

    async fn resolve_stored_session(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.tokens.get().await? else {
            tracing::debug!("no stored session token");
            return Ok(None);
        };

        let now = Utc::now();
        let session: Option<SessionRecord> = first_as(
            self.client.as_ref(),
            Collection::UserSessions,
            ListQuery::filter(
                Filter::new()
                    .eq("token", token.as_str())
                    .gte("expiresAt", timestamp(now)),
            ),
        )
        .await?;

        let Some(session) = session.filter(|s| s.is_valid_at(now)) else {
            tracing::info!("stored session token is unknown or expired");
            self.discard_token().await;
            return Ok(None);
        };

        let user: Option<UserRecord> = first_as(
            self.client.as_ref(),
            Collection::Users,
            ListQuery::filter(
                Filter::new()
                    .eq("id", session.user_id.as_str())
                    .eq("isActive", true),
            ),
        )
        .await?;

        match user {
            Some(record) => Ok(Some(record.into())),
            None => {
                tracing::info!("session user {} is missing or inactive", session.user_id);
                self.discard_token().await;
                Ok(None)
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> LoginOutcome {
        self.status = AuthStatus::Loading;

        match self.authenticate(email, password).await {
            Ok(user) => {
                tracing::info!("{} logged in as {}", user.email, user.role);
                let role = user.role;
                let user_id = user.id.clone();
                self.user = Some(user);
                self.load_permissions(role).await;
                self.status = AuthStatus::Authenticated;
                self.audit
                    .record(
                        &user_id,
                        AuditAction::Login,
                        json!({ "email": email }),
                    )
                    .await;
                LoginOutcome::success()
            }
            Err(AuthError::InvalidCredentials) => {
                tracing::info!("login rejected for {}", email);
                self.settle();
                LoginOutcome::failure(INVALID_CREDENTIALS_MESSAGE)
            }
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                self.settle();
                LoginOutcome::failure(LOGIN_FAILED_MESSAGE)
            }
        }
    }

    /// Verify credentials and open a new session. Touches no in-memory state.
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.to_lowercase();
        let record: UserRecord = first_as(
            self.client.as_ref(),
            Collection::Users,
            ListQuery::filter(
                Filter::new()
                    .eq("email", email.as_str())
                    .eq("isActive", true),
            ),
        )
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

        if !self.credentials.verify(&record, password)? {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let token = generate_session_token();
        let session = SessionRecord {
            id: new_record_id("session"),
            user_id: record.id.clone(),
            token: token.clone(),
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            created_at: Some(now),
        };
        create_from(self.client.as_ref(), Collection::UserSessions, &session).await?;

        let mut fields = Record::new();
        fields.insert("lastLogin".into(), timestamp(now).into());
        self.client
            .update(Collection::Users, &record.id, fields)
            .await?;

        self.tokens.set(&token).await?;

        let mut user = User::from(record);
        user.last_login = Some(now);
        Ok(user)
    }

    /// Best effort remote cleanup; local state is always cleared.
    pub async fn logout(&mut self) {
        let token = match self.tokens.get().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("could not read stored token on logout: {}", e);
                None
            }
        };

        if let (Some(token), Some(user_id)) = (token, self.user.as_ref().map(|u| u.id.clone())) {
            match self.revoke_session(&token).await {
                Ok(()) => {
                    self.audit
                        .record(&user_id, AuditAction::Logout, json!({}))
                        .await
                }
                Err(e) => tracing::error!("Logout failed to remove session: {}", e),
            }
        }

        if let Err(e) = self.tokens.clear().await {
            tracing::error!("Logout failed to clear stored token: {}", e);
        }
        self.become_anonymous();
        tracing::info!("logged out");
    }

    async fn revoke_session(&self, token: &str) -> Result<(), AuthError> {
        let session: Option<SessionRecord> = first_as(
            self.client.as_ref(),
            Collection::UserSessions,
            ListQuery::filter(Filter::new().eq("token", token)),
        )
        .await?;

        if let Some(session) = session {
            self.client
                .delete(Collection::UserSessions, &session.id)
                .await?;
        }
        Ok(())
    }

    /// Replace the permission set wholesale. Fails closed to an empty set.
    pub async fn load_permissions(&mut self, role: Role) {
        self.permissions = match fetch_permissions(self.client.as_ref(), role).await {
            Ok(set) => set,
            Err(e) => {
                tracing::error!("Failed to load permissions for {}: {}", role, e);
                PermissionSet::empty()
            }
        };
    }

    async fn discard_token(&self) {
        if let Err(e) = self.tokens.clear().await {
            tracing::warn!("could not discard stored token: {}", e);
        }
    }

    fn settle(&mut self) {
        self.status = if self.user.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        };
    }

    fn become_anonymous(&mut self) {
        self.user = None;
        self.permissions = PermissionSet::empty();
        self.status = AuthStatus::Anonymous;
    }
}
