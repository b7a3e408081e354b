//! Identity
//!
//! Bearer credentials are issued by the managed auth service; this module
//! only defines how the rest of the system asks "who is calling?".

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Auth-service user identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The caller behind a verified bearer credential
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            email: None,
            full_name: None,
            phone: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A signed-in session issued by the auth service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Seconds until `access_token` expires
    #[serde(default)]
    pub expires_in: Option<u64>,

    pub user: AuthenticatedUser,
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn parse_bearer(header: Option<&str>) -> Result<&str> {
    let header = header
        .filter(|h| h.starts_with("Bearer "))
        .ok_or_else(|| CoreError::Unauthenticated("No token provided".into()))?;

    match header.split(' ').nth(1) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(CoreError::Unauthenticated("Invalid token format".into())),
    }
}

/// Identity provider trait (Strategy pattern)
///
/// Implement this for each auth backend. Rejections must use
/// [`CoreError::Unauthenticated`] or [`CoreError::SessionExpired`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token to a user
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser>;

    /// Exchange email and password for a session
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Provider name
    fn name(&self) -> &str;
}

/// Token table identity provider (for development and tests)
///
/// Rejects every token it was not told about, so an empty table denies all.
#[derive(Default)]
pub struct StaticIdentityProvider {
    users: RwLock<HashMap<String, AuthenticatedUser>>,
    expired: RwLock<HashSet<String>>,
    /// email -> (password, token)
    credentials: RwLock<HashMap<String, (String, String)>>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as `user`
    #[must_use]
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.insert(token, user);
        self
    }

    pub fn insert(&self, token: impl Into<String>, user: AuthenticatedUser) {
        if let Ok(mut users) = self.users.write() {
            users.insert(token.into(), user);
        }
    }

    /// Let `email`/`password` sign in as the user behind `token`
    #[must_use]
    pub fn with_credentials(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        if let Ok(mut credentials) = self.credentials.write() {
            credentials.insert(email.into(), (password.into(), token.into()));
        }
        self
    }

    /// Mark a token as expired
    pub fn expire(&self, token: &str) {
        if let Ok(mut expired) = self.expired.write() {
            expired.insert(token.to_string());
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let expired = self
            .expired
            .read()
            .map_err(|e| CoreError::Provider(e.to_string()))?;
        if expired.contains(token) {
            return Err(CoreError::SessionExpired);
        }

        let users = self
            .users
            .read()
            .map_err(|e| CoreError::Provider(e.to_string()))?;
        users
            .get(token)
            .cloned()
            .ok_or_else(|| CoreError::Unauthenticated("Invalid token".into()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let token = {
            let credentials = self
                .credentials
                .read()
                .map_err(|e| CoreError::Provider(e.to_string()))?;
            match credentials.get(email) {
                Some((known, token)) if known == password => token.clone(),
                _ => return Err(CoreError::Unauthenticated("Invalid login credentials".into())),
            }
        };

        let user = self.authenticate(&token).await?;
        Ok(Session {
            access_token: token,
            refresh_token: None,
            expires_in: None,
            user,
        })
    }

    fn name(&self) -> &str {
        "StaticIdentity"
    }
}
