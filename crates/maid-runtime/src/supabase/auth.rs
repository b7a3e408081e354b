//! Supabase Auth identity provider

use async_trait::async_trait;
use maid_core::{AuthenticatedUser, CoreError, IdentityProvider, Result, Session, UserId};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::SupabaseClient;

/// Resolves bearer tokens through `GET /auth/v1/user` and signs users in
/// through the password grant
pub struct SupabaseIdentity {
    client: SupabaseClient,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    user: UserPayload,
}

impl From<TokenPayload> for Session {
    fn from(payload: TokenPayload) -> Self {
        Self {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            expires_in: payload.expires_in,
            user: payload.user.into(),
        }
    }
}

impl SupabaseIdentity {
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl From<UserPayload> for AuthenticatedUser {
    fn from(payload: UserPayload) -> Self {
        let non_empty = |s: Option<String>| s.filter(|v| !v.is_empty());
        Self {
            id: UserId::new(payload.id),
            email: non_empty(payload.email),
            full_name: non_empty(payload.user_metadata.and_then(|m| m.full_name)),
            phone: non_empty(payload.phone),
        }
    }
}

fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["msg", "message", "error_description"]
                .iter()
                .find_map(|k| v.get(*k).and_then(serde_json::Value::as_str).map(String::from))
        })
        .unwrap_or_default()
}

/// Map an auth-service rejection to the right core error
fn classify_rejection(status: StatusCode, body: &str) -> CoreError {
    let message = rejection_message(body);

    if message.contains("expired") {
        CoreError::SessionExpired
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        CoreError::Unauthenticated("Invalid token".into())
    } else {
        CoreError::Provider(format!("auth service returned {status}: {message}"))
    }
}

/// Map a password-grant rejection; bad credentials come back as 400
fn classify_sign_in(status: StatusCode, body: &str) -> CoreError {
    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
        let message = rejection_message(body);
        CoreError::Unauthenticated(if message.is_empty() {
            "Invalid login credentials".into()
        } else {
            message
        })
    } else {
        CoreError::Provider(format!("auth service returned {status}"))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let response = self
            .client
            .request(Method::GET, self.client.auth_url("user"), Some(token))
            .send()
            .await
            .map_err(|e| CoreError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_rejection(status, &body);
            tracing::warn!(status = status.as_u16(), error = %err, "Token verification failed");
            return Err(err);
        }

        let payload: UserPayload = response
            .json()
            .await
            .map_err(|e| CoreError::Provider(e.to_string()))?;

        tracing::debug!(user_id = %payload.id, "Token verified");
        Ok(payload.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .client
            .request(Method::POST, self.client.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|e| CoreError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_sign_in(status, &body);
            tracing::warn!(status = status.as_u16(), error = %err, "Sign-in rejected");
            return Err(err);
        }

        let payload: TokenPayload = response
            .json()
            .await
            .map_err(|e| CoreError::Provider(e.to_string()))?;

        tracing::info!(user_id = %payload.user.id, "User signed in");
        Ok(payload.into())
    }

    fn name(&self) -> &str {
        "SupabaseAuth"
    }
}
