//! Supabase Backend
//!
//! The managed auth service and the relational store, reached over HTTP with
//! the service-role key.

mod auth;
mod maids;
mod orders;
mod rest;

pub use auth::SupabaseIdentity;
pub use maids::SupabaseMaidDirectory;
pub use orders::SupabaseOrderStore;
pub use rest::{SupabaseContactStore, SupabasePaymentStore};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use maid_core::{CoreError, Result};

/// Supabase configuration
#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,

    /// Service-role key; bypasses row policies, server side only
    pub service_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_key: service_key.into(),
            timeout_secs: 15,
        }
    }

    /// Create from `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY`
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| CoreError::Config("SUPABASE_URL not set".into()))?;
        let service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| CoreError::Config("SUPABASE_SERVICE_ROLE_KEY not set".into()))?;

        Ok(Self::new(url, service_key))
    }
}

/// Shared HTTP client for one Supabase project
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    config: Arc<SupabaseConfig>,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Config(e.to_string()))?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(SupabaseConfig::from_env()?)
    }

    fn base(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base())
    }

    pub(crate) fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base())
    }

    /// Request with the project key set; `bearer` defaults to the service key
    pub(crate) fn request(
        &self,
        method: reqwest::Method,
        url: String,
        bearer: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let bearer = bearer.unwrap_or(&self.config.service_key);
        self.http
            .request(method, url)
            .header("apikey", &self.config.service_key)
            .header("Authorization", format!("Bearer {bearer}"))
            .header("Accept", "application/json")
    }
}

/// PostgREST equality filter
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// Timestamp as PostgREST compares it
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
