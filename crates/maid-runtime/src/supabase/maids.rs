//! Maid profiles from the `maids` table

use async_trait::async_trait;
use maid_core::{CoreError, MaidDirectory, MaidRecord, Result};
use reqwest::Method;

use super::{SupabaseClient, eq};

const MAIDS: &str = "maids";

/// Read-only view of the `maids` table
pub struct SupabaseMaidDirectory {
    client: SupabaseClient,
}

impl SupabaseMaidDirectory {
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn select(&self, filters: &[(&str, String)]) -> Result<Vec<MaidRecord>> {
        let response = self
            .client
            .request(Method::GET, self.client.table_url(MAIDS), None)
            .query(filters)
            .send()
            .await
            .map_err(|e| CoreError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Maid query failed");
            return Err(CoreError::Provider(format!("select {MAIDS} ({status})")));
        }

        response
            .json()
            .await
            .map_err(|e| CoreError::Provider(e.to_string()))
    }
}

fn list_filters() -> Vec<(&'static str, String)> {
    vec![("select", "*".into()), ("order", "created_at.desc".into())]
}

fn profile_filters(id: &str) -> Vec<(&'static str, String)> {
    vec![("select", "*".into()), ("id", eq(id)), ("limit", "1".into())]
}

#[async_trait]
impl MaidDirectory for SupabaseMaidDirectory {
    async fn list(&self) -> Result<Vec<MaidRecord>> {
        self.select(&list_filters()).await
    }

    async fn get(&self, id: &str) -> Result<Option<MaidRecord>> {
        Ok(self.select(&profile_filters(id)).await?.pop())
    }

    fn name(&self) -> &str {
        "SupabaseMaids"
    }
}
