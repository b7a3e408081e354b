//! Pending orders in PostgREST
//!
//! `pending_orders` is keyed by `token`. Transitions are a conditional PATCH
//! on `token` and the expected `state`, so two verifiers racing on one token
//! cannot both move it out of `gateway_redirected`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use maid_payments::{FlowState, OrderStore, PaymentError, PendingOrder, Result};
use reqwest::{Method, StatusCode};
use serde::Serialize;

use super::{SupabaseClient, eq, timestamp};

const PENDING_ORDERS: &str = "pending_orders";

/// Columns written by a transition
#[derive(Serialize)]
struct StateChange {
    state: FlowState,
    updated_at: DateTime<Utc>,
}

/// Pending orders in the `pending_orders` table
pub struct SupabaseOrderStore {
    client: SupabaseClient,
}

impl SupabaseOrderStore {
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn rows(response: reqwest::Response, action: &str) -> Result<Vec<PendingOrder>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Storage(format!(
                "{action} {PENDING_ORDERS} ({status}): {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PaymentError::Storage(e.to_string()))
    }
}

fn by_token(token: &str) -> Vec<(&'static str, String)> {
    vec![("token", eq(token)), ("limit", "1".into())]
}

/// Only rows still in `from` are updated
fn transition_filters(token: &str, from: FlowState) -> Vec<(&'static str, String)> {
    vec![("token", eq(token)), ("state", eq(from.as_str()))]
}

/// Unsettled rows created before `now - ttl`
fn purge_filters(ttl: Duration, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
    vec![
        ("created_at", format!("lt.{}", timestamp(now - ttl))),
        (
            "state",
            format!("not.in.({},{})", FlowState::Completed, FlowState::Failed),
        ),
        ("select", "token".into()),
    ]
}

fn storage(e: reqwest::Error) -> PaymentError {
    PaymentError::Storage(e.to_string())
}

#[async_trait]
impl OrderStore for SupabaseOrderStore {
    async fn insert(&self, order: &PendingOrder) -> Result<()> {
        let response = self
            .client
            .request(Method::POST, self.client.table_url(PENDING_ORDERS), None)
            .header("Prefer", "return=minimal")
            .json(&[order])
            .send()
            .await
            .map_err(storage)?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(PaymentError::Storage(format!(
                "duplicate payment token {}",
                order.token
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Storage(format!(
                "insert {PENDING_ORDERS} ({status}): {body}"
            )));
        }

        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<PendingOrder>> {
        let response = self
            .client
            .request(Method::GET, self.client.table_url(PENDING_ORDERS), None)
            .query(&by_token(token))
            .send()
            .await
            .map_err(storage)?;

        Ok(Self::rows(response, "select").await?.pop())
    }

    async fn transition(&self, token: &str, from: FlowState, to: FlowState) -> Result<PendingOrder> {
        if !from.can_transition_to(to) {
            return Err(PaymentError::InvalidTransition { from, to });
        }

        let response = self
            .client
            .request(Method::PATCH, self.client.table_url(PENDING_ORDERS), None)
            .query(&transition_filters(token, from))
            .header("Prefer", "return=representation")
            .json(&StateChange {
                state: to,
                updated_at: Utc::now(),
            })
            .send()
            .await
            .map_err(storage)?;

        if let Some(order) = Self::rows(response, "update").await?.pop() {
            return Ok(order);
        }

        // Nothing matched: the token is unknown or another request moved it
        match self.get(token).await? {
            Some(order) => Err(PaymentError::InvalidTransition {
                from: order.state,
                to,
            }),
            None => Err(PaymentError::UnknownOrder(token.to_string())),
        }
    }

    async fn purge_stale(&self, ttl: Duration, now: DateTime<Utc>) -> Result<usize> {
        let response = self
            .client
            .request(Method::DELETE, self.client.table_url(PENDING_ORDERS), None)
            .query(&purge_filters(ttl, now))
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(storage)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Storage(format!(
                "delete {PENDING_ORDERS} ({status}): {body}"
            )));
        }

        let purged: Vec<serde_json::Value> = response.json().await.map_err(storage)?;
        Ok(purged.len())
    }
}
