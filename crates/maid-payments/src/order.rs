//! Pending Orders
//!
//! The server keeps what it sent to the gateway, keyed by the gateway token,
//! so verification checks the caller's echo against it instead of trusting it.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use maid_core::{Plan, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};

/// Contact-unlock flow states
///
/// ```text
/// initiated ─▶ gateway_redirected ─▶ verifying ─┬─▶ completed
///                                               └─▶ failed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Initiated,
    GatewayRedirected,
    Verifying,
    Completed,
    Failed,
}

impl FlowState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::GatewayRedirected => "gateway_redirected",
            Self::Verifying => "verifying",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Initiated, Self::GatewayRedirected)
                | (Self::GatewayRedirected, Self::Verifying)
                | (Self::Verifying, Self::Completed | Self::Failed)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-retained initiation parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    /// Our purchase order id, sent to the gateway
    pub purchase_order_id: String,

    /// Gateway token (`pidx`)
    pub token: String,

    pub user_id: UserId,
    pub maid_id: String,
    pub plan: Plan,

    /// Rupees
    pub amount: Decimal,

    pub state: FlowState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PendingOrder {
    pub fn new(
        purchase_order_id: String,
        token: String,
        user_id: UserId,
        maid_id: String,
        plan: Plan,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            purchase_order_id,
            token,
            user_id,
            maid_id,
            plan,
            amount: plan.terms().price,
            state: FlowState::Initiated,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at > ttl
    }
}

/// Pending order storage trait
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Save a new order; the token must be unused
    async fn insert(&self, order: &PendingOrder) -> Result<()>;

    /// Get order by gateway token
    async fn get(&self, token: &str) -> Result<Option<PendingOrder>>;

    /// Move an order from `from` to `to` (atomic compare-and-set)
    ///
    /// Fails with [`PaymentError::InvalidTransition`] carrying the actual
    /// state when the order is no longer in `from`.
    async fn transition(&self, token: &str, from: FlowState, to: FlowState) -> Result<PendingOrder>;

    /// Drop unsettled orders older than `ttl`, returning how many went
    ///
    /// Terminal orders are kept so a late replay still gets its conflict.
    async fn purge_stale(&self, ttl: Duration, now: DateTime<Utc>) -> Result<usize>;
}

/// In-memory order store
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<String, PendingOrder>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: fmt::Display>(e: E) -> PaymentError {
    PaymentError::Storage(e.to_string())
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: &PendingOrder) -> Result<()> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        if orders.contains_key(&order.token) {
            return Err(PaymentError::Storage(format!(
                "duplicate payment token {}",
                order.token
            )));
        }
        orders.insert(order.token.clone(), order.clone());
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<PendingOrder>> {
        let orders = self.orders.read().map_err(poisoned)?;
        Ok(orders.get(token).cloned())
    }

    async fn transition(&self, token: &str, from: FlowState, to: FlowState) -> Result<PendingOrder> {
        if !from.can_transition_to(to) {
            return Err(PaymentError::InvalidTransition { from, to });
        }

        let mut orders = self.orders.write().map_err(poisoned)?;
        let order = orders
            .get_mut(token)
            .ok_or_else(|| PaymentError::UnknownOrder(token.to_string()))?;

        if order.state != from {
            return Err(PaymentError::InvalidTransition {
                from: order.state,
                to,
            });
        }

        order.state = to;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn purge_stale(&self, ttl: Duration, now: DateTime<Utc>) -> Result<usize> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        let before = orders.len();
        orders.retain(|_, order| order.state.is_terminal() || !order.is_stale(ttl, now));
        Ok(before - orders.len())
    }
}
