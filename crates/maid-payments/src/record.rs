//! Payment Records
//!
//! One row per gateway-confirmed payment. Records are never updated; the
//! unlock state of a (user, helper) pair is derived from them.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use maid_core::{Plan, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PaymentError, Result};
use crate::order::PendingOrder;

/// Record status; only settled payments are ever stored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
}

/// A persisted payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub user_id: UserId,

    /// The helper profile this payment unlocks
    pub maid_id: String,

    /// Gateway payment id, unique across records
    pub external_payment_id: String,

    /// Rupees
    pub amount: Decimal,

    #[serde(rename = "plan_type")]
    pub plan: Plan,

    #[serde(rename = "num_maids")]
    pub contact_quota: u32,

    #[serde(rename = "days_valid")]
    pub validity_days: u32,

    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Record for a confirmed order, valid for the plan's days from `now`
    pub fn for_order(order: &PendingOrder, external_payment_id: String, now: DateTime<Utc>) -> Self {
        let terms = order.plan.terms();
        Self {
            id: Uuid::new_v4(),
            user_id: order.user_id.clone(),
            maid_id: order.maid_id.clone(),
            external_payment_id,
            amount: order.amount,
            plan: order.plan,
            contact_quota: terms.contact_quota,
            validity_days: terms.validity_days,
            status: PaymentStatus::Completed,
            created_at: now,
            expires_at: now + Duration::days(i64::from(terms.validity_days)),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == PaymentStatus::Completed && self.expires_at > now
    }
}

/// Whether a user may see a helper's contact fields
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockStatus {
    pub maid_id: String,
    pub unlocked: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl UnlockStatus {
    pub fn locked(maid_id: impl Into<String>) -> Self {
        Self {
            maid_id: maid_id.into(),
            unlocked: false,
            plan: None,
            expires_at: None,
        }
    }

    pub fn from_record(record: &PaymentRecord) -> Self {
        Self {
            maid_id: record.maid_id.clone(),
            unlocked: true,
            plan: Some(record.plan),
            expires_at: Some(record.expires_at),
        }
    }
}

/// Payment record storage trait
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Insert a record
    ///
    /// Fails with [`PaymentError::AlreadyRecorded`] when the external
    /// payment id is already stored.
    async fn insert(&self, record: &PaymentRecord) -> Result<PaymentRecord>;

    /// Get record by gateway payment id
    async fn find_by_external_id(&self, external_payment_id: &str) -> Result<Option<PaymentRecord>>;

    /// Latest-expiring record still active for (user, helper)
    async fn active_for(
        &self,
        user_id: &UserId,
        maid_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PaymentRecord>>;
}

/// In-memory payment store (for development)
#[derive(Default)]
pub struct MemoryPaymentStore {
    records: RwLock<HashMap<String, PaymentRecord>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn insert(&self, record: &PaymentRecord) -> Result<PaymentRecord> {
        let mut records = self
            .records
            .write()
            .map_err(|e| PaymentError::Storage(e.to_string()))?;

        if records.contains_key(&record.external_payment_id) {
            return Err(PaymentError::AlreadyRecorded(
                record.external_payment_id.clone(),
            ));
        }
        records.insert(record.external_payment_id.clone(), record.clone());

        Ok(record.clone())
    }

    async fn find_by_external_id(&self, external_payment_id: &str) -> Result<Option<PaymentRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| PaymentError::Storage(e.to_string()))?;
        Ok(records.get(external_payment_id).cloned())
    }

    async fn active_for(
        &self,
        user_id: &UserId,
        maid_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PaymentRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| PaymentError::Storage(e.to_string()))?;

        Ok(records
            .values()
            .filter(|r| &r.user_id == user_id && r.maid_id == maid_id && r.is_active(now))
            .max_by_key(|r| r.expires_at)
            .cloned())
    }
}
