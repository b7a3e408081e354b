//! PostgREST-backed stores
//!
//! `payments` must carry a unique constraint on `external_payment_id`; a
//! violation comes back as 409 and is reported as a replay.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use maid_core::{ContactMessage, ContactStore, CoreError, UserId};
use maid_payments::{PaymentError, PaymentRecord, PaymentStore};
use reqwest::{Method, StatusCode};

use super::{SupabaseClient, eq, timestamp};

const PAYMENTS: &str = "payments";
const CONTACT_MESSAGES: &str = "contact_messages";

/// Payment records in the `payments` table
pub struct SupabasePaymentStore {
    client: SupabaseClient,
}

impl SupabasePaymentStore {
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn select(&self, filters: &[(&str, String)]) -> maid_payments::Result<Vec<PaymentRecord>> {
        let response = self
            .client
            .request(Method::GET, self.client.table_url(PAYMENTS), None)
            .query(filters)
            .send()
            .await
            .map_err(|e| PaymentError::Storage(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Storage(format!("select {PAYMENTS} ({status}): {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| PaymentError::Storage(e.to_string()))
    }
}

#[async_trait]
impl PaymentStore for SupabasePaymentStore {
    async fn insert(&self, record: &PaymentRecord) -> maid_payments::Result<PaymentRecord> {
        let response = self
            .client
            .request(Method::POST, self.client.table_url(PAYMENTS), None)
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await
            .map_err(|e| PaymentError::Storage(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(PaymentError::AlreadyRecorded(
                record.external_payment_id.clone(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Storage(format!("insert {PAYMENTS} ({status}): {body}")));
        }

        let mut rows: Vec<PaymentRecord> = response
            .json()
            .await
            .map_err(|e| PaymentError::Storage(e.to_string()))?;
        rows.pop()
            .ok_or_else(|| PaymentError::Storage("insert returned no row".into()))
    }

    async fn find_by_external_id(
        &self,
        external_payment_id: &str,
    ) -> maid_payments::Result<Option<PaymentRecord>> {
        let mut rows = self
            .select(&[
                ("external_payment_id", eq(external_payment_id)),
                ("limit", "1".into()),
            ])
            .await?;
        Ok(rows.pop())
    }

    async fn active_for(
        &self,
        user_id: &UserId,
        maid_id: &str,
        now: DateTime<Utc>,
    ) -> maid_payments::Result<Option<PaymentRecord>> {
        let mut rows = self
            .select(&[
                ("user_id", eq(user_id.as_str())),
                ("maid_id", eq(maid_id)),
                ("status", eq("completed")),
                (
                    "expires_at",
                    format!("gt.{}", timestamp(now)),
                ),
                ("order", "expires_at.desc".into()),
                ("limit", "1".into()),
            ])
            .await?;
        Ok(rows.pop())
    }
}

/// Messages in the `contact_messages` table
pub struct SupabaseContactStore {
    client: SupabaseClient,
}

impl SupabaseContactStore {
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContactStore for SupabaseContactStore {
    async fn save(&self, message: &ContactMessage) -> maid_core::Result<()> {
        let response = self
            .client
            .request(Method::POST, self.client.table_url(CONTACT_MESSAGES), None)
            .header("Prefer", "return=minimal")
            .json(&[message])
            .send()
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Contact message insert failed");
            return Err(CoreError::Storage(format!(
                "insert {CONTACT_MESSAGES} ({status})"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_row_parsing() {
        // PostgREST echoes rows back with the columns we wrote
        let row = serde_json::json!({
            "id": "2b0a9f3e-8d4c-4f7e-9a51-0c3c1a2b7d10",
            "user_id": "U",
            "maid_id": "P1",
            "external_payment_id": "HT6o6PEZRWFJ5ygavzHWd5",
            "amount": 1000,
            "plan_type": "standard",
            "num_maids": 3,
            "days_valid": 14,
            "status": "completed",
            "created_at": "2026-10-16T08:00:00+00:00",
            "expires_at": "2026-10-30T08:00:00+00:00"
        });
        let record: PaymentRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.validity_days, 14);
        assert_eq!(record.maid_id, "P1");
    }
}
