//! Payment Gateway Integration
//!
//! Abstractions over the hosted-checkout gateway and its implementations.

mod khalti;
mod mock;

pub use khalti::{KhaltiClient, KhaltiConfig};
pub use mock::MockGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Literal lookup status of a settled payment
pub const COMPLETED_STATUS: &str = "Completed";

/// Customer shown on the gateway's payment page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Initiate call body
///
/// `amount` is in paisa.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiateRequest {
    pub return_url: String,
    pub website_url: String,
    pub amount: i64,
    pub purchase_order_id: String,
    pub purchase_order_name: String,
    pub customer_info: CustomerInfo,
}

/// Initiate call result, forwarded to the browser as-is
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitiateResponse {
    /// Gateway payment id; comes back on the redirect as the token
    pub pidx: String,

    /// Hosted payment page
    pub payment_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    /// Fields we do not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Lookup call result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pidx: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idx: Option<String>,

    pub status: String,

    /// Settled amount in paisa
    #[serde(default, alias = "amount", skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LookupResponse {
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED_STATUS
    }

    /// Gateway payment id to record, falling back to the token we looked up
    pub fn external_id(&self, token: &str) -> String {
        self.idx
            .clone()
            .or_else(|| self.pidx.clone())
            .unwrap_or_else(|| token.to_string())
    }
}

/// Payment gateway trait (Strategy pattern)
///
/// Non-success answers must surface as [`crate::PaymentError::Gateway`]
/// carrying the gateway's own status and message.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start a payment and get the hosted page URL
    async fn initiate(&self, request: &InitiateRequest) -> Result<InitiateResponse>;

    /// Confirm the token was paid for `amount` paisa
    async fn verify(&self, token: &str, amount: i64) -> Result<serde_json::Value>;

    /// Fetch the settlement state of a token
    async fn lookup(&self, token: &str) -> Result<LookupResponse>;

    /// Gateway name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_parsing() {
        let body = serde_json::json!({
            "pidx": "HT6o6PEZRWFJ5ygavzHWd5",
            "total_amount": 100000,
            "status": "Completed",
            "transaction_id": "GFq9PFS7b2iYvL8Lir9oXe",
            "fee": 0,
            "refunded": false
        });
        let lookup: LookupResponse = serde_json::from_value(body).unwrap();

        assert!(lookup.is_completed());
        assert_eq!(lookup.total_amount, Some(100_000));
        assert_eq!(lookup.external_id("tok"), "HT6o6PEZRWFJ5ygavzHWd5");
        assert_eq!(lookup.extra.get("refunded"), Some(&serde_json::json!(false)));
    }

    #[test]
    fn test_status_is_literal() {
        for status in ["Pending", "Expired", "Refunded", "completed", "User canceled"] {
            let lookup: LookupResponse =
                serde_json::from_value(serde_json::json!({ "status": status })).unwrap();
            assert!(!lookup.is_completed(), "{status} must not count as completed");
        }
    }

    #[test]
    fn test_initiate_response_requires_payment_url() {
        let body = serde_json::json!({ "pidx": "abc" });
        assert!(serde_json::from_value::<InitiateResponse>(body).is_err());
    }
}
