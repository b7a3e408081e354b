//! Mock Gateway
//!
//! For testing and local development. Settles every payment at the plan
//! price unless told otherwise.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{InitiateRequest, InitiateResponse, LookupResponse, PaymentGateway, COMPLETED_STATUS};
use crate::error::{PaymentError, Result};

#[derive(Default)]
struct MockState {
    initiated: Vec<InitiateRequest>,
    lookup_status: Option<String>,
    settled_amount: Option<i64>,
    initiate_failure: Option<(u16, String)>,
    verify_failure: Option<(u16, String)>,
    verified: Vec<(String, i64)>,
}

/// In-memory gateway
#[derive(Default)]
pub struct MockGateway {
    state: RwLock<MockState>,
    next_pidx: AtomicUsize,
    lookups: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `status` from lookup instead of `Completed`
    #[must_use]
    pub fn with_lookup_status(self, status: impl Into<String>) -> Self {
        self.write(|s| s.lookup_status = Some(status.into()));
        self
    }

    /// Report a settled amount other than the verified one
    #[must_use]
    pub fn with_settled_amount(self, paisa: i64) -> Self {
        self.write(|s| s.settled_amount = Some(paisa));
        self
    }

    /// Reject initiation with a gateway error
    #[must_use]
    pub fn failing_initiate(self, status: u16, detail: impl Into<String>) -> Self {
        self.write(|s| s.initiate_failure = Some((status, detail.into())));
        self
    }

    /// Reject verification with a gateway error
    #[must_use]
    pub fn failing_verify(self, status: u16, detail: impl Into<String>) -> Self {
        self.write(|s| s.verify_failure = Some((status, detail.into())));
        self
    }

    /// Initiation requests received so far
    pub fn initiated(&self) -> Vec<InitiateRequest> {
        self.state
            .read()
            .map(|s| s.initiated.clone())
            .unwrap_or_default()
    }

    /// Number of gateway round trips made for verification (verify + lookup)
    pub fn verification_calls(&self) -> usize {
        let verified = self.state.read().map(|s| s.verified.len()).unwrap_or_default();
        verified + self.lookups.load(Ordering::SeqCst)
    }

    fn write(&self, f: impl FnOnce(&mut MockState)) {
        if let Ok(mut state) = self.state.write() {
            f(&mut state);
        }
    }

    fn lock_err<E: std::fmt::Display>(e: E) -> PaymentError {
        PaymentError::GatewayPayload(format!("mock state poisoned: {e}"))
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn initiate(&self, request: &InitiateRequest) -> Result<InitiateResponse> {
        let mut state = self.state.write().map_err(Self::lock_err)?;
        if let Some((status, message)) = state.initiate_failure.clone() {
            return Err(PaymentError::Gateway { status, message });
        }
        state.initiated.push(request.clone());

        let n = self.next_pidx.fetch_add(1, Ordering::SeqCst) + 1;
        let pidx = format!("mock-pidx-{n}");

        Ok(InitiateResponse {
            payment_url: format!("https://test-pay.khalti.com/?pidx={pidx}&amount={}", request.amount),
            pidx,
            expires_at: None,
            expires_in: Some(1800),
            extra: serde_json::Map::new(),
        })
    }

    async fn verify(&self, token: &str, amount: i64) -> Result<serde_json::Value> {
        let mut state = self.state.write().map_err(Self::lock_err)?;
        state.verified.push((token.to_string(), amount));
        if let Some((status, message)) = state.verify_failure.clone() {
            return Err(PaymentError::Gateway { status, message });
        }

        Ok(serde_json::json!({ "token": token, "amount": amount, "state": "verified" }))
    }

    async fn lookup(&self, token: &str) -> Result<LookupResponse> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().map_err(Self::lock_err)?;

        let verified_amount = state
            .verified
            .iter()
            .rev()
            .find(|(t, _)| t == token)
            .map(|(_, amount)| *amount);

        Ok(LookupResponse {
            pidx: Some(token.to_string()),
            idx: None,
            status: state
                .lookup_status
                .clone()
                .unwrap_or_else(|| COMPLETED_STATUS.to_string()),
            total_amount: state.settled_amount.or(verified_amount),
            transaction_id: Some(format!("txn-{token}")),
            extra: serde_json::Map::new(),
        })
    }

    fn name(&self) -> &str {
        "MockGateway"
    }
}
