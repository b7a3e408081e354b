//! Contact-Unlock Payment Flow
//!
//! Initiation validates the plan and asks the gateway for a hosted payment
//! page. Verification confirms the returned token with the gateway (verify,
//! then lookup) and writes exactly one [`PaymentRecord`].

use std::sync::Arc;

use chrono::{Duration, Utc};
use maid_core::{AuthenticatedUser, Plan, UserId, to_minor_units};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PaymentError, Result};
use crate::gateway::{CustomerInfo, InitiateRequest, InitiateResponse, LookupResponse, PaymentGateway};
use crate::order::{FlowState, OrderStore, PendingOrder};
use crate::record::{PaymentRecord, PaymentStore, UnlockStatus};

/// Flow configuration
#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// Whether the server talks to the gateway sandbox
    pub test_mode: bool,

    /// Origin used when the request carries none
    pub public_url: String,

    /// How long an unverified order is kept
    pub order_ttl: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            test_mode: true,
            public_url: "http://localhost:3000".into(),
            order_ttl: Duration::minutes(30),
        }
    }
}

/// Initiation request body
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePayment {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub maid_id: Option<String>,
    #[serde(default)]
    pub is_test_mode: Option<bool>,
    #[serde(default)]
    pub plan: Option<String>,
}

/// Verification request body
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayment {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub maid_id: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub maids: Option<u32>,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_test_mode: Option<bool>,
}

/// Verification result
#[derive(Clone, Debug, Serialize)]
pub struct VerificationOutcome {
    pub status: &'static str,
    pub payment_details: LookupResponse,
    pub payment_record: PaymentRecord,
}

/// Fully-present verification fields
struct VerifyFields {
    token: String,
    amount: Decimal,
    maid_id: String,
    plan: Plan,
    maids: u32,
    days: u32,
    user_id: UserId,
}

impl VerifyPayment {
    /// Check all seven fields are present; nothing is sent anywhere before this
    fn require(self) -> Result<VerifyFields> {
        let mut missing = Vec::new();
        let token = self.token.filter(|t| !t.is_empty());
        let amount = self.amount.filter(|a| !a.is_zero());
        let maid_id = self.maid_id.filter(|m| !m.is_empty());
        let plan = self.plan.filter(|p| !p.is_empty());
        let maids = self.maids.filter(|m| *m > 0);
        let days = self.days.filter(|d| *d > 0);
        let user_id = self.user_id.filter(|u| !u.is_empty());

        for (name, present) in [
            ("token", token.is_some()),
            ("amount", amount.is_some()),
            ("maidId", maid_id.is_some()),
            ("plan", plan.is_some()),
            ("maids", maids.is_some()),
            ("days", days.is_some()),
            ("userId", user_id.is_some()),
        ] {
            if !present {
                missing.push(name);
            }
        }

        let (
            Some(token),
            Some(amount),
            Some(maid_id),
            Some(plan),
            Some(maids),
            Some(days),
            Some(user_id),
        ) = (token, amount, maid_id, plan, maids, days, user_id)
        else {
            return Err(PaymentError::MissingFields(missing));
        };

        Ok(VerifyFields {
            token,
            amount,
            maid_id,
            plan: plan.parse()?,
            maids,
            days,
            user_id: UserId::new(user_id),
        })
    }
}

/// Payment flow orchestrator
pub struct PaymentFlow {
    gateway: Arc<dyn PaymentGateway>,
    payments: Arc<dyn PaymentStore>,
    orders: Arc<dyn OrderStore>,
    config: FlowConfig,
}

impl PaymentFlow {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        payments: Arc<dyn PaymentStore>,
        orders: Arc<dyn OrderStore>,
        config: FlowConfig,
    ) -> Self {
        Self {
            gateway,
            payments,
            orders,
            config,
        }
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Start a payment for `user` and return the gateway's payload
    ///
    /// `origin` is the browser origin the gateway should redirect back to.
    pub async fn initiate(
        &self,
        user: &AuthenticatedUser,
        origin: Option<&str>,
        request: InitiatePayment,
    ) -> Result<InitiateResponse> {
        let (Some(amount), Some(maid_id), Some(plan)) = (
            request.amount.filter(|a| !a.is_zero()),
            request.maid_id.filter(|m| !m.is_empty()),
            request.plan.filter(|p| !p.is_empty()),
        ) else {
            return Err(PaymentError::invalid("Amount, maidId, and plan are required"));
        };

        let plan: Plan = plan.parse()?;

        if request.is_test_mode != Some(self.config.test_mode) {
            tracing::warn!(
                client = ?request.is_test_mode,
                server = self.config.test_mode,
                "Test mode mismatch"
            );
            return Err(PaymentError::TestModeMismatch {
                client: request.is_test_mode,
                server: self.config.test_mode,
            });
        }

        plan.check_amount(amount)?;
        let amount_minor = to_minor_units(amount)?;

        let origin = origin
            .filter(|o| !o.is_empty())
            .unwrap_or(&self.config.public_url)
            .trim_end_matches('/');
        let return_url = reqwest::Url::parse_with_params(
            &format!("{origin}/payment/success"),
            &[("maid_id", maid_id.as_str()), ("plan", plan.as_str())],
        )
        .map_err(|e| PaymentError::invalid(format!("Invalid origin {origin}: {e}")))?;

        let purchase_order_id = format!("maid_{maid_id}_{}", Uuid::new_v4().simple());
        let request = InitiateRequest {
            return_url: return_url.to_string(),
            website_url: origin.to_string(),
            amount: amount_minor,
            purchase_order_id: purchase_order_id.clone(),
            purchase_order_name: format!("Maid Contact Unlock - {} Plan", plan.as_str()),
            customer_info: CustomerInfo {
                name: user.full_name.clone().unwrap_or_else(|| "Customer".into()),
                email: user
                    .email
                    .clone()
                    .unwrap_or_else(|| "customer@example.com".into()),
                phone: user.phone.clone().unwrap_or_else(|| "9800000000".into()),
            },
        };

        tracing::info!(
            user_id = %user.id,
            maid_id = %maid_id,
            plan = %plan,
            amount = amount_minor,
            gateway = self.gateway.name(),
            "Initiating payment"
        );

        let response = self.gateway.initiate(&request).await.inspect_err(|e| {
            tracing::error!(error = %e, purchase_order_id = %purchase_order_id, "Payment initiation failed");
        })?;

        let now = Utc::now();
        let purged = self.orders.purge_stale(self.config.order_ttl, now).await?;
        if purged > 0 {
            tracing::debug!(purged, "Dropped stale pending orders");
        }

        let order = PendingOrder::new(
            purchase_order_id,
            response.pidx.clone(),
            user.id.clone(),
            maid_id,
            plan,
            now,
        );
        self.orders.insert(&order).await?;
        self.orders
            .transition(&order.token, FlowState::Initiated, FlowState::GatewayRedirected)
            .await?;

        tracing::info!(token = %order.token, "Payment initiated successfully");
        Ok(response)
    }

    /// Confirm a returned token and record the payment
    pub async fn verify(&self, request: VerifyPayment) -> Result<VerificationOutcome> {
        let test_mode = request.is_test_mode;
        let fields = request.require()?;

        if test_mode.is_some_and(|t| t != self.config.test_mode) {
            return Err(PaymentError::TestModeMismatch {
                client: test_mode,
                server: self.config.test_mode,
            });
        }

        let Some(order) = self.orders.get(&fields.token).await? else {
            // Order gone (purged or lost), the payment may still be on record
            if let Some(record) = self.payments.find_by_external_id(&fields.token).await? {
                tracing::warn!(token = %fields.token, record_id = %record.id, "Payment replayed after its order");
                return Err(PaymentError::AlreadyRecorded(record.external_payment_id));
            }
            return Err(PaymentError::UnknownOrder(fields.token));
        };
        if order.state != FlowState::GatewayRedirected {
            return Err(state_conflict(order.state, &order.token));
        }
        if order.is_stale(self.config.order_ttl, Utc::now()) {
            tracing::warn!(token = %order.token, created_at = %order.created_at, "Pending order expired");
            return Err(PaymentError::UnknownOrder(order.token));
        }
        check_echo(&order, &fields)?;

        self.orders
            .transition(&order.token, FlowState::GatewayRedirected, FlowState::Verifying)
            .await
            .map_err(|e| match e {
                PaymentError::InvalidTransition { from, .. } => state_conflict(from, &order.token),
                other => other,
            })?;

        let details = match self.confirm(&order).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(token = %order.token, error = %e, "Payment verification failed");
                self.settle(&order.token, FlowState::Failed).await;
                return Err(e);
            }
        };

        let record = PaymentRecord::for_order(&order, details.external_id(&order.token), Utc::now());
        let record = match self.payments.insert(&record).await {
            Ok(record) => record,
            Err(PaymentError::AlreadyRecorded(external_id)) => {
                tracing::warn!(token = %order.token, external_id = %external_id, "Payment replayed");
                self.settle(&order.token, FlowState::Completed).await;
                return Err(PaymentError::AlreadyRecorded(external_id));
            }
            Err(e) => {
                // Money moved at the gateway but nothing was recorded here.
                tracing::error!(
                    token = %order.token,
                    user_id = %order.user_id,
                    maid_id = %order.maid_id,
                    error = %e,
                    "Gateway-confirmed payment could not be stored"
                );
                self.settle(&order.token, FlowState::Failed).await;
                return Err(e);
            }
        };

        self.settle(&order.token, FlowState::Completed).await;
        tracing::info!(
            token = %order.token,
            record_id = %record.id,
            expires_at = %record.expires_at,
            "Payment recorded"
        );

        Ok(VerificationOutcome {
            status: crate::gateway::COMPLETED_STATUS,
            payment_details: details,
            payment_record: record,
        })
    }

    /// Whether `user_id` currently has `maid_id` unlocked
    pub async fn unlock_status(&self, user_id: &UserId, maid_id: &str) -> Result<UnlockStatus> {
        if maid_id.is_empty() {
            return Err(PaymentError::invalid("maidId is required"));
        }

        Ok(self
            .payments
            .active_for(user_id, maid_id, Utc::now())
            .await?
            .map_or_else(|| UnlockStatus::locked(maid_id), |r| UnlockStatus::from_record(&r)))
    }

    /// Gateway verify then lookup; only a literal `Completed` at the expected
    /// amount passes
    async fn confirm(&self, order: &PendingOrder) -> Result<LookupResponse> {
        let expected = to_minor_units(order.amount)?;

        self.gateway.verify(&order.token, expected).await?;
        let details = self.gateway.lookup(&order.token).await?;

        if !details.is_completed() {
            return Err(PaymentError::NotCompleted {
                status: details.status,
            });
        }
        if let Some(received) = details.total_amount {
            if received != expected {
                return Err(PaymentError::AmountMismatch { expected, received });
            }
        }

        Ok(details)
    }

    async fn settle(&self, token: &str, to: FlowState) {
        if let Err(e) = self.orders.transition(token, FlowState::Verifying, to).await {
            tracing::warn!(token, to = %to, error = %e, "Could not settle pending order");
        }
    }
}

/// Error for verifying an order that is not waiting for its redirect
fn state_conflict(state: FlowState, token: &str) -> PaymentError {
    match state {
        FlowState::Completed => PaymentError::AlreadyRecorded(token.to_string()),
        FlowState::Verifying => PaymentError::InProgress(token.to_string()),
        FlowState::Failed => PaymentError::AttemptFailed(token.to_string()),
        FlowState::Initiated | FlowState::GatewayRedirected => PaymentError::InvalidTransition {
            from: state,
            to: FlowState::Verifying,
        },
    }
}

/// The caller's echo of its initiation must match what we retained
fn check_echo(order: &PendingOrder, fields: &VerifyFields) -> Result<()> {
    let terms = order.plan.terms();
    let matches = fields.user_id == order.user_id
        && fields.maid_id == order.maid_id
        && fields.plan == order.plan
        && fields.amount == order.amount
        && fields.maids == terms.contact_quota
        && fields.days == terms.validity_days;

    if matches {
        Ok(())
    } else {
        tracing::warn!(token = %order.token, "Verification parameters differ from initiation");
        Err(PaymentError::invalid(
            "Payment details do not match the initiated payment",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use crate::order::MemoryOrderStore;
    use crate::record::MemoryPaymentStore;
    use rust_decimal_macros::dec;

    struct Harness {
        flow: PaymentFlow,
        gateway: Arc<MockGateway>,
        payments: Arc<MemoryPaymentStore>,
        orders: Arc<MemoryOrderStore>,
    }

    fn harness(gateway: MockGateway) -> Harness {
        let gateway = Arc::new(gateway);
        let payments = Arc::new(MemoryPaymentStore::new());
        let orders = Arc::new(MemoryOrderStore::new());
        let flow = PaymentFlow::new(
            gateway.clone(),
            payments.clone(),
            orders.clone(),
            FlowConfig::default(),
        );
        Harness {
            flow,
            gateway,
            payments,
            orders,
        }
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new("U").with_email("employer@example.com")
    }

    fn initiate_standard() -> InitiatePayment {
        InitiatePayment {
            amount: Some(dec!(1000)),
            maid_id: Some("P1".into()),
            is_test_mode: Some(true),
            plan: Some("standard".into()),
        }
    }

    fn verify_standard(token: &str) -> VerifyPayment {
        VerifyPayment {
            token: Some(token.into()),
            amount: Some(dec!(1000)),
            maid_id: Some("P1".into()),
            plan: Some("standard".into()),
            maids: Some(3),
            days: Some(14),
            user_id: Some("U".into()),
            is_test_mode: Some(true),
        }
    }

    #[tokio::test]
    async fn test_standard_plan_end_to_end() {
        let h = harness(MockGateway::new());

        let started = h
            .flow
            .initiate(&user(), Some("https://maids.example.np"), initiate_standard())
            .await
            .unwrap();
        assert!(started.payment_url.contains("amount=100000"));

        let sent = &h.gateway.initiated()[0];
        assert_eq!(sent.amount, 100_000);
        assert!(sent.purchase_order_id.starts_with("maid_P1_"));
        assert_eq!(
            sent.return_url,
            "https://maids.example.np/payment/success?maid_id=P1&plan=standard"
        );
        assert_eq!(
            h.orders.get(&started.pidx).await.unwrap().unwrap().state,
            FlowState::GatewayRedirected
        );

        let before = Utc::now();
        let outcome = h.flow.verify(verify_standard(&started.pidx)).await.unwrap();
        let after = Utc::now();

        assert_eq!(outcome.status, "Completed");
        let record = &outcome.payment_record;
        assert_eq!(record.maid_id, "P1");
        assert_eq!(record.contact_quota, 3);
        assert!(record.expires_at >= before + Duration::days(14));
        assert!(record.expires_at <= after + Duration::days(14));
        assert_eq!(h.payments.len(), 1);
        assert_eq!(
            h.orders.get(&started.pidx).await.unwrap().unwrap().state,
            FlowState::Completed
        );
    }

    #[tokio::test]
    async fn test_amount_must_equal_plan_price() {
        let h = harness(MockGateway::new());

        for plan in Plan::ALL {
            let mut request = InitiatePayment {
                amount: Some(plan.terms().price - dec!(1)),
                maid_id: Some("P1".into()),
                is_test_mode: Some(true),
                plan: Some(plan.as_str().into()),
            };
            assert_eq!(
                h.flow.initiate(&user(), None, request.clone()).await.unwrap_err().status_code(),
                400
            );

            request.amount = Some(plan.terms().price);
            h.flow.initiate(&user(), None, request).await.unwrap();
        }

        let amounts: Vec<i64> = h.gateway.initiated().iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![50_000, 100_000, 150_000]);
    }

    #[tokio::test]
    async fn test_initiate_validation() {
        let h = harness(MockGateway::new());

        let mut missing = initiate_standard();
        missing.maid_id = None;
        assert!(matches!(
            h.flow.initiate(&user(), None, missing).await,
            Err(PaymentError::Core(_))
        ));

        let mut bad_plan = initiate_standard();
        bad_plan.plan = Some("gold".into());
        assert_eq!(
            h.flow.initiate(&user(), None, bad_plan).await.unwrap_err().user_message(),
            "Invalid plan selected"
        );

        // Client claims live while the server runs in test mode
        let mut live = initiate_standard();
        live.is_test_mode = Some(false);
        assert!(matches!(
            h.flow.initiate(&user(), None, live).await,
            Err(PaymentError::TestModeMismatch { .. })
        ));

        assert!(h.gateway.initiated().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_rejection_passes_through() {
        let h = harness(MockGateway::new().failing_initiate(400, "Amount must be greater than 1000"));

        let err = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.user_message(), "Amount must be greater than 1000");
    }

    #[tokio::test]
    async fn test_missing_field_rejected_before_gateway() {
        let h = harness(MockGateway::new());
        let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();

        let blanks: [fn(&mut VerifyPayment); 7] = [
            |r| r.token = None,
            |r| r.amount = None,
            |r| r.maid_id = None,
            |r| r.plan = None,
            |r| r.maids = None,
            |r| r.days = None,
            |r| r.user_id = None,
        ];
        for blank in blanks {
            let mut request = verify_standard(&started.pidx);
            blank(&mut request);
            assert!(matches!(
                h.flow.verify(request).await,
                Err(PaymentError::MissingFields(ref f)) if f.len() == 1
            ));
        }

        assert_eq!(h.gateway.verification_calls(), 0);
    }

    #[tokio::test]
    async fn test_non_completed_status_not_recorded() {
        for status in ["Pending", "Expired", "Refunded", "User canceled"] {
            let h = harness(MockGateway::new().with_lookup_status(status));
            let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();

            let err = h.flow.verify(verify_standard(&started.pidx)).await.unwrap_err();
            assert!(matches!(err, PaymentError::NotCompleted { .. }));
            assert!(h.payments.is_empty());

            // Failed is terminal
            let again = h.flow.verify(verify_standard(&started.pidx)).await.unwrap_err();
            assert!(matches!(again, PaymentError::AttemptFailed(_)));
        }
    }

    #[tokio::test]
    async fn test_replay_does_not_duplicate() {
        let h = harness(MockGateway::new());
        let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();

        h.flow.verify(verify_standard(&started.pidx)).await.unwrap();
        let err = h.flow.verify(verify_standard(&started.pidx)).await.unwrap_err();

        assert!(matches!(err, PaymentError::AlreadyRecorded(_)));
        assert_eq!(h.payments.len(), 1);
    }

    #[tokio::test]
    async fn test_echo_must_match_initiation() {
        let h = harness(MockGateway::new());
        let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();

        let mut other_user = verify_standard(&started.pidx);
        other_user.user_id = Some("someone-else".into());
        assert_eq!(h.flow.verify(other_user).await.unwrap_err().status_code(), 400);

        let mut longer = verify_standard(&started.pidx);
        longer.days = Some(30);
        assert!(h.flow.verify(longer).await.is_err());

        assert_eq!(h.gateway.verification_calls(), 0);
        // The order is still verifiable with honest parameters
        h.flow.verify(verify_standard(&started.pidx)).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let h = harness(MockGateway::new());
        let err = h.flow.verify(verify_standard("never-issued")).await.unwrap_err();
        assert!(matches!(err, PaymentError::UnknownOrder(_)));
        assert_eq!(h.gateway.verification_calls(), 0);
    }

    #[tokio::test]
    async fn test_settled_amount_mismatch() {
        let h = harness(MockGateway::new().with_settled_amount(1_000));
        let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();

        let err = h.flow.verify(verify_standard(&started.pidx)).await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::AmountMismatch { expected: 100_000, received: 1_000 }
        ));
        assert!(h.payments.is_empty());
    }

    #[tokio::test]
    async fn test_verify_rejection_passes_through() {
        let h = harness(MockGateway::new().failing_verify(404, "Not found."));
        let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();

        let err = h.flow.verify(verify_standard(&started.pidx)).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.user_message(), "Not found.");
    }

    #[tokio::test]
    async fn test_unlock_status() {
        let h = harness(MockGateway::new());
        let u = UserId::new("U");

        assert!(!h.flow.unlock_status(&u, "P1").await.unwrap().unlocked);

        let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();
        h.flow.verify(verify_standard(&started.pidx)).await.unwrap();

        let status = h.flow.unlock_status(&u, "P1").await.unwrap();
        assert!(status.unlocked);
        assert_eq!(status.plan, Some(Plan::Standard));
        assert!(!h.flow.unlock_status(&UserId::new("V"), "P1").await.unwrap().unlocked);
    }

    #[tokio::test]
    async fn test_replay_after_order_purged() {
        let h = harness(MockGateway::new());
        let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();
        h.flow.verify(verify_standard(&started.pidx)).await.unwrap();

        // A later initiation purges with a TTL every order has outlived
        let later = Utc::now() + Duration::hours(2);
        h.orders.purge_stale(Duration::zero(), later).await.unwrap();
        h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();

        let err = h.flow.verify(verify_standard(&started.pidx)).await.unwrap_err();
        assert!(matches!(err, PaymentError::AlreadyRecorded(_)));
        assert_eq!(err.status_code(), 409);
        assert_eq!(h.payments.len(), 1);
    }

    #[tokio::test]
    async fn test_replay_after_orders_lost() {
        let h = harness(MockGateway::new());
        let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();
        h.flow.verify(verify_standard(&started.pidx)).await.unwrap();

        // Restart with empty order memory but durable payment records
        let restarted = PaymentFlow::new(
            h.gateway.clone(),
            h.payments.clone(),
            Arc::new(MemoryOrderStore::new()),
            FlowConfig::default(),
        );
        let err = restarted.verify(verify_standard(&started.pidx)).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(h.payments.len(), 1);
    }

    #[tokio::test]
    async fn test_shared_order_store_survives_restart() {
        let h = harness(MockGateway::new());
        let started = h.flow.initiate(&user(), None, initiate_standard()).await.unwrap();

        let restarted = PaymentFlow::new(
            h.gateway.clone(),
            h.payments.clone(),
            h.orders.clone(),
            FlowConfig::default(),
        );
        let outcome = restarted.verify(verify_standard(&started.pidx)).await.unwrap();
        assert_eq!(outcome.payment_record.maid_id, "P1");
    }

    #[tokio::test]
    async fn test_expired_order_rejected() {
        let h = harness(MockGateway::new());
        let created = Utc::now() - Duration::minutes(31);
        let order = PendingOrder::new(
            "maid_P1_old".into(),
            "old-token".into(),
            UserId::new("U"),
            "P1".into(),
            Plan::Standard,
            created,
        );
        h.orders.insert(&order).await.unwrap();
        h.orders
            .transition("old-token", FlowState::Initiated, FlowState::GatewayRedirected)
            .await
            .unwrap();

        let err = h.flow.verify(verify_standard("old-token")).await.unwrap_err();
        assert!(matches!(err, PaymentError::UnknownOrder(_)));
        assert_eq!(h.gateway.verification_calls(), 0);
        assert!(h.payments.is_empty());
    }

    #[test]
    fn test_gateway_name() {
        assert_eq!(harness(MockGateway::new()).flow.gateway_name(), "MockGateway");
    }
}
