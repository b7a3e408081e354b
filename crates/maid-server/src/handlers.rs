//! HTTP Handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{
        HeaderMap, StatusCode,
        header::{AUTHORIZATION, ORIGIN},
    },
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use maid_core::{
    AuthenticatedUser, ContactSubmission, CoreError, MaidContact, MaidFilter, MaidProfile,
    parse_bearer,
};
use maid_payments::{
    InitiatePayment, PaymentError, PaymentFlow, UnlockStatus, VerificationOutcome, VerifyPayment,
    gateway::InitiateResponse,
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
    pub gateway: Option<String>,
    pub test_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct MaidListResponse {
    pub maids: Vec<MaidProfile>,
    pub total: usize,
}

/// One profile; `contact` is present only while the caller has it unlocked
#[derive(Debug, Serialize)]
pub struct MaidResponse {
    #[serde(flatten)]
    pub profile: MaidProfile,
    pub contact: Option<MaidContact>,
    pub unlock: UnlockStatus,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Helpers
// ============================================================================

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser, CoreError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let token = parse_bearer(header)?;
    state.identity.authenticate(token).await
}

fn payments(state: &AppState) -> Result<&Arc<PaymentFlow>, PaymentError> {
    state.payments.as_ref().ok_or(PaymentError::Disabled)
}

fn contact_error(status: StatusCode, err: &CoreError, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
        }),
    )
}

/// Error body with the status and code a [`PaymentError`] maps to
fn reject(err: impl Into<PaymentError>) -> ApiError {
    let err = err.into();
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: err.error_code().into(),
        }),
    )
}

/// The caller, if an `Authorization` header was sent; a bad one is an error
async fn viewer(state: &AppState, headers: &HeaderMap) -> Result<Option<AuthenticatedUser>, CoreError> {
    if headers.contains_key(AUTHORIZATION) {
        authenticate(state, headers).await.map(Some)
    } else {
        Ok(None)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.payments.is_some(),
        gateway: state.payments.as_ref().map(|flow| flow.gateway_name().to_string()),
        test_mode: state.config.test_mode(),
    })
}

/// Exchange email and password for a session
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| reject(CoreError::Validation(e.body_text())))?;

    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.trim().is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(reject(CoreError::Validation(
            "Email and password are required".into(),
        )));
    };

    let session = state
        .identity
        .sign_in(email.trim(), &password)
        .await
        .map_err(reject)?;

    Ok(Json(LoginResponse {
        user_id: session.user.id.to_string(),
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        expires_in: session.expires_in,
    }))
}

/// Browse public maid profiles, newest first
pub async fn list_maids(
    State(state): State<AppState>,
    filter: Result<Query<MaidFilter>, QueryRejection>,
) -> Result<Json<MaidListResponse>, ApiError> {
    let Query(filter) = filter.map_err(|e| reject(CoreError::Validation(e.body_text())))?;

    let records = state.maids.list().await.map_err(|e| {
        tracing::error!(directory = state.maids.name(), error = %e, "Maid listing failed");
        reject(e)
    })?;

    let maids = filter.apply(records.into_iter().map(|r| r.profile).collect());
    tracing::debug!(matched = maids.len(), "Maids listed");

    Ok(Json(MaidListResponse {
        total: maids.len(),
        maids,
    }))
}

/// One maid profile, with contact details for callers holding an unlock
pub async fn get_maid(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MaidResponse>, ApiError> {
    let viewer = viewer(&state, &headers).await.map_err(reject)?;

    let record = state.maids.get(&id).await.map_err(reject)?.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Maid not found".into(),
                code: "MAID_NOT_FOUND".into(),
            }),
        )
    })?;

    let unlock = match (viewer, state.payments.as_ref()) {
        (Some(user), Some(flow)) => flow.unlock_status(&user.id, &id).await.map_err(reject)?,
        _ => UnlockStatus::locked(id.as_str()),
    };
    let contact = unlock.unlocked.then_some(record.contact);

    Ok(Json(MaidResponse {
        profile: record.profile,
        contact,
        unlock,
    }))
}

/// Start a contact-unlock payment for the signed-in user
pub async fn initiate_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<InitiatePayment>, JsonRejection>,
) -> Result<Json<InitiateResponse>, PaymentError> {
    let user = authenticate(&state, &headers).await?;
    let flow = payments(&state)?;
    let Json(request) = payload.map_err(|e| PaymentError::invalid(e.body_text()))?;

    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    let response = flow.initiate(&user, origin, request).await?;

    Ok(Json(response))
}

/// Confirm a payment after the gateway redirects back
pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPayment>, JsonRejection>,
) -> Result<Json<VerificationOutcome>, PaymentError> {
    let flow = payments(&state)?;
    let Json(request) = payload.map_err(|e| PaymentError::invalid(e.body_text()))?;

    let outcome = flow.verify(request).await?;
    Ok(Json(outcome))
}

/// Whether the signed-in user has unlocked a maid's contact details
pub async fn unlock_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(maid_id): Path<String>,
) -> Result<Json<UnlockStatus>, PaymentError> {
    let user = authenticate(&state, &headers).await?;
    let flow = payments(&state)?;

    let status = flow.unlock_status(&user.id, &maid_id).await?;
    Ok(Json(status))
}

/// Store a contact-form message
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<ContactResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(submission) = payload.map_err(|e| {
        contact_error(
            StatusCode::BAD_REQUEST,
            &CoreError::Validation(e.body_text()),
            "INVALID_REQUEST",
        )
    })?;

    let message = submission
        .validate(Utc::now())
        .map_err(|e| contact_error(StatusCode::BAD_REQUEST, &e, "INVALID_REQUEST"))?;

    state.contacts.save(&message).await.map_err(|e| {
        tracing::error!("Contact message could not be saved: {}", e);
        contact_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            &CoreError::Storage("Failed to send message".into()),
            "STORAGE_ERROR",
        )
    })?;

    tracing::info!(subject = %message.subject, "Contact message received");

    Ok(Json(ContactResponse {
        success: true,
        message: "Your message has been sent successfully",
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use maid_core::{
        AuthenticatedUser, MaidContact, MaidProfile, MaidRecord, MemoryContactStore,
        MemoryMaidDirectory, StaticIdentityProvider,
    };
    use maid_payments::{
        MemoryOrderStore, MemoryPaymentStore, MockGateway, PaymentFlow, PaymentGateway,
    };

    use crate::{config::ServerConfig, routes::router, state::AppState};

    const TOKEN: &str = "session-token";
    const USER_ID: &str = "user-1";

    struct Harness {
        app: Router,
        gateway: Arc<MockGateway>,
        contacts: Arc<MemoryContactStore>,
    }

    fn harness(gateway: MockGateway) -> Harness {
        let config = ServerConfig::default();
        let gateway = Arc::new(gateway);
        let contacts = Arc::new(MemoryContactStore::new());

        let identity = StaticIdentityProvider::new()
            .with_user(
                TOKEN,
                AuthenticatedUser::new(USER_ID).with_email("employer@example.com"),
            )
            .with_credentials("employer@example.com", "correct horse", TOKEN);
        identity.insert("stale-token", AuthenticatedUser::new("user-2"));
        identity.expire("stale-token");

        let flow = PaymentFlow::new(
            gateway.clone() as Arc<dyn PaymentGateway>,
            Arc::new(MemoryPaymentStore::new()),
            Arc::new(MemoryOrderStore::new()),
            config.flow_config(),
        );

        let state = AppState {
            identity: Arc::new(identity),
            payments: Some(Arc::new(flow)),
            contacts: contacts.clone(),
            maids: Arc::new(directory()),
            config: Arc::new(config),
        };

        Harness {
            app: router(state),
            gateway,
            contacts,
        }
    }

    fn maid(id: &str, name: &str, gender: &str, skills: &[&str]) -> MaidRecord {
        MaidRecord {
            profile: MaidProfile {
                id: id.into(),
                full_name: name.into(),
                gender: Some(gender.into()),
                preferred_location: Some("Kathmandu".into()),
                skills: Some(skills.iter().map(|s| (*s).to_string()).collect()),
                ..MaidProfile::default()
            },
            contact: MaidContact {
                email: Some(format!("{id}@example.com")),
                phone: Some("9801234567".into()),
            },
        }
    }

    fn directory() -> MemoryMaidDirectory {
        MemoryMaidDirectory::new()
            .with_maid(maid("P1", "Sita Tamang", "Female", &["Cooking", "Childcare"]))
            .with_maid(maid("P2", "Ram Thapa", "Male", &["Cleaning"]))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
        let mut builder = Request::post(uri)
            .header("content-type", "application/json")
            .header("origin", "https://maids.example.com");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn standard_initiate() -> Value {
        json!({ "amount": 1000, "maidId": "P1", "isTestMode": true, "plan": "standard" })
    }

    fn standard_verify(token: &str) -> Value {
        json!({
            "token": token,
            "amount": 1000,
            "maidId": "P1",
            "plan": "standard",
            "maids": 3,
            "days": 14,
            "userId": USER_ID,
            "isTestMode": true
        })
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(MockGateway::new());
        let (status, body) = send(&h.app, get("/health", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["payments_configured"], true);
        assert_eq!(body["gateway"], "MockGateway");
        assert_eq!(body["test_mode"], true);
    }

    #[tokio::test]
    async fn test_initiate_requires_bearer() {
        let h = harness(MockGateway::new());

        let (status, body) = send(&h.app, post("/api/payment/initiate", None, &standard_initiate())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized - No token provided");

        let (status, body) = send(
            &h.app,
            post("/api/payment/initiate", Some("unknown"), &standard_initiate()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");
        assert!(h.gateway.initiated().is_empty());
    }

    #[tokio::test]
    async fn test_expired_session() {
        let h = harness(MockGateway::new());
        let (status, body) = send(
            &h.app,
            post("/api/payment/initiate", Some("stale-token"), &standard_initiate()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Your session has expired. Please log in again.");
    }

    #[tokio::test]
    async fn test_initiate_test_mode_mismatch() {
        let h = harness(MockGateway::new());
        let mut request = standard_initiate();
        request["isTestMode"] = json!(false);

        let (status, body) = send(&h.app, post("/api/payment/initiate", Some(TOKEN), &request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "TEST_MODE_MISMATCH");
        assert!(h.gateway.initiated().is_empty());
    }

    #[tokio::test]
    async fn test_initiate_rejects_wrong_amount() {
        let h = harness(MockGateway::new());
        let mut request = standard_initiate();
        request["amount"] = json!(1);

        let (status, _) = send(&h.app, post("/api/payment/initiate", Some(TOKEN), &request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(h.gateway.initiated().is_empty());
    }

    #[tokio::test]
    async fn test_full_payment_flow() {
        let h = harness(MockGateway::new());

        let (status, body) = send(
            &h.app,
            post("/api/payment/initiate", Some(TOKEN), &standard_initiate()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let payment_url = body["payment_url"].as_str().unwrap();
        assert!(payment_url.contains("100000"));
        let pidx = body["pidx"].as_str().unwrap().to_string();

        let sent = &h.gateway.initiated()[0];
        assert_eq!(sent.amount, 100_000);
        assert!(sent.return_url.starts_with("https://maids.example.com/payment/success?"));
        assert!(sent.purchase_order_id.starts_with("maid_P1_"));

        // Locked until the gateway confirms
        let (_, body) = send(&h.app, get("/api/unlock/P1", Some(TOKEN))).await;
        assert_eq!(body["unlocked"], false);

        let (status, body) = send(&h.app, post("/api/payment/verify", None, &standard_verify(&pidx))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Completed");
        assert_eq!(body["payment_record"]["num_maids"], 3);
        assert_eq!(body["payment_record"]["days_valid"], 14);
        assert_eq!(body["payment_record"]["plan_type"], "standard");

        let (status, body) = send(&h.app, get("/api/unlock/P1", Some(TOKEN))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["unlocked"], true);
        assert_eq!(body["plan"], "standard");

        // Other maids stay locked
        let (_, body) = send(&h.app, get("/api/unlock/P2", Some(TOKEN))).await;
        assert_eq!(body["unlocked"], false);
    }

    #[tokio::test]
    async fn test_verify_replay_is_conflict() {
        let h = harness(MockGateway::new());
        let (_, body) = send(
            &h.app,
            post("/api/payment/initiate", Some(TOKEN), &standard_initiate()),
        )
        .await;
        let pidx = body["pidx"].as_str().unwrap().to_string();

        let (status, _) = send(&h.app, post("/api/payment/verify", None, &standard_verify(&pidx))).await;
        assert_eq!(status, StatusCode::OK);

        let calls = h.gateway.verification_calls();
        let (status, body) = send(&h.app, post("/api/payment/verify", None, &standard_verify(&pidx))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ALREADY_RECORDED");
        assert_eq!(h.gateway.verification_calls(), calls);
    }

    #[tokio::test]
    async fn test_verify_missing_field() {
        let h = harness(MockGateway::new());
        let mut request = standard_verify("mock-pidx-1");
        request.as_object_mut().unwrap().remove("userId");

        let (status, body) = send(&h.app, post("/api/payment/verify", None, &request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_FIELDS");
        assert_eq!(h.gateway.verification_calls(), 0);
    }

    #[tokio::test]
    async fn test_verify_pending_payment_not_recorded() {
        let h = harness(MockGateway::new().with_lookup_status("Pending"));
        let (_, body) = send(
            &h.app,
            post("/api/payment/initiate", Some(TOKEN), &standard_initiate()),
        )
        .await;
        let pidx = body["pidx"].as_str().unwrap().to_string();

        let (status, body) = send(&h.app, post("/api/payment/verify", None, &standard_verify(&pidx))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "PAYMENT_NOT_COMPLETED");

        let (_, body) = send(&h.app, get("/api/unlock/P1", Some(TOKEN))).await;
        assert_eq!(body["unlocked"], false);
    }

    #[tokio::test]
    async fn test_gateway_error_passes_through() {
        let h = harness(MockGateway::new().failing_initiate(401, "Invalid token."));
        let (status, body) = send(
            &h.app,
            post("/api/payment/initiate", Some(TOKEN), &standard_initiate()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token.");
        assert_eq!(body["code"], "GATEWAY_ERROR");
    }

    #[tokio::test]
    async fn test_payments_disabled() {
        let state = AppState {
            identity: Arc::new(
                StaticIdentityProvider::new().with_user(TOKEN, AuthenticatedUser::new(USER_ID)),
            ),
            payments: None,
            contacts: Arc::new(MemoryContactStore::new()),
            maids: Arc::new(directory()),
            config: Arc::new(ServerConfig::default()),
        };
        let app = router(state);

        let (status, body) = send(&app, post("/api/payment/initiate", Some(TOKEN), &standard_initiate())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "PAYMENTS_DISABLED");
    }

    #[tokio::test]
    async fn test_contact_form() {
        let h = harness(MockGateway::new());
        let message = json!({
            "name": "Sita Sharma",
            "email": "sita@example.com",
            "phone": "9812345678",
            "subject": "Hiring question",
            "message": "Do your plans cover part-time maids as well?"
        });

        let (status, body) = send(&h.app, post("/api/contact", None, &message)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Your message has been sent successfully");

        let stored = h.contacts.messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, "new");
    }

    #[tokio::test]
    async fn test_contact_form_validation() {
        let h = harness(MockGateway::new());
        let message = json!({ "name": "Sita", "email": "sita@example.com" });

        let (status, body) = send(&h.app, post("/api/contact", None, &message)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name, email, subject, and message are required");
        assert!(h.contacts.messages().is_empty());
    }

    #[tokio::test]
    async fn test_login() {
        let h = harness(MockGateway::new());
        let credentials = json!({ "email": "employer@example.com", "password": "correct horse" });

        let (status, body) = send(&h.app, post("/api/auth/login", None, &credentials)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["access_token"], TOKEN);
        assert_eq!(body["user_id"], USER_ID);

        let wrong = json!({ "email": "employer@example.com", "password": "nope" });
        let (status, body) = send(&h.app, post("/api/auth/login", None, &wrong)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized - Invalid login credentials");

        let (status, body) = send(&h.app, post("/api/auth/login", None, &json!({ "email": "a@b.np" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email and password are required");
    }

    #[tokio::test]
    async fn test_list_maids_filters_and_hides_contact() {
        let h = harness(MockGateway::new());

        let (status, body) = send(&h.app, get("/api/maids", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert!(body["maids"][0].get("phone").is_none());
        assert!(body["maids"][0].get("email").is_none());

        let (_, body) = send(&h.app, get("/api/maids?gender=Female&skills=Cooking,Laundry", None)).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["maids"][0]["id"], "P1");

        let (_, body) = send(&h.app, get("/api/maids?search=thapa", None)).await;
        assert_eq!(body["maids"][0]["id"], "P2");
    }

    #[tokio::test]
    async fn test_maid_contact_gated_by_unlock() {
        let h = harness(MockGateway::new());

        // Anonymous and signed-in-but-unpaid callers get the profile only
        let (status, body) = send(&h.app, get("/api/maids/P1", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["full_name"], "Sita Tamang");
        assert_eq!(body["contact"], Value::Null);
        assert_eq!(body["unlock"]["unlocked"], false);

        let (_, body) = send(&h.app, get("/api/maids/P1", Some(TOKEN))).await;
        assert_eq!(body["contact"], Value::Null);

        let (_, started) = send(
            &h.app,
            post("/api/payment/initiate", Some(TOKEN), &standard_initiate()),
        )
        .await;
        let pidx = started["pidx"].as_str().unwrap().to_string();
        let (status, _) = send(&h.app, post("/api/payment/verify", None, &standard_verify(&pidx))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&h.app, get("/api/maids/P1", Some(TOKEN))).await;
        assert_eq!(body["unlock"]["unlocked"], true);
        assert_eq!(body["contact"]["phone"], "9801234567");
        assert_eq!(body["contact"]["email"], "P1@example.com");

        // The unlock covers P1 only
        let (_, body) = send(&h.app, get("/api/maids/P2", Some(TOKEN))).await;
        assert_eq!(body["contact"], Value::Null);

        // Without a credential the unlocked profile is still gated
        let (_, body) = send(&h.app, get("/api/maids/P1", None)).await;
        assert_eq!(body["contact"], Value::Null);
    }

    #[tokio::test]
    async fn test_maid_lookup_errors() {
        let h = harness(MockGateway::new());

        let (status, body) = send(&h.app, get("/api/maids/P9", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "MAID_NOT_FOUND");

        let (status, body) = send(&h.app, get("/api/maids/P1", Some("forged"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");
    }
}
