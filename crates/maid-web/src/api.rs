//! API Client

use maid_core::{MaidContact, MaidProfile, Plan};
use serde::{Deserialize, de::DeserializeOwned};

use crate::session::{self, Session};

/// Failed API call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    fn network(err: &reqwest::Error) -> Self {
        Self {
            status: 0,
            message: err.to_string(),
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Redirect target returned by payment initiation
#[derive(Clone, Debug, Deserialize)]
pub struct PaymentRedirect {
    pub payment_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RecordedPayment {
    pub plan_type: Plan,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VerifiedPayment {
    pub status: String,
    pub payment_record: RecordedPayment,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UnlockStatus {
    pub unlocked: bool,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Session handed back by the login endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResult {
    pub access_token: String,
    pub user_id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MaidList {
    pub maids: Vec<MaidProfile>,
}

/// A profile as the server shows it to this caller
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MaidView {
    #[serde(flatten)]
    pub profile: MaidProfile,
    #[serde(default)]
    pub contact: Option<MaidContact>,
}

fn url(path: &str) -> String {
    format!("{}{path}", session::origin())
}

async fn parse<T: DeserializeOwned>(response: reqwest::Response, fallback: &str) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(|e| ApiError::network(&e));
    }

    let data: serde_json::Value = response.json().await.unwrap_or_default();
    Err(ApiError {
        status: status.as_u16(),
        message: data["error"].as_str().unwrap_or(fallback).to_string(),
    })
}

/// Whole rupees the server expects for a plan
fn plan_amount(plan: Plan) -> i64 {
    plan.price_minor() / 100
}

/// Start a Khalti payment for a maid's contact details
pub async fn initiate_payment(session: &Session, maid_id: &str, plan: Plan) -> Result<PaymentRedirect, ApiError> {
    let body = serde_json::json!({
        "amount": plan_amount(plan),
        "maidId": maid_id,
        "plan": plan,
        "isTestMode": is_test_mode(),
    });

    let response = reqwest::Client::new()
        .post(url("/api/payment/initiate"))
        .bearer_auth(&session.access_token)
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::network(&e))?;

    parse(response, "Payment initiation failed").await
}

/// Confirm a payment after Khalti redirects back
pub async fn verify_payment(
    token: &str,
    maid_id: &str,
    plan: Plan,
    user_id: &str,
) -> Result<VerifiedPayment, ApiError> {
    let terms = plan.terms();
    let body = serde_json::json!({
        "token": token,
        "amount": plan_amount(plan),
        "maidId": maid_id,
        "plan": plan,
        "maids": terms.contact_quota,
        "days": terms.validity_days,
        "userId": user_id,
        "isTestMode": is_test_mode(),
    });

    let response = reqwest::Client::new()
        .post(url("/api/payment/verify"))
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::network(&e))?;

    parse(response, "Payment verification failed").await
}

/// Sign in with email and password
pub async fn login(email: &str, password: &str) -> Result<LoginResult, ApiError> {
    let response = reqwest::Client::new()
        .post(url("/api/auth/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .map_err(|e| ApiError::network(&e))?;

    parse(response, "Login failed").await
}

/// Browse maids; `filters` are query pairs such as `("gender", "Female")`
pub async fn list_maids(filters: &[(&'static str, String)]) -> Result<MaidList, ApiError> {
    let response = reqwest::Client::new()
        .get(url("/api/maids"))
        .query(filters)
        .send()
        .await
        .map_err(|e| ApiError::network(&e))?;

    parse(response, "Could not load maids").await
}

/// One maid profile; contact fields come back only when unlocked
pub async fn get_maid(session: Option<&Session>, maid_id: &str) -> Result<MaidView, ApiError> {
    let mut request = reqwest::Client::new().get(url(&format!("/api/maids/{maid_id}")));
    if let Some(session) = session {
        request = request.bearer_auth(&session.access_token);
    }

    let response = request.send().await.map_err(|e| ApiError::network(&e))?;
    parse(response, "Could not load this profile").await
}

/// Ask the server whether this user has unlocked a maid
pub async fn unlock_status(session: &Session, maid_id: &str) -> Result<UnlockStatus, ApiError> {
    let response = reqwest::Client::new()
        .get(url(&format!("/api/unlock/{maid_id}")))
        .bearer_auth(&session.access_token)
        .send()
        .await
        .map_err(|e| ApiError::network(&e))?;

    parse(response, "Could not check unlock status").await
}

/// Gateway mode this build was made for; must agree with the server's `APP_ENV`
fn is_test_mode() -> bool {
    option_env!("APP_ENV").is_none_or(|env| env != "production")
}
