//! Khalti ePayment Client
//!
//! Hosted checkout: initiate returns a `payment_url`, the user pays on
//! Khalti's page, and Khalti redirects back with the payment token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{InitiateRequest, InitiateResponse, LookupResponse, PaymentGateway};
use crate::error::{PaymentError, Result};

const TEST_BASE_URL: &str = "https://a.khalti.com/api/v2";
const LIVE_BASE_URL: &str = "https://khalti.com/api/v2";

/// Khalti client configuration
#[derive(Clone, Debug)]
pub struct KhaltiConfig {
    /// API base, e.g. `https://a.khalti.com/api/v2`
    pub base_url: String,

    /// Merchant secret key
    pub secret_key: String,

    /// Sandbox or live merchant
    pub test_mode: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl KhaltiConfig {
    pub fn new(secret_key: impl Into<String>, test_mode: bool) -> Self {
        Self {
            base_url: default_base_url(test_mode).into(),
            secret_key: secret_key.into(),
            test_mode,
            timeout_secs: 30,
        }
    }

    /// Create from environment variables
    ///
    /// `KHALTI_SECRET_KEY` is required; `KHALTI_API_URL` overrides the
    /// sandbox/live default.
    pub fn from_env(test_mode: bool) -> Result<Self> {
        let secret_key = std::env::var("KHALTI_SECRET_KEY")
            .map_err(|_| PaymentError::Config("KHALTI_SECRET_KEY not set".into()))?;

        let mut config = Self::new(secret_key, test_mode);
        if let Ok(base_url) = std::env::var("KHALTI_API_URL") {
            config.base_url = base_url;
        }
        if let Some(timeout) = std::env::var("KHALTI_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.timeout_secs = timeout;
        }

        Ok(config)
    }
}

const fn default_base_url(test_mode: bool) -> &'static str {
    if test_mode { TEST_BASE_URL } else { LIVE_BASE_URL }
}

/// Khalti ePayment v2 client
pub struct KhaltiClient {
    client: Client,
    config: KhaltiConfig,
}

#[derive(Serialize)]
struct VerifyBody<'a> {
    token: &'a str,
    amount: i64,
}

#[derive(Serialize)]
struct LookupBody<'a> {
    token: &'a str,
}

impl KhaltiClient {
    pub fn new(config: KhaltiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PaymentError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env(test_mode: bool) -> Result<Self> {
        Self::new(KhaltiConfig::from_env(test_mode)?)
    }

    pub const fn is_test_mode(&self) -> bool {
        self.config.test_mode
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/epayment/{path}/", self.config.base_url.trim_end_matches('/'))
    }

    /// POST a JSON body and return the JSON answer of a 2xx response
    ///
    /// Non-2xx answers become [`PaymentError::Gateway`] with Khalti's
    /// `detail` message, or `fallback` when there is none.
    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("Authorization", format!("Key {}", self.config.secret_key))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let data: Option<serde_json::Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = data
                .as_ref()
                .and_then(|d| d.get("detail"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or(fallback)
                .to_string();

            tracing::error!(
                path,
                status = status.as_u16(),
                body = %text,
                "Khalti API error"
            );
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        data.ok_or_else(|| PaymentError::GatewayPayload(format!("{path}: body is not JSON")))
    }
}

#[async_trait]
impl PaymentGateway for KhaltiClient {
    async fn initiate(&self, request: &InitiateRequest) -> Result<InitiateResponse> {
        let data = self
            .post("initiate", request, "Payment initiation failed")
            .await?;

        let response: InitiateResponse = serde_json::from_value(data)
            .map_err(|e| PaymentError::GatewayPayload(e.to_string()))?;
        if response.payment_url.is_empty() {
            return Err(PaymentError::GatewayPayload("empty payment_url".into()));
        }

        Ok(response)
    }

    async fn verify(&self, token: &str, amount: i64) -> Result<serde_json::Value> {
        self.post(
            "verify",
            &VerifyBody { token, amount },
            "Payment verification failed",
        )
        .await
    }

    async fn lookup(&self, token: &str) -> Result<LookupResponse> {
        let data = self
            .post("lookup", &LookupBody { token }, "Payment lookup failed")
            .await?;

        serde_json::from_value(data).map_err(|e| PaymentError::GatewayPayload(e.to_string()))
    }

    fn name(&self) -> &str {
        "Khalti"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let test = KhaltiConfig::new("test_secret", true);
        assert_eq!(test.base_url, "https://a.khalti.com/api/v2");
        assert_eq!(test.timeout_secs, 30);

        let live = KhaltiConfig::new("live_secret", false);
        assert_eq!(live.base_url, "https://khalti.com/api/v2");
    }

    #[test]
    fn test_endpoints() {
        let mut config = KhaltiConfig::new("k", true);
        config.base_url = "http://localhost:9000/api/v2/".into();
        let client = KhaltiClient::new(config).unwrap();

        assert_eq!(
            client.endpoint("lookup"),
            "http://localhost:9000/api/v2/epayment/lookup/"
        );
        assert!(client.is_test_mode());
    }

    #[test]
    fn test_verify_body_shape() {
        let body = serde_json::to_value(VerifyBody {
            token: "tok",
            amount: 100_000,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "token": "tok", "amount": 100_000 }));
    }
}
