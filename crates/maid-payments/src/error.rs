//! Payment Error Types

use maid_core::CoreError;
use thiserror::Error;

use crate::order::FlowState;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Authentication and validation failures from the core crate
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Required request fields absent
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Caller's test/live flag disagrees with the server
    #[error("Test mode configuration mismatch (client: {client:?}, server: {server})")]
    TestModeMismatch { client: Option<bool>, server: bool },

    /// Gateway answered with a non-success status
    #[error("Gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },

    /// Gateway answered 2xx with an unusable body
    #[error("Invalid payment response from gateway: {0}")]
    GatewayPayload(String),

    /// Gateway could not be reached
    #[error("Gateway unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// Lookup status was anything but `Completed`
    #[error("Payment is not completed (status: {status})")]
    NotCompleted { status: String },

    /// Gateway settled a different amount than the plan price
    #[error("Payment amount mismatch: expected {expected} paisa, received {received}")]
    AmountMismatch { expected: i64, received: i64 },

    /// No pending order for this token
    #[error("Unknown payment token: {0}")]
    UnknownOrder(String),

    /// A record already exists for this payment
    #[error("Payment already recorded: {0}")]
    AlreadyRecorded(String),

    /// Another request is verifying this token
    #[error("Payment verification already in progress: {0}")]
    InProgress(String),

    /// The attempt already failed; the flow has to restart
    #[error("Payment attempt failed: {0}")]
    AttemptFailed(String),

    /// Order state machine violation
    #[error("Invalid order transition from {from} to {to}")]
    InvalidTransition { from: FlowState, to: FlowState },

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No gateway configured
    #[error("Payments not configured")]
    Disabled,
}

impl PaymentError {
    /// Shorthand for a validation failure
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }

    /// HTTP status the server should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Core(core) => match core {
                CoreError::Unauthenticated(_) | CoreError::SessionExpired => 401,
                CoreError::Validation(_) => 400,
                CoreError::Storage(_) => 500,
                CoreError::Provider(_) => 502,
                CoreError::Config(_) => 503,
            },
            Self::MissingFields(_)
            | Self::TestModeMismatch { .. }
            | Self::NotCompleted { .. }
            | Self::AmountMismatch { .. }
            | Self::AttemptFailed(_)
            | Self::UnknownOrder(_) => 400,
            Self::Gateway { status, .. } => *status,
            Self::GatewayPayload(_) | Self::Network(_) => 502,
            Self::AlreadyRecorded(_) | Self::InProgress(_) | Self::InvalidTransition { .. } => 409,
            Self::Storage(_) => 500,
            Self::Config(_) | Self::Disabled => 503,
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Core(CoreError::Unauthenticated(_)) => "UNAUTHENTICATED",
            Self::Core(CoreError::SessionExpired) => "SESSION_EXPIRED",
            Self::Core(CoreError::Validation(_)) => "INVALID_REQUEST",
            Self::Core(CoreError::Storage(_)) | Self::Storage(_) => "STORAGE_ERROR",
            Self::Core(CoreError::Provider(_)) => "PROVIDER_ERROR",
            Self::Core(CoreError::Config(_)) | Self::Config(_) => "CONFIG_ERROR",
            Self::MissingFields(_) => "MISSING_FIELDS",
            Self::TestModeMismatch { .. } => "TEST_MODE_MISMATCH",
            Self::Gateway { .. } => "GATEWAY_ERROR",
            Self::GatewayPayload(_) => "GATEWAY_PAYLOAD",
            Self::Network(_) => "GATEWAY_UNREACHABLE",
            Self::NotCompleted { .. } => "PAYMENT_NOT_COMPLETED",
            Self::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            Self::UnknownOrder(_) => "UNKNOWN_ORDER",
            Self::AlreadyRecorded(_) => "ALREADY_RECORDED",
            Self::InProgress(_) => "VERIFICATION_IN_PROGRESS",
            Self::AttemptFailed(_) => "ATTEMPT_FAILED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Disabled => "PAYMENTS_DISABLED",
        }
    }

    /// Get user-facing message
    ///
    /// Gateway rejections are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Core(core) => core.user_message(),
            Self::MissingFields(_) => "Missing required fields".into(),
            Self::TestModeMismatch { .. } => "Test mode configuration mismatch".into(),
            Self::Gateway { message, .. } => message.clone(),
            Self::GatewayPayload(_) => "Invalid payment response from Khalti".into(),
            Self::Network(_) => "Payment service is unreachable. Please try again.".into(),
            Self::NotCompleted { .. } => "Payment is not completed".into(),
            Self::AmountMismatch { .. } => "Payment amount mismatch".into(),
            Self::UnknownOrder(_) => "Unknown or expired payment. Please choose a plan again.".into(),
            Self::AlreadyRecorded(_) => "Payment already recorded".into(),
            Self::InProgress(_) => "Payment verification is already in progress".into(),
            Self::AttemptFailed(_) => "This payment attempt failed. Please choose a plan again.".into(),
            Self::InvalidTransition { .. } => "Payment is in an unexpected state".into(),
            Self::Storage(_) => "Failed to store payment information".into(),
            Self::Config(_) => "Service configuration error.".into(),
            Self::Disabled => "Payments not configured".into(),
        }
    }
}

#[cfg(feature = "axum-handlers")]
mod http {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };

    use super::PaymentError;

    impl IntoResponse for PaymentError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
            let body = serde_json::json!({
                "error": self.user_message(),
                "code": self.error_code(),
            });
            (status, Json(body)).into_response()
        }
    }
}
