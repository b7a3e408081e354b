//! Error Types

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Credential missing, malformed or rejected
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Credential was valid once but has expired
    #[error("Session expired")]
    SessionExpired,

    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backing store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Identity or data provider unreachable or misbehaving
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated(msg) => format!("Unauthorized - {msg}"),
            Self::SessionExpired => "Your session has expired. Please log in again.".into(),
            Self::Validation(msg) => msg.clone(),
            Self::Storage(_) => "Failed to save your request. Please try again later.".into(),
            Self::Provider(_) => "An upstream service is unavailable. Please try again.".into(),
            Self::Config(_) => "Service configuration error.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            CoreError::Unauthenticated("Invalid token".into()).user_message(),
            "Unauthorized - Invalid token"
        );
        assert_eq!(
            CoreError::Validation("Invalid plan selected".into()).user_message(),
            "Invalid plan selected"
        );
    }
}
