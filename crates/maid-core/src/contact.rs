//! Contact Messages
//!
//! Messages sent through the public "contact us" form.

use std::sync::{LazyLock, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

const MESSAGE_LEN: std::ops::RangeInclusive<usize> = 10..=1000;

// Literal patterns, compiled once
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]{2,50}$").expect("name pattern compiles"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Optional `+` and `(`, a 3 digit area code, then 3 and 4-6 digit groups
/// each optionally preceded by `-`, whitespace or `.`
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$")
        .expect("phone pattern compiles")
});

/// Raw form submission, fields may be missing
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated contact message, as stored
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ContactSubmission {
    /// Validate the submission and turn it into a storable message
    pub fn validate(self, now: DateTime<Utc>) -> Result<ContactMessage> {
        let (Some(name), Some(email), Some(subject), Some(message)) = (
            non_empty(self.name),
            non_empty(self.email),
            non_empty(self.subject),
            non_empty(self.message),
        ) else {
            return Err(CoreError::Validation(
                "Name, email, subject, and message are required".into(),
            ));
        };

        if !is_valid_name(&name) {
            return Err(CoreError::Validation(
                "Name should be 2-50 characters long and contain only letters and spaces".into(),
            ));
        }

        if !is_valid_email(&email) {
            return Err(CoreError::Validation(
                "Please enter a valid email address".into(),
            ));
        }

        let phone = non_empty(self.phone);
        if let Some(ref phone) = phone {
            if !is_valid_phone(phone) {
                return Err(CoreError::Validation(
                    "Please enter a valid phone number".into(),
                ));
            }
        }

        if !MESSAGE_LEN.contains(&message.chars().count()) {
            return Err(CoreError::Validation(
                "Message should be between 10 and 1000 characters".into(),
            ));
        }

        Ok(ContactMessage {
            name,
            email,
            phone,
            subject,
            message,
            status: "new".into(),
            created_at: now,
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Contact message storage trait
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Persist a validated message
    async fn save(&self, message: &ContactMessage) -> Result<()>;
}

/// In-memory contact store (for development)
#[derive(Default)]
pub struct MemoryContactStore {
    messages: RwLock<Vec<ContactMessage>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages saved so far
    pub fn messages(&self) -> Vec<ContactMessage> {
        self.messages
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn save(&self, message: &ContactMessage) -> Result<()> {
        let mut messages = self
            .messages
            .write()
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        messages.push(message.clone());

        tracing::debug!(subject = %message.subject, "Stored contact message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: Some("Sita Sharma".into()),
            email: Some("sita@example.com".into()),
            phone: None,
            subject: Some("Hiring question".into()),
            message: Some("How do I post a job for a cook?".into()),
        }
    }

    #[test]
    fn test_valid_submission() {
        let message = submission().validate(Utc::now()).unwrap();
        assert_eq!(message.status, "new");
        assert_eq!(message.phone, None);
    }

    #[test]
    fn test_missing_fields() {
        let mut s = submission();
        s.subject = None;
        assert!(s.validate(Utc::now()).is_err());

        let mut s = submission();
        s.email = Some(String::new());
        assert!(s.validate(Utc::now()).is_err());
    }

    #[test]
    fn test_name_rules() {
        assert!(is_valid_name("Ram Bahadur"));
        assert!(!is_valid_name("R"));
        assert!(!is_valid_name("Ram2"));
        assert!(!is_valid_name(&"a".repeat(51)));
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn test_phone_rules() {
        assert!(is_valid_phone("9801234567"));
        assert!(is_valid_phone("+977-980-123456"));
        assert!(is_valid_phone("(980) 123.4567"));
        assert!(!is_valid_phone("98-123"));
        assert!(!is_valid_phone("980123456789012"));
        assert!(!is_valid_phone("abc1234567"));
    }

    #[test]
    fn test_phone_separators_and_prefixes() {
        assert!(is_valid_phone("+9801234567"));
        assert!(is_valid_phone("980 123 456789"));
        assert!(is_valid_phone("(980)1234567"));
        assert!(!is_valid_phone("980--1234567"));
        assert!(!is_valid_phone("980123456"));
        assert!(!is_valid_phone("9801234567 "));

        let mut s = submission();
        s.phone = Some("980-123-4567".into());
        assert_eq!(
            s.validate(Utc::now()).unwrap().phone.as_deref(),
            Some("980-123-4567")
        );

        let mut s = submission();
        s.phone = Some("12-34".into());
        assert_eq!(
            s.validate(Utc::now()).unwrap_err(),
            CoreError::Validation("Please enter a valid phone number".into())
        );
    }

    #[test]
    fn test_email_allows_multiple_domain_dots() {
        assert!(is_valid_email("ram.k@mail.example.com.np"));
        assert!(!is_valid_email("ram@example."));
    }

    #[test]
    fn test_message_length() {
        let mut s = submission();
        s.message = Some("too short".into());
        assert!(s.validate(Utc::now()).is_err());
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryContactStore::new();
        let message = submission().validate(Utc::now()).unwrap();
        store.save(&message).await.unwrap();
        assert_eq!(store.messages().len(), 1);
    }
}
