//! crates/portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portal.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::ports::PortError;

/// Status flag of an active user or a visible content document.
pub const STATUS_ACTIVE: i32 = 0;
/// Status flag of a suspended user or a hidden content document.
pub const STATUS_SUSPENDED: i32 = 1;

//=========================================================================================
// Validated Values
//=========================================================================================

/// An opaque document identifier in its transport-safe form: 24 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub const LEN: usize = 24;

    /// Parses an identifier received from a client or read from the store.
    pub fn parse(raw: &str) -> Result<Self, PortError> {
        let raw = raw.trim();
        if raw.len() != Self::LEN || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PortError::InvalidId(format!(
                "'{}' is not a valid identifier (expected {} hex digits)",
                raw,
                Self::LEN
            )));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

/// An email address validated at the request boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, PortError> {
        let raw = raw.trim();
        if raw.len() > 254 || !EMAIL_PATTERN.is_match(raw) {
            return Err(PortError::Validation(format!(
                "'{}' is not a valid email address",
                raw
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//=========================================================================================
// Administrative Records
//=========================================================================================

/// A back-office user. The password hash never leaves the adapter.
#[derive(Debug, Clone)]
pub struct User {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: i32,
    pub status: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Only used when inserting - contains the hashed password
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: i32,
    pub status: i32,
}

/// Full replacement of a user's editable fields. `password_hash` is only
/// replaced when present.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub role: i32,
    pub status: i32,
    pub password_hash: Option<String>,
}

/// Counts reported by the store after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// A newsletter subscriber.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: RecordId,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Failed,
}

impl SendOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            SendOutcome::Sent => "sent",
            SendOutcome::Failed => "failed",
        }
    }

    /// Records written before outcomes were tracked carry no value; they were sent.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some("failed") => SendOutcome::Failed,
            _ => SendOutcome::Sent,
        }
    }
}

/// The persisted record of one bulk email attempt.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub id: RecordId,
    pub recipients: Vec<String>,
    pub sender: String,
    pub title: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub outcome: SendOutcome,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSentEmail {
    pub recipients: Vec<String>,
    pub sender: String,
    pub title: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub outcome: SendOutcome,
    pub error: Option<String>,
}

/// A single HTML message addressed to many recipients.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub recipients: Vec<EmailAddress>,
    pub subject: String,
    pub html_body: String,
}

//=========================================================================================
// Public Content
//=========================================================================================

#[derive(Debug, Clone)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub status: i32,
}

#[derive(Debug, Clone)]
pub struct Post {
    pub id: RecordId,
    pub title: String,
    pub slug: String,
    pub category_id: Option<RecordId>,
    pub summary: String,
    pub content: String,
    pub image: Option<String>,
    pub status: i32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Curiosity {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub status: i32,
}

#[derive(Debug, Clone)]
pub struct Image {
    pub id: RecordId,
    pub title: String,
    pub url: String,
    pub alt: Option<String>,
    pub status: i32,
}

/// A date worth highlighting on the public site.
#[derive(Debug, Clone)]
pub struct DateOfNote {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub status: i32,
}

/// A display device; `text` and `state` are already joined into single strings.
#[derive(Debug, Clone)]
pub struct Device {
    pub id: RecordId,
    pub key: String,
    pub text: String,
    pub state: String,
}
