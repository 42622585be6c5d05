//! crates/portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the portal's core logic.
//! These traits form the boundary between the HTTP handlers and the concrete
//! document store and mail transport implementations.

use async_trait::async_trait;

use crate::domain::{
    Category, Curiosity, DateOfNote, Device, EmailAddress, Image, NewSentEmail, NewUser,
    OutboundEmail, Post, RecordId, SentEmail, Subscriber, UpdateOutcome, User, UserUpdate,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (database, SMTP).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn list_users_by_status(&self, status: i32) -> PortResult<Vec<User>>;

    async fn get_user(&self, id: &RecordId) -> PortResult<User>;

    async fn find_users_by_email(&self, email: &EmailAddress) -> PortResult<Vec<User>>;

    async fn create_user(&self, user: NewUser) -> PortResult<RecordId>;

    async fn update_user(&self, id: &RecordId, update: UserUpdate) -> PortResult<UpdateOutcome>;

    async fn delete_user(&self, id: &RecordId) -> PortResult<()>;

    // --- Subscribers ---
    async fn list_subscribers(&self) -> PortResult<Vec<Subscriber>>;

    async fn get_subscriber(&self, id: &RecordId) -> PortResult<Subscriber>;

    async fn create_subscriber(&self, email: &EmailAddress) -> PortResult<RecordId>;

    async fn delete_subscriber(&self, id: &RecordId) -> PortResult<()>;

    // --- Sent Email History ---
    async fn list_sent_emails(&self) -> PortResult<Vec<SentEmail>>;

    async fn get_sent_email(&self, id: &RecordId) -> PortResult<SentEmail>;

    async fn save_sent_email(&self, record: NewSentEmail) -> PortResult<RecordId>;

    // --- Public Content ---
    async fn list_categories(&self, status: i32) -> PortResult<Vec<Category>>;

    async fn get_category(&self, id: &RecordId) -> PortResult<Category>;

    /// Posts with the given status, newest first. Restricted to one category when given.
    async fn list_posts(
        &self,
        status: i32,
        category_id: Option<&RecordId>,
    ) -> PortResult<Vec<Post>>;

    async fn get_post(&self, id: &RecordId) -> PortResult<Post>;

    async fn get_post_by_slug(&self, slug: &str) -> PortResult<Post>;

    async fn list_curiosities(&self, status: i32) -> PortResult<Vec<Curiosity>>;

    async fn get_curiosity(&self, id: &RecordId) -> PortResult<Curiosity>;

    async fn list_images(&self, status: i32) -> PortResult<Vec<Image>>;

    async fn get_image(&self, id: &RecordId) -> PortResult<Image>;

    /// Dates with the given status, earliest first.
    async fn list_dates(&self, status: i32) -> PortResult<Vec<DateOfNote>>;

    async fn get_date(&self, id: &RecordId) -> PortResult<DateOfNote>;

    // --- Devices ---
    async fn list_devices(&self) -> PortResult<Vec<Device>>;

    async fn get_device(&self, key: &str) -> PortResult<Device>;
}

#[async_trait]
pub trait MailService: Send + Sync {
    /// The address messages are sent from.
    fn sender(&self) -> &str;

    /// Opens one transport session and sends the message to every recipient at once.
    async fn send_html(&self, email: &OutboundEmail) -> PortResult<()>;
}
