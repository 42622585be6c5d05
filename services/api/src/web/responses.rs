//! services/api/src/web/responses.rs
//!
//! Request and response payloads shared by both services. Identifiers are
//! always sent as hex strings.

use chrono::{DateTime, NaiveDate, Utc};
use portal_core::domain::{
    Category, Curiosity, DateOfNote, Device, Image, Post, RecordId, SentEmail, Subscriber,
    UpdateOutcome, User,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Write Results
//=========================================================================================

/// Returned by every create endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: String,
}

impl From<RecordId> for CreatedResponse {
    fn from(id: RecordId) -> Self {
        Self {
            id: id.into_string(),
        }
    }
}

/// Returned by update endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatedResponse {
    pub matched: u64,
    pub modified: u64,
}

impl From<UpdateOutcome> for UpdatedResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        Self {
            matched: outcome.matched,
            modified: outcome.modified,
        }
    }
}

//=========================================================================================
// Administrative Payloads
//=========================================================================================

/// Every editable user field plus a new plaintext password.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserWithPasswordRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: i32,
    pub status: i32,
}

/// Every editable user field; the stored password is left untouched.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: i32,
    pub status: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: i32,
    pub status: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriberResponse {
    pub id: String,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

impl From<Subscriber> for SubscriberResponse {
    fn from(subscriber: Subscriber) -> Self {
        Self {
            id: subscriber.id.into_string(),
            email: subscriber.email,
            subscribed_at: subscriber.subscribed_at,
        }
    }
}

/// Subject and HTML body of a message for every subscriber.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SentEmailResponse {
    pub id: String,
    pub recipients: Vec<String>,
    pub sender: String,
    pub title: String,
    /// The rendered HTML document that was sent.
    pub content: String,
    pub sent_at: DateTime<Utc>,
    /// `sent` or `failed`.
    pub outcome: String,
    pub error: Option<String>,
}

impl From<SentEmail> for SentEmailResponse {
    fn from(sent: SentEmail) -> Self {
        Self {
            id: sent.id.into_string(),
            recipients: sent.recipients,
            sender: sent.sender,
            title: sent.title,
            content: sent.content,
            sent_at: sent.sent_at,
            outcome: sent.outcome.as_str().to_string(),
            error: sent.error,
        }
    }
}

//=========================================================================================
// Public Content Payloads
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: i32,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into_string(),
            name: category.name,
            description: category.description,
            status: category.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category_id: Option<String>,
    pub summary: String,
    pub content: String,
    pub image: Option<String>,
    pub status: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.into_string(),
            title: post.title,
            slug: post.slug,
            category_id: post.category_id.map(RecordId::into_string),
            summary: post.summary,
            content: post.content,
            image: post.image,
            status: post.status,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CuriosityResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub status: i32,
}

impl From<Curiosity> for CuriosityResponse {
    fn from(curiosity: Curiosity) -> Self {
        Self {
            id: curiosity.id.into_string(),
            title: curiosity.title,
            content: curiosity.content,
            image: curiosity.image,
            status: curiosity.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageResponse {
    pub id: String,
    pub title: String,
    pub url: String,
    pub alt: Option<String>,
    pub status: i32,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id.into_string(),
            title: image.title,
            url: image.url,
            alt: image.alt,
            status: image.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DateResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub status: i32,
}

impl From<DateOfNote> for DateResponse {
    fn from(date: DateOfNote) -> Self {
        Self {
            id: date.id.into_string(),
            title: date.title,
            description: date.description,
            date: date.date,
            status: date.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeviceResponse {
    pub id: String,
    pub key: String,
    pub text: String,
    pub state: String,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self {
            id: device.id.into_string(),
            key: device.key,
            text: device.text,
            state: device.state,
        }
    }
}

/// Converts a list of domain values into their response payloads.
pub fn respond_all<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}
