//! In-memory implementations of the ports plus request helpers, shared by the
//! integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use portal_core::domain::{
    Category, Curiosity, DateOfNote, Device, EmailAddress, Image, NewSentEmail, NewUser,
    OutboundEmail, Post, RecordId, SentEmail, Subscriber, UpdateOutcome, User, UserUpdate,
};
use portal_core::ports::{DatabaseService, MailService, PortError, PortResult};
use serde_json::Value;
use tower::ServiceExt;

//=========================================================================================
// In-memory DatabaseService
//=========================================================================================

#[derive(Default)]
struct Collections {
    next_id: u64,
    users: Vec<(User, String)>,
    subscribers: Vec<Subscriber>,
    sent_emails: Vec<SentEmail>,
    categories: Vec<Category>,
    posts: Vec<Post>,
    curiosities: Vec<Curiosity>,
    images: Vec<Image>,
    dates: Vec<DateOfNote>,
    devices: Vec<Device>,
}

impl Collections {
    fn next_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId::parse(&format!("{:024x}", self.next_id)).unwrap()
    }
}

/// Mirrors the MongoDB adapter's semantics over plain vectors.
#[derive(Default)]
pub struct MemoryDatabase {
    inner: Mutex<Collections>,
}

fn not_found(kind: &str, id: &RecordId) -> PortError {
    PortError::NotFound(format!("{} {} not found", kind, id))
}

fn by_id<T: Clone>(
    items: &[T],
    id: &RecordId,
    matches: impl Fn(&T) -> bool,
    kind: &str,
) -> PortResult<T> {
    items
        .iter()
        .find(|item| matches(item))
        .cloned()
        .ok_or_else(|| not_found(kind, id))
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn password_hash(&self, id: &RecordId) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|(user, _)| &user.id == id)
            .map(|(_, hash)| hash.clone())
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.inner.lock().unwrap().sent_emails.clone()
    }

    pub fn subscribers(&self) -> Vec<Subscriber> {
        self.inner.lock().unwrap().subscribers.clone()
    }

    pub fn seed_subscriber(&self, email: &str) -> RecordId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.subscribers.push(Subscriber {
            id: id.clone(),
            email: email.to_string(),
            subscribed_at: Utc::now(),
        });
        id
    }

    pub fn seed_category(&self, name: &str, status: i32) -> RecordId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.categories.push(Category {
            id: id.clone(),
            name: name.to_string(),
            description: format!("All about {}", name),
            status,
        });
        id
    }

    /// `age_days` sets the creation time that far in the past.
    pub fn seed_post(
        &self,
        title: &str,
        slug: &str,
        category_id: Option<&RecordId>,
        status: i32,
        age_days: i64,
    ) -> RecordId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.posts.push(Post {
            id: id.clone(),
            title: title.to_string(),
            slug: slug.to_string(),
            category_id: category_id.cloned(),
            summary: String::new(),
            content: format!("<p>{}</p>", title),
            image: None,
            status,
            created_at: Some(Utc::now() - Duration::days(age_days)),
        });
        id
    }

    pub fn seed_curiosity(&self, title: &str, status: i32) -> RecordId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.curiosities.push(Curiosity {
            id: id.clone(),
            title: title.to_string(),
            content: String::new(),
            image: None,
            status,
        });
        id
    }

    pub fn seed_image(&self, title: &str, url: &str, status: i32) -> RecordId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.images.push(Image {
            id: id.clone(),
            title: title.to_string(),
            url: url.to_string(),
            alt: None,
            status,
        });
        id
    }

    pub fn seed_date(&self, title: &str, date: NaiveDate, status: i32) -> RecordId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.dates.push(DateOfNote {
            id: id.clone(),
            title: title.to_string(),
            description: String::new(),
            date,
            status,
        });
        id
    }

    pub fn seed_device(&self, key: &str, text: &str, state: &str) -> RecordId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.devices.push(Device {
            id: id.clone(),
            key: key.to_string(),
            text: text.to_string(),
            state: state.to_string(),
        });
        id
    }
}

#[async_trait]
impl DatabaseService for MemoryDatabase {
    async fn list_users_by_status(&self, status: i32) -> PortResult<Vec<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .filter(|(user, _)| user.status == status)
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn get_user(&self, id: &RecordId) -> PortResult<User> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|(user, _)| &user.id == id)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| not_found("User", id))
    }

    async fn find_users_by_email(&self, email: &EmailAddress) -> PortResult<Vec<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .filter(|(user, _)| user.email == email.as_str())
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn create_user(&self, user: NewUser) -> PortResult<RecordId> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.users.push((
            User {
                id: id.clone(),
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email.as_str().to_string(),
                role: user.role,
                status: user.status,
                created_at: Utc::now(),
                updated_at: None,
            },
            user.password_hash,
        ));
        Ok(id)
    }

    async fn update_user(&self, id: &RecordId, update: UserUpdate) -> PortResult<UpdateOutcome> {
        let mut inner = self.inner.lock().unwrap();
        let (user, hash) = inner
            .users
            .iter_mut()
            .find(|(user, _)| &user.id == id)
            .ok_or_else(|| not_found("User", id))?;

        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.email = update.email.as_str().to_string();
        user.role = update.role;
        user.status = update.status;
        user.updated_at = Some(Utc::now());
        if let Some(password_hash) = update.password_hash {
            *hash = password_hash;
        }
        Ok(UpdateOutcome {
            matched: 1,
            modified: 1,
        })
    }

    async fn delete_user(&self, id: &RecordId) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.users.len();
        inner.users.retain(|(user, _)| &user.id != id);
        if inner.users.len() == before {
            return Err(not_found("User", id));
        }
        Ok(())
    }

    async fn list_subscribers(&self) -> PortResult<Vec<Subscriber>> {
        Ok(self.subscribers())
    }

    async fn get_subscriber(&self, id: &RecordId) -> PortResult<Subscriber> {
        let inner = self.inner.lock().unwrap();
        by_id(&inner.subscribers, id, |s| &s.id == id, "Email")
    }

    async fn create_subscriber(&self, email: &EmailAddress) -> PortResult<RecordId> {
        Ok(self.seed_subscriber(email.as_str()))
    }

    async fn delete_subscriber(&self, id: &RecordId) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|s| &s.id != id);
        if inner.subscribers.len() == before {
            return Err(not_found("Email", id));
        }
        Ok(())
    }

    async fn list_sent_emails(&self) -> PortResult<Vec<SentEmail>> {
        Ok(self.sent_emails())
    }

    async fn get_sent_email(&self, id: &RecordId) -> PortResult<SentEmail> {
        let inner = self.inner.lock().unwrap();
        by_id(&inner.sent_emails, id, |s| &s.id == id, "Sent email")
    }

    async fn save_sent_email(&self, record: NewSentEmail) -> PortResult<RecordId> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.sent_emails.push(SentEmail {
            id: id.clone(),
            recipients: record.recipients,
            sender: record.sender,
            title: record.title,
            content: record.content,
            sent_at: record.sent_at,
            outcome: record.outcome,
            error: record.error,
        });
        Ok(id)
    }

    async fn list_categories(&self, status: i32) -> PortResult<Vec<Category>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .categories
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect())
    }

    async fn get_category(&self, id: &RecordId) -> PortResult<Category> {
        let inner = self.inner.lock().unwrap();
        by_id(&inner.categories, id, |c| &c.id == id, "Category")
    }

    async fn list_posts(
        &self,
        status: i32,
        category_id: Option<&RecordId>,
    ) -> PortResult<Vec<Post>> {
        let inner = self.inner.lock().unwrap();
        let mut posts: Vec<Post> = inner
            .posts
            .iter()
            .filter(|p| p.status == status)
            .filter(|p| category_id.map_or(true, |c| p.category_id.as_ref() == Some(c)))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn get_post(&self, id: &RecordId) -> PortResult<Post> {
        let inner = self.inner.lock().unwrap();
        by_id(&inner.posts, id, |p| &p.id == id, "Post")
    }

    async fn get_post_by_slug(&self, slug: &str) -> PortResult<Post> {
        let inner = self.inner.lock().unwrap();
        inner
            .posts
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Post with slug '{}' not found", slug)))
    }

    async fn list_curiosities(&self, status: i32) -> PortResult<Vec<Curiosity>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .curiosities
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect())
    }

    async fn get_curiosity(&self, id: &RecordId) -> PortResult<Curiosity> {
        let inner = self.inner.lock().unwrap();
        by_id(&inner.curiosities, id, |c| &c.id == id, "Curiosity")
    }

    async fn list_images(&self, status: i32) -> PortResult<Vec<Image>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .images
            .iter()
            .filter(|i| i.status == status)
            .cloned()
            .collect())
    }

    async fn get_image(&self, id: &RecordId) -> PortResult<Image> {
        let inner = self.inner.lock().unwrap();
        by_id(&inner.images, id, |i| &i.id == id, "Image")
    }

    async fn list_dates(&self, status: i32) -> PortResult<Vec<DateOfNote>> {
        let inner = self.inner.lock().unwrap();
        let mut dates: Vec<DateOfNote> = inner
            .dates
            .iter()
            .filter(|d| d.status == status)
            .cloned()
            .collect();
        dates.sort_by_key(|d| d.date);
        Ok(dates)
    }

    async fn get_date(&self, id: &RecordId) -> PortResult<DateOfNote> {
        let inner = self.inner.lock().unwrap();
        by_id(&inner.dates, id, |d| &d.id == id, "Date")
    }

    async fn list_devices(&self) -> PortResult<Vec<Device>> {
        Ok(self.inner.lock().unwrap().devices.clone())
    }

    async fn get_device(&self, key: &str) -> PortResult<Device> {
        let inner = self.inner.lock().unwrap();
        inner
            .devices
            .iter()
            .find(|d| d.key == key)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Device '{}' not found", key)))
    }
}

//=========================================================================================
// Recording MailService
//=========================================================================================

#[derive(Clone, Copy)]
enum Failure {
    Transport,
    Rejection,
}

/// Captures outgoing messages instead of talking SMTP. A failing mailer
/// answers every send with a transport error, a rejecting one with a
/// validation error.
pub struct RecordingMailer {
    sender: String,
    failure: Option<Failure>,
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sender: "newsletter@portal.example".to_string(),
            failure: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            failure: Some(Failure::Transport),
            ..Self::new()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            failure: Some(Failure::Rejection),
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailService for RecordingMailer {
    fn sender(&self) -> &str {
        &self.sender
    }

    async fn send_html(&self, email: &OutboundEmail) -> PortResult<()> {
        match self.failure {
            Some(Failure::Transport) => {
                return Err(PortError::Transport("connection refused".to_string()))
            }
            Some(Failure::Rejection) => {
                return Err(PortError::Validation("recipient rejected".to_string()))
            }
            None => {}
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

//=========================================================================================
// Request Helpers
//=========================================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body is UTF-8")
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();

    TestResponse {
        status,
        content_type,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}
