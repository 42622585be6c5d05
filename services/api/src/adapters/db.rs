//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of
//! the `DatabaseService` port from `portal_core`. It handles all interactions
//! with MongoDB through the official driver.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, DateTime as BsonDateTime, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    results::InsertOneResult,
    Client, Collection, Database,
};
use portal_core::domain::{
    Category, Curiosity, DateOfNote, Device, EmailAddress, Image, NewSentEmail, NewUser, Post,
    RecordId, SendOutcome, SentEmail, Subscriber, UpdateOutcome, User, UserUpdate,
};
use portal_core::ports::{DatabaseService, PortError, PortResult};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use tracing::warn;

const USERS: &str = "users";
const SUBSCRIBERS: &str = "emails";
const SENT_EMAILS: &str = "sent_emails";
const CATEGORIES: &str = "categories";
const POSTS: &str = "posts";
const CURIOSITIES: &str = "curiosities";
const IMAGES: &str = "images";
const DATES: &str = "dates";
const DEVICES: &str = "devices";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
///
/// The driver's `Client` pools connections internally and connects lazily, so a
/// single adapter is shared by every request for the lifetime of the process.
#[derive(Clone)]
pub struct DbAdapter {
    db: Database,
}

impl DbAdapter {
    /// Creates a new `DbAdapter` over an existing database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Builds a client for `uri` (pinned to the stable server API) and selects `database_name`.
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.app_name = Some("portal".to_string());

        let client = Client::with_options(options)?;
        Ok(Self::new(client.database(database_name)))
    }

    /// Round-trips a `ping` so startup fails fast on a bad connection string.
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn users(&self) -> Collection<UserRecord> {
        self.db.collection(USERS)
    }

    fn subscribers(&self) -> Collection<SubscriberRecord> {
        self.db.collection(SUBSCRIBERS)
    }

    fn sent_emails(&self) -> Collection<SentEmailRecord> {
        self.db.collection(SENT_EMAILS)
    }

    fn categories(&self) -> Collection<CategoryRecord> {
        self.db.collection(CATEGORIES)
    }

    fn posts(&self) -> Collection<PostRecord> {
        self.db.collection(POSTS)
    }

    fn curiosities(&self) -> Collection<CuriosityRecord> {
        self.db.collection(CURIOSITIES)
    }

    fn images(&self) -> Collection<ImageRecord> {
        self.db.collection(IMAGES)
    }

    fn dates(&self) -> Collection<DateRecord> {
        self.db.collection(DATES)
    }

    fn devices(&self) -> Collection<DeviceRecord> {
        self.db.collection(DEVICES)
    }
}

//=========================================================================================
// Identifier and Query Helpers
//=========================================================================================

fn db_error(e: mongodb::error::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn to_object_id(id: &RecordId) -> PortResult<ObjectId> {
    ObjectId::parse_str(id.as_str()).map_err(|e| PortError::InvalidId(e.to_string()))
}

fn to_record_id(id: Option<ObjectId>) -> PortResult<RecordId> {
    let oid = id.ok_or_else(|| PortError::Unexpected("document has no _id".to_string()))?;
    RecordId::parse(&oid.to_hex())
}

fn inserted_id(result: InsertOneResult) -> PortResult<RecordId> {
    let oid = result.inserted_id.as_object_id().ok_or_else(|| {
        PortError::Unexpected("store generated a non-ObjectId identifier".to_string())
    })?;
    to_record_id(Some(oid))
}

/// Listings are decoded one document at a time. The collections carry no
/// schema, so a document that does not fit its record type is logged and
/// skipped instead of failing the whole listing.
async fn find_many<T>(
    collection: &Collection<T>,
    filter: Document,
    sort: Option<Document>,
) -> PortResult<Vec<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let raw = collection.clone_with_type::<Document>();
    let mut find = raw.find(filter);
    if let Some(sort) = sort {
        find = find.sort(sort);
    }
    let cursor = find.await.map_err(db_error)?;
    let documents: Vec<Document> = cursor.try_collect().await.map_err(db_error)?;
    Ok(decode_all(collection.name(), documents))
}

fn decode_all<T: DeserializeOwned>(collection: &str, documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document
                .get("_id")
                .map(ToString::to_string)
                .unwrap_or_else(|| "without _id".to_string());
            match bson::from_document::<T>(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed document {} in '{}': {}", id, collection, e);
                    None
                }
            }
        })
        .collect()
}

/// Reads a numeric flag whether it was stored as an int32, an int64 or a double.
fn lenient_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Number>::deserialize(deserializer)? {
        Some(Number::Int(n)) => n as i32,
        Some(Number::Float(f)) => f as i32,
        None => 0,
    })
}

async fn find_one<T>(collection: &Collection<T>, filter: Document, what: String) -> PortResult<T>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    collection
        .find_one(filter)
        .await
        .map_err(db_error)?
        .ok_or(PortError::NotFound(what))
}

async fn find_by_id<T>(collection: &Collection<T>, id: &RecordId, kind: &str) -> PortResult<T>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let oid = to_object_id(id)?;
    find_one(collection, doc! { "_id": oid }, format!("{} {} not found", kind, id)).await
}

async fn delete_by_id<T>(collection: &Collection<T>, id: &RecordId, kind: &str) -> PortResult<()>
where
    T: Send + Sync,
{
    let oid = to_object_id(id)?;
    let result = collection
        .delete_one(doc! { "_id": oid })
        .await
        .map_err(db_error)?;
    if result.deleted_count == 0 {
        return Err(PortError::NotFound(format!("{} {} not found", kind, id)));
    }
    Ok(())
}

fn into_domain<R, T>(records: Vec<R>, convert: fn(R) -> PortResult<T>) -> PortResult<Vec<T>> {
    records.into_iter().map(convert).collect()
}

fn to_chrono(value: Option<BsonDateTime>) -> Option<DateTime<Utc>> {
    value.map(|v| v.to_chrono())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(rename = "fname", default)]
    first_name: String,
    #[serde(rename = "lname", default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default, deserialize_with = "lenient_int")]
    role: i32,
    #[serde(default, deserialize_with = "lenient_int")]
    status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created: Option<BsonDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated: Option<BsonDateTime>,
}
impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        Ok(User {
            id: to_record_id(self.id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            status: self.status,
            created_at: to_chrono(self.created).unwrap_or_default(),
            updated_at: to_chrono(self.updated),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SubscriberRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upload_at: Option<BsonDateTime>,
}
impl SubscriberRecord {
    fn to_domain(self) -> PortResult<Subscriber> {
        Ok(Subscriber {
            id: to_record_id(self.id)?,
            email: self.email,
            subscribed_at: to_chrono(self.upload_at).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SentEmailRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default)]
    msg_to: Vec<String>,
    #[serde(default)]
    msg_from: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    send_at: Option<BsonDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}
impl SentEmailRecord {
    fn to_domain(self) -> PortResult<SentEmail> {
        Ok(SentEmail {
            id: to_record_id(self.id)?,
            recipients: self.msg_to,
            sender: self.msg_from,
            title: self.title,
            content: self.content,
            sent_at: to_chrono(self.send_at).unwrap_or_default(),
            outcome: SendOutcome::from_stored(self.outcome.as_deref()),
            error: self.error,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    #[serde(rename = "_id")]
    id: Option<ObjectId>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "lenient_int")]
    status: i32,
}
impl CategoryRecord {
    fn to_domain(self) -> PortResult<Category> {
        Ok(Category {
            id: to_record_id(self.id)?,
            name: self.name,
            description: self.description,
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PostRecord {
    #[serde(rename = "_id")]
    id: Option<ObjectId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    category_id: Option<ObjectId>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    status: i32,
    #[serde(default)]
    created: Option<BsonDateTime>,
}
impl PostRecord {
    fn to_domain(self) -> PortResult<Post> {
        Ok(Post {
            id: to_record_id(self.id)?,
            title: self.title,
            slug: self.slug,
            category_id: self.category_id.map(|oid| to_record_id(Some(oid))).transpose()?,
            summary: self.summary,
            content: self.content,
            image: self.image,
            status: self.status,
            created_at: to_chrono(self.created),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CuriosityRecord {
    #[serde(rename = "_id")]
    id: Option<ObjectId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    status: i32,
}
impl CuriosityRecord {
    fn to_domain(self) -> PortResult<Curiosity> {
        Ok(Curiosity {
            id: to_record_id(self.id)?,
            title: self.title,
            content: self.content,
            image: self.image,
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ImageRecord {
    #[serde(rename = "_id")]
    id: Option<ObjectId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    alt: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    status: i32,
}
impl ImageRecord {
    fn to_domain(self) -> PortResult<Image> {
        Ok(Image {
            id: to_record_id(self.id)?,
            title: self.title,
            url: self.url,
            alt: self.alt,
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DateRecord {
    #[serde(rename = "_id")]
    id: Option<ObjectId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    // Stored as an ISO `YYYY-MM-DD` string so lexical order is date order.
    date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_int")]
    status: i32,
}
impl DateRecord {
    fn to_domain(self) -> PortResult<DateOfNote> {
        Ok(DateOfNote {
            id: to_record_id(self.id)?,
            title: self.title,
            description: self.description,
            date: self.date,
            status: self.status,
        })
    }
}

/// Device fields are written either as one string or as a list of fragments.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    One(String),
    Many(Vec<String>),
}
impl TextValue {
    fn join(self) -> String {
        match self {
            TextValue::One(text) => text,
            TextValue::Many(parts) => parts.concat(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeviceRecord {
    #[serde(rename = "_id")]
    id: Option<ObjectId>,
    key: String,
    #[serde(default)]
    text: Option<TextValue>,
    #[serde(default)]
    state: Option<TextValue>,
}
impl DeviceRecord {
    fn to_domain(self) -> PortResult<Device> {
        Ok(Device {
            id: to_record_id(self.id)?,
            key: self.key,
            text: self.text.map(TextValue::join).unwrap_or_default(),
            state: self.state.map(TextValue::join).unwrap_or_default(),
        })
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    #[tracing::instrument(name = "List users by status", skip(self))]
    async fn list_users_by_status(&self, status: i32) -> PortResult<Vec<User>> {
        let records = find_many(&self.users(), doc! { "status": status }, None).await?;
        into_domain(records, UserRecord::to_domain)
    }

    #[tracing::instrument(name = "Fetch user", skip(self))]
    async fn get_user(&self, id: &RecordId) -> PortResult<User> {
        find_by_id(&self.users(), id, "User").await?.to_domain()
    }

    #[tracing::instrument(name = "Find users by email", skip(self))]
    async fn find_users_by_email(&self, email: &EmailAddress) -> PortResult<Vec<User>> {
        let records = find_many(&self.users(), doc! { "email": email.as_str() }, None).await?;
        into_domain(records, UserRecord::to_domain)
    }

    #[tracing::instrument(name = "Insert user", skip(self, user))]
    async fn create_user(&self, user: NewUser) -> PortResult<RecordId> {
        let record = UserRecord {
            id: None,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email.as_str().to_string(),
            password: user.password_hash,
            role: user.role,
            status: user.status,
            created: Some(BsonDateTime::now()),
            updated: None,
        };
        let result = self.users().insert_one(record).await.map_err(db_error)?;
        inserted_id(result)
    }

    #[tracing::instrument(name = "Update user", skip(self, update))]
    async fn update_user(&self, id: &RecordId, update: UserUpdate) -> PortResult<UpdateOutcome> {
        let oid = to_object_id(id)?;
        let mut fields = doc! {
            "fname": update.first_name,
            "lname": update.last_name,
            "email": update.email.as_str(),
            "role": update.role,
            "status": update.status,
            "updated": BsonDateTime::now(),
        };
        if let Some(password_hash) = update.password_hash {
            fields.insert("password", password_hash);
        }

        let result = self
            .users()
            .update_one(doc! { "_id": oid }, doc! { "$set": fields })
            .await
            .map_err(db_error)?;
        if result.matched_count == 0 {
            return Err(PortError::NotFound(format!("User {} not found", id)));
        }
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    #[tracing::instrument(name = "Delete user", skip(self))]
    async fn delete_user(&self, id: &RecordId) -> PortResult<()> {
        delete_by_id(&self.users(), id, "User").await
    }

    #[tracing::instrument(name = "List subscribers", skip(self))]
    async fn list_subscribers(&self) -> PortResult<Vec<Subscriber>> {
        let records = find_many(&self.subscribers(), doc! {}, None).await?;
        into_domain(records, SubscriberRecord::to_domain)
    }

    #[tracing::instrument(name = "Fetch subscriber", skip(self))]
    async fn get_subscriber(&self, id: &RecordId) -> PortResult<Subscriber> {
        find_by_id(&self.subscribers(), id, "Email").await?.to_domain()
    }

    #[tracing::instrument(name = "Insert subscriber", skip(self))]
    async fn create_subscriber(&self, email: &EmailAddress) -> PortResult<RecordId> {
        let record = SubscriberRecord {
            id: None,
            email: email.as_str().to_string(),
            upload_at: Some(BsonDateTime::now()),
        };
        let result = self
            .subscribers()
            .insert_one(record)
            .await
            .map_err(db_error)?;
        inserted_id(result)
    }

    #[tracing::instrument(name = "Delete subscriber", skip(self))]
    async fn delete_subscriber(&self, id: &RecordId) -> PortResult<()> {
        delete_by_id(&self.subscribers(), id, "Email").await
    }

    #[tracing::instrument(name = "List sent emails", skip(self))]
    async fn list_sent_emails(&self) -> PortResult<Vec<SentEmail>> {
        let records = find_many(&self.sent_emails(), doc! {}, None).await?;
        into_domain(records, SentEmailRecord::to_domain)
    }

    #[tracing::instrument(name = "Fetch sent email", skip(self))]
    async fn get_sent_email(&self, id: &RecordId) -> PortResult<SentEmail> {
        find_by_id(&self.sent_emails(), id, "Sent email").await?.to_domain()
    }

    #[tracing::instrument(name = "Insert sent email record", skip(self, record), fields(recipients = record.recipients.len()))]
    async fn save_sent_email(&self, record: NewSentEmail) -> PortResult<RecordId> {
        let record = SentEmailRecord {
            id: None,
            msg_to: record.recipients,
            msg_from: record.sender,
            title: record.title,
            content: record.content,
            send_at: Some(BsonDateTime::from_chrono(record.sent_at)),
            outcome: Some(record.outcome.as_str().to_string()),
            error: record.error,
        };
        let result = self
            .sent_emails()
            .insert_one(record)
            .await
            .map_err(db_error)?;
        inserted_id(result)
    }

    #[tracing::instrument(name = "List categories", skip(self))]
    async fn list_categories(&self, status: i32) -> PortResult<Vec<Category>> {
        let records = find_many(&self.categories(), doc! { "status": status }, None).await?;
        into_domain(records, CategoryRecord::to_domain)
    }

    #[tracing::instrument(name = "Fetch category", skip(self))]
    async fn get_category(&self, id: &RecordId) -> PortResult<Category> {
        find_by_id(&self.categories(), id, "Category").await?.to_domain()
    }

    #[tracing::instrument(name = "List posts", skip(self))]
    async fn list_posts(
        &self,
        status: i32,
        category_id: Option<&RecordId>,
    ) -> PortResult<Vec<Post>> {
        let mut filter = doc! { "status": status };
        if let Some(category_id) = category_id {
            filter.insert("category_id", to_object_id(category_id)?);
        }
        let records = find_many(&self.posts(), filter, Some(doc! { "created": -1 })).await?;
        into_domain(records, PostRecord::to_domain)
    }

    #[tracing::instrument(name = "Fetch post", skip(self))]
    async fn get_post(&self, id: &RecordId) -> PortResult<Post> {
        find_by_id(&self.posts(), id, "Post").await?.to_domain()
    }

    #[tracing::instrument(name = "Fetch post by slug", skip(self))]
    async fn get_post_by_slug(&self, slug: &str) -> PortResult<Post> {
        find_one(
            &self.posts(),
            doc! { "slug": slug },
            format!("Post with slug '{}' not found", slug),
        )
        .await?
        .to_domain()
    }

    #[tracing::instrument(name = "List curiosities", skip(self))]
    async fn list_curiosities(&self, status: i32) -> PortResult<Vec<Curiosity>> {
        let records = find_many(&self.curiosities(), doc! { "status": status }, None).await?;
        into_domain(records, CuriosityRecord::to_domain)
    }

    #[tracing::instrument(name = "Fetch curiosity", skip(self))]
    async fn get_curiosity(&self, id: &RecordId) -> PortResult<Curiosity> {
        find_by_id(&self.curiosities(), id, "Curiosity").await?.to_domain()
    }

    #[tracing::instrument(name = "List images", skip(self))]
    async fn list_images(&self, status: i32) -> PortResult<Vec<Image>> {
        let records = find_many(&self.images(), doc! { "status": status }, None).await?;
        into_domain(records, ImageRecord::to_domain)
    }

    #[tracing::instrument(name = "Fetch image", skip(self))]
    async fn get_image(&self, id: &RecordId) -> PortResult<Image> {
        find_by_id(&self.images(), id, "Image").await?.to_domain()
    }

    #[tracing::instrument(name = "List dates", skip(self))]
    async fn list_dates(&self, status: i32) -> PortResult<Vec<DateOfNote>> {
        let records =
            find_many(&self.dates(), doc! { "status": status }, Some(doc! { "date": 1 })).await?;
        into_domain(records, DateRecord::to_domain)
    }

    #[tracing::instrument(name = "Fetch date", skip(self))]
    async fn get_date(&self, id: &RecordId) -> PortResult<DateOfNote> {
        find_by_id(&self.dates(), id, "Date").await?.to_domain()
    }

    #[tracing::instrument(name = "List devices", skip(self))]
    async fn list_devices(&self) -> PortResult<Vec<Device>> {
        let records = find_many(&self.devices(), doc! {}, None).await?;
        into_domain(records, DeviceRecord::to_domain)
    }

    #[tracing::instrument(name = "Fetch device", skip(self))]
    async fn get_device(&self, key: &str) -> PortResult<Device> {
        find_one(
            &self.devices(),
            doc! { "key": key },
            format!("Device '{}' not found", key),
        )
        .await?
        .to_domain()
    }
}
