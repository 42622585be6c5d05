//! services/api/src/web/admin/emails.rs
//!
//! Handlers for the newsletter subscriber list.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use portal_core::domain::{EmailAddress, RecordId};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ErrorResponse};
use crate::web::responses::{respond_all, CreatedResponse, SubscribeRequest, SubscriberResponse};
use crate::web::state::AdminState;

#[utoipa::path(
    get,
    path = "/emails",
    tag = "emails",
    responses(
        (status = 200, description = "Every subscriber", body = [SubscriberResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_emails_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<Vec<SubscriberResponse>>, ApiError> {
    let subscribers = state.db.list_subscribers().await?;
    Ok(Json(respond_all(subscribers)))
}

#[utoipa::path(
    post,
    path = "/emails",
    tag = "emails",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscriber registered", body = CreatedResponse),
        (status = 400, description = "Malformed email", body = ErrorResponse)
    )
)]
pub async fn register_email_handler(
    State(state): State<Arc<AdminState>>,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let email = EmailAddress::parse(&req.email)?;
    let id = state.db.create_subscriber(&email).await?;
    info!("Registered subscriber {}", id);
    Ok((StatusCode::CREATED, Json(id.into())))
}

#[utoipa::path(
    get,
    path = "/emails/{id}",
    tag = "emails",
    params(("id" = String, Path, description = "Subscriber identifier (24 hex digits)")),
    responses(
        (status = 200, description = "The subscriber", body = SubscriberResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such subscriber", body = ErrorResponse)
    )
)]
pub async fn get_email_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<Json<SubscriberResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.db.get_subscriber(&id).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/emails/{id}",
    tag = "emails",
    params(("id" = String, Path, description = "Subscriber identifier (24 hex digits)")),
    responses(
        (status = 204, description = "Subscriber removed"),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such subscriber", body = ErrorResponse)
    )
)]
pub async fn delete_email_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = RecordId::parse(&id)?;
    state.db.delete_subscriber(&id).await?;
    info!("Removed subscriber {}", id);
    Ok(StatusCode::NO_CONTENT)
}
