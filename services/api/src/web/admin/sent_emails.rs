//! services/api/src/web/admin/sent_emails.rs
//!
//! Handlers for the bulk email history and the send endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use portal_core::domain::RecordId;
use std::sync::Arc;

use crate::error::{ApiError, ErrorResponse};
use crate::web::admin::bulk_mail;
use crate::web::responses::{respond_all, CreatedResponse, SendEmailRequest, SentEmailResponse};
use crate::web::state::AdminState;

#[utoipa::path(
    get,
    path = "/sent_emails",
    tag = "sent_emails",
    responses(
        (status = 200, description = "Every bulk email attempt", body = [SentEmailResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_sent_emails_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<Vec<SentEmailResponse>>, ApiError> {
    let sent = state.db.list_sent_emails().await?;
    Ok(Json(respond_all(sent)))
}

/// POST /sent_emails - Email every subscriber
#[utoipa::path(
    post,
    path = "/sent_emails",
    tag = "sent_emails",
    request_body = SendEmailRequest,
    responses(
        (status = 201, description = "Message sent and recorded", body = CreatedResponse),
        (status = 400, description = "Empty title", body = ErrorResponse),
        (status = 502, description = "SMTP failure; the failed attempt is still recorded", body = ErrorResponse)
    )
)]
pub async fn send_email_handler(
    State(state): State<Arc<AdminState>>,
    Json(req): Json<SendEmailRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = bulk_mail::dispatch(
        state.db.as_ref(),
        state.mailer.as_ref(),
        &req.title,
        &req.content,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(id.into())))
}

#[utoipa::path(
    get,
    path = "/sent_emails/{id}",
    tag = "sent_emails",
    params(("id" = String, Path, description = "Send record identifier (24 hex digits)")),
    responses(
        (status = 200, description = "The send record", body = SentEmailResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such record", body = ErrorResponse)
    )
)]
pub async fn get_sent_email_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<Json<SentEmailResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.db.get_sent_email(&id).await?.into()))
}
