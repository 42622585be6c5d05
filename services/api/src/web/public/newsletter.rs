//! services/api/src/web/public/newsletter.rs

use axum::{extract::State, http::StatusCode, Json};
use portal_core::domain::EmailAddress;
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ErrorResponse};
use crate::web::responses::{CreatedResponse, SubscribeRequest};
use crate::web::state::ContentState;

/// POST /newsletter - Subscribe an address to the newsletter
#[utoipa::path(
    post,
    path = "/newsletter",
    tag = "newsletter",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscribed", body = CreatedResponse),
        (status = 400, description = "Malformed email", body = ErrorResponse)
    )
)]
pub async fn subscribe_handler(
    State(state): State<Arc<ContentState>>,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let email = EmailAddress::parse(&req.email)?;
    let id = state.db.create_subscriber(&email).await?;
    info!("New newsletter subscriber {}", id);
    Ok((StatusCode::CREATED, Json(id.into())))
}
