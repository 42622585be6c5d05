//! services/api/src/web/public/devices.rs
//!
//! Lookups used by the display devices. A device asks for its key with a
//! `.txt` suffix when it wants the raw value as `text/plain`; without the
//! suffix the value comes back as a JSON string.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use portal_core::domain::Device;
use std::sync::Arc;

use crate::error::{ApiError, ErrorResponse};
use crate::web::responses::{respond_all, DeviceResponse};
use crate::web::state::ContentState;

pub const PLAIN_TEXT_SUFFIX: &str = ".txt";

#[derive(Debug, Clone, Copy)]
enum DeviceField {
    Text,
    State,
}

/// Splits the qualifier off a requested key: `("lobby", true)` for `lobby.txt`.
fn split_qualifier(key: &str) -> (&str, bool) {
    match key.strip_suffix(PLAIN_TEXT_SUFFIX) {
        Some(bare) => (bare, true),
        None => (key, false),
    }
}

async fn device_field(
    state: &ContentState,
    key: &str,
    field: DeviceField,
) -> Result<Response, ApiError> {
    let (lookup, plain_text) = split_qualifier(key);
    let Device { text, state: device_state, .. } = state.db.get_device(lookup).await?;

    let value = match field {
        DeviceField::Text => text,
        DeviceField::State => device_state,
    };

    if plain_text {
        // `String` responds as text/plain; charset=utf-8.
        Ok(value.into_response())
    } else {
        Ok(Json(value).into_response())
    }
}

#[utoipa::path(
    get,
    path = "/devices",
    tag = "devices",
    responses(
        (status = 200, description = "Every device with its text and state joined", body = [DeviceResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_devices_handler(
    State(state): State<Arc<ContentState>>,
) -> Result<Json<Vec<DeviceResponse>>, ApiError> {
    let devices = state.db.list_devices().await?;
    Ok(Json(respond_all(devices)))
}

#[utoipa::path(
    get,
    path = "/devices/{key}/text",
    tag = "devices",
    params(("key" = String, Path, description = "Device key, optionally suffixed with `.txt`")),
    responses(
        (status = 200, description = "Display text: JSON string, or text/plain with `.txt`", body = String),
        (status = 404, description = "No such device", body = ErrorResponse)
    )
)]
pub async fn get_device_text_handler(
    State(state): State<Arc<ContentState>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    device_field(&state, &key, DeviceField::Text).await
}

#[utoipa::path(
    get,
    path = "/devices/{key}/state",
    tag = "devices",
    params(("key" = String, Path, description = "Device key, optionally suffixed with `.txt`")),
    responses(
        (status = 200, description = "Device state: JSON string, or text/plain with `.txt`", body = String),
        (status = 404, description = "No such device", body = ErrorResponse)
    )
)]
pub async fn get_device_state_handler(
    State(state): State<Arc<ContentState>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    device_field(&state, &key, DeviceField::State).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifier_is_stripped_only_at_the_end() {
        assert_eq!(split_qualifier("lobby.txt"), ("lobby", true));
        assert_eq!(split_qualifier("lobby"), ("lobby", false));
        assert_eq!(split_qualifier("notes.txt.bak"), ("notes.txt.bak", false));
    }
}
