//! services/api/src/web/public/mod.rs
//!
//! The public content service: categories, posts, curiosities, images,
//! dates-of-note, device lookups, and newsletter sign-up.

pub mod content;
pub mod devices;
pub mod newsletter;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::web::responses::{
    CategoryResponse, CreatedResponse, CuriosityResponse, DateResponse, DeviceResponse,
    ImageResponse, PostResponse, SubscribeRequest,
};
use crate::web::state::ContentState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        content::list_categories_handler,
        content::get_category_handler,
        content::list_category_posts_handler,
        content::list_posts_handler,
        content::get_post_handler,
        content::get_post_by_slug_handler,
        content::list_curiosities_handler,
        content::get_curiosity_handler,
        content::list_images_handler,
        content::get_image_handler,
        content::list_dates_handler,
        content::get_date_handler,
        devices::list_devices_handler,
        devices::get_device_text_handler,
        devices::get_device_state_handler,
        newsletter::subscribe_handler,
    ),
    components(
        schemas(
            ErrorResponse,
            CreatedResponse,
            CategoryResponse,
            PostResponse,
            CuriosityResponse,
            ImageResponse,
            DateResponse,
            DeviceResponse,
            SubscribeRequest,
        )
    ),
    tags(
        (name = "content", description = "Published site content."),
        (name = "devices", description = "Text and state for display devices."),
        (name = "newsletter", description = "Newsletter sign-up.")
    )
)]
pub struct ContentApiDoc;

//=========================================================================================
// Router
//=========================================================================================

pub fn router(state: Arc<ContentState>) -> Router {
    Router::new()
        .route("/categories", get(content::list_categories_handler))
        .route("/categories/{id}", get(content::get_category_handler))
        .route(
            "/categories/{id}/posts",
            get(content::list_category_posts_handler),
        )
        .route("/posts", get(content::list_posts_handler))
        .route("/posts/slug/{slug}", get(content::get_post_by_slug_handler))
        .route("/posts/{id}", get(content::get_post_handler))
        .route("/curiosities", get(content::list_curiosities_handler))
        .route("/curiosities/{id}", get(content::get_curiosity_handler))
        .route("/images", get(content::list_images_handler))
        .route("/images/{id}", get(content::get_image_handler))
        .route("/dates", get(content::list_dates_handler))
        .route("/dates/{id}", get(content::get_date_handler))
        .route("/devices", get(devices::list_devices_handler))
        .route("/devices/{key}/text", get(devices::get_device_text_handler))
        .route("/devices/{key}/state", get(devices::get_device_state_handler))
        .route("/newsletter", post(newsletter::subscribe_handler))
        .with_state(state)
}
