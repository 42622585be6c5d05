//! services/api/src/web/public/content.rs
//!
//! Read-only handlers for the public site's content collections. Listings only
//! ever include visible documents; lookups by id return hidden ones too, so
//! preview links keep working.

use axum::{
    extract::{Path, State},
    Json,
};
use portal_core::domain::{RecordId, STATUS_ACTIVE};
use std::sync::Arc;

use crate::error::{ApiError, ErrorResponse};
use crate::web::responses::{
    respond_all, CategoryResponse, CuriosityResponse, DateResponse, ImageResponse, PostResponse,
};
use crate::web::state::ContentState;

//=========================================================================================
// Categories
//=========================================================================================

#[utoipa::path(
    get,
    path = "/categories",
    tag = "content",
    responses(
        (status = 200, description = "Visible categories", body = [CategoryResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_categories_handler(
    State(state): State<Arc<ContentState>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state.db.list_categories(STATUS_ACTIVE).await?;
    Ok(Json(respond_all(categories)))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Category identifier (24 hex digits)")),
    responses(
        (status = 200, description = "The category", body = CategoryResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such category", body = ErrorResponse)
    )
)]
pub async fn get_category_handler(
    State(state): State<Arc<ContentState>>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.db.get_category(&id).await?.into()))
}

/// GET /categories/{id}/posts - Visible posts of one category, newest first
#[utoipa::path(
    get,
    path = "/categories/{id}/posts",
    tag = "content",
    params(("id" = String, Path, description = "Category identifier (24 hex digits)")),
    responses(
        (status = 200, description = "Visible posts of the category", body = [PostResponse]),
        (status = 400, description = "Malformed identifier", body = ErrorResponse)
    )
)]
pub async fn list_category_posts_handler(
    State(state): State<Arc<ContentState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let id = RecordId::parse(&id)?;
    let posts = state.db.list_posts(STATUS_ACTIVE, Some(&id)).await?;
    Ok(Json(respond_all(posts)))
}

//=========================================================================================
// Posts
//=========================================================================================

#[utoipa::path(
    get,
    path = "/posts",
    tag = "content",
    responses(
        (status = 200, description = "Visible posts, newest first", body = [PostResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_posts_handler(
    State(state): State<Arc<ContentState>>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.db.list_posts(STATUS_ACTIVE, None).await?;
    Ok(Json(respond_all(posts)))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Post identifier (24 hex digits)")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse)
    )
)]
pub async fn get_post_handler(
    State(state): State<Arc<ContentState>>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.db.get_post(&id).await?.into()))
}

#[utoipa::path(
    get,
    path = "/posts/slug/{slug}",
    tag = "content",
    params(("slug" = String, Path, description = "URL slug of the post")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "No post with that slug", body = ErrorResponse)
    )
)]
pub async fn get_post_by_slug_handler(
    State(state): State<Arc<ContentState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    Ok(Json(state.db.get_post_by_slug(&slug).await?.into()))
}

//=========================================================================================
// Curiosities
//=========================================================================================

#[utoipa::path(
    get,
    path = "/curiosities",
    tag = "content",
    responses(
        (status = 200, description = "Visible curiosities", body = [CuriosityResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_curiosities_handler(
    State(state): State<Arc<ContentState>>,
) -> Result<Json<Vec<CuriosityResponse>>, ApiError> {
    let curiosities = state.db.list_curiosities(STATUS_ACTIVE).await?;
    Ok(Json(respond_all(curiosities)))
}

#[utoipa::path(
    get,
    path = "/curiosities/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Curiosity identifier (24 hex digits)")),
    responses(
        (status = 200, description = "The curiosity", body = CuriosityResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such curiosity", body = ErrorResponse)
    )
)]
pub async fn get_curiosity_handler(
    State(state): State<Arc<ContentState>>,
    Path(id): Path<String>,
) -> Result<Json<CuriosityResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.db.get_curiosity(&id).await?.into()))
}

//=========================================================================================
// Images
//=========================================================================================

#[utoipa::path(
    get,
    path = "/images",
    tag = "content",
    responses(
        (status = 200, description = "Visible images", body = [ImageResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_images_handler(
    State(state): State<Arc<ContentState>>,
) -> Result<Json<Vec<ImageResponse>>, ApiError> {
    let images = state.db.list_images(STATUS_ACTIVE).await?;
    Ok(Json(respond_all(images)))
}

#[utoipa::path(
    get,
    path = "/images/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Image identifier (24 hex digits)")),
    responses(
        (status = 200, description = "The image", body = ImageResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such image", body = ErrorResponse)
    )
)]
pub async fn get_image_handler(
    State(state): State<Arc<ContentState>>,
    Path(id): Path<String>,
) -> Result<Json<ImageResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.db.get_image(&id).await?.into()))
}

//=========================================================================================
// Dates of Note
//=========================================================================================

#[utoipa::path(
    get,
    path = "/dates",
    tag = "content",
    responses(
        (status = 200, description = "Visible dates, earliest first", body = [DateResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_dates_handler(
    State(state): State<Arc<ContentState>>,
) -> Result<Json<Vec<DateResponse>>, ApiError> {
    let dates = state.db.list_dates(STATUS_ACTIVE).await?;
    Ok(Json(respond_all(dates)))
}

#[utoipa::path(
    get,
    path = "/dates/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Date identifier (24 hex digits)")),
    responses(
        (status = 200, description = "The date", body = DateResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such date", body = ErrorResponse)
    )
)]
pub async fn get_date_handler(
    State(state): State<Arc<ContentState>>,
    Path(id): Path<String>,
) -> Result<Json<DateResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.db.get_date(&id).await?.into()))
}
