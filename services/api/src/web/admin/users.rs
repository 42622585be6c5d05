//! services/api/src/web/admin/users.rs
//!
//! CRUD handlers for back-office users.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use portal_core::domain::{
    EmailAddress, NewUser, RecordId, UserUpdate, STATUS_ACTIVE, STATUS_SUSPENDED,
};
use portal_core::ports::PortError;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::{ApiError, ErrorResponse};
use crate::web::responses::{
    respond_all, CreatedResponse, UpdatedResponse, UserProfileRequest, UserResponse,
    UserWithPasswordRequest,
};
use crate::web::state::AdminState;

fn hash_password(password: &str) -> Result<String, ApiError> {
    if password.trim().is_empty() {
        return Err(PortError::Validation("password must not be empty".to_string()).into());
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ApiError::Internal("Failed to hash password".to_string())
        })
}

/// GET /users - List active users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users with status 0", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_active_users_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.db.list_users_by_status(STATUS_ACTIVE).await?;
    Ok(Json(respond_all(users)))
}

/// GET /users/suspended - List suspended users
#[utoipa::path(
    get,
    path = "/users/suspended",
    tag = "users",
    responses(
        (status = 200, description = "Users with status 1", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_suspended_users_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.db.list_users_by_status(STATUS_SUSPENDED).await?;
    Ok(Json(respond_all(users)))
}

/// POST /users - Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserWithPasswordRequest,
    responses(
        (status = 201, description = "User created", body = CreatedResponse),
        (status = 400, description = "Invalid email or empty password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_user_handler(
    State(state): State<Arc<AdminState>>,
    Json(req): Json<UserWithPasswordRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let email = EmailAddress::parse(&req.email)?;
    let password_hash = hash_password(&req.password)?;

    let id = state
        .db
        .create_user(NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email,
            password_hash,
            role: req.role,
            status: req.status,
        })
        .await?;

    info!("Created user {}", id);
    Ok((StatusCode::CREATED, Json(id.into())))
}

/// GET /users/{id} - Fetch one user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User identifier (24 hex digits)")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
pub async fn get_user_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    let user = state.db.get_user(&id).await?;
    Ok(Json(user.into()))
}

/// GET /users/email/{email} - Users registered with an email address
///
/// Emails are not unique, so this is always a list.
#[utoipa::path(
    get,
    path = "/users/email/{email}",
    tag = "users",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "Matching users, possibly none", body = [UserResponse]),
        (status = 400, description = "Malformed email", body = ErrorResponse)
    )
)]
pub async fn find_users_by_email_handler(
    State(state): State<Arc<AdminState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let email = EmailAddress::parse(&email)?;
    let users = state.db.find_users_by_email(&email).await?;
    Ok(Json(respond_all(users)))
}

/// PUT /users/{id} - Replace a user's profile, keeping the password
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    request_body = UserProfileRequest,
    params(("id" = String, Path, description = "User identifier (24 hex digits)")),
    responses(
        (status = 200, description = "User updated", body = UpdatedResponse),
        (status = 400, description = "Malformed identifier or email", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
pub async fn update_user_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
    Json(req): Json<UserProfileRequest>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    let update = UserUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        email: EmailAddress::parse(&req.email)?,
        role: req.role,
        status: req.status,
        password_hash: None,
    };

    let outcome = state.db.update_user(&id, update).await?;
    info!("Updated user {}", id);
    Ok(Json(outcome.into()))
}

/// PUT /users/{id}/password - Replace a user's profile and password
#[utoipa::path(
    put,
    path = "/users/{id}/password",
    tag = "users",
    request_body = UserWithPasswordRequest,
    params(("id" = String, Path, description = "User identifier (24 hex digits)")),
    responses(
        (status = 200, description = "User updated", body = UpdatedResponse),
        (status = 400, description = "Malformed identifier, email or password", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
pub async fn update_user_with_password_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
    Json(req): Json<UserWithPasswordRequest>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let id = RecordId::parse(&id)?;
    let update = UserUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        email: EmailAddress::parse(&req.email)?,
        role: req.role,
        status: req.status,
        password_hash: Some(hash_password(&req.password)?),
    };

    let outcome = state.db.update_user(&id, update).await?;
    info!("Updated user {} with a new password", id);
    Ok(Json(outcome.into()))
}

/// DELETE /users/{id} - Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User identifier (24 hex digits)")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = RecordId::parse(&id)?;
    state.db.delete_user(&id).await?;
    info!("Deleted user {}", id);
    Ok(StatusCode::NO_CONTENT)
}
