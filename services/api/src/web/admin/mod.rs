//! services/api/src/web/admin/mod.rs
//!
//! The admin service: user management, the subscriber list, and bulk email.

pub mod bulk_mail;
pub mod emails;
pub mod sent_emails;
pub mod users;

use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::web::responses::{
    CreatedResponse, SendEmailRequest, SentEmailResponse, SubscribeRequest, SubscriberResponse,
    UpdatedResponse, UserProfileRequest, UserResponse, UserWithPasswordRequest,
};
use crate::web::state::AdminState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        users::list_active_users_handler,
        users::list_suspended_users_handler,
        users::create_user_handler,
        users::get_user_handler,
        users::find_users_by_email_handler,
        users::update_user_handler,
        users::update_user_with_password_handler,
        users::delete_user_handler,
        emails::list_emails_handler,
        emails::register_email_handler,
        emails::get_email_handler,
        emails::delete_email_handler,
        sent_emails::list_sent_emails_handler,
        sent_emails::send_email_handler,
        sent_emails::get_sent_email_handler,
    ),
    components(
        schemas(
            CreatedResponse,
            UpdatedResponse,
            ErrorResponse,
            UserResponse,
            UserProfileRequest,
            UserWithPasswordRequest,
            SubscribeRequest,
            SubscriberResponse,
            SendEmailRequest,
            SentEmailResponse,
        )
    ),
    tags(
        (name = "users", description = "Back-office user management."),
        (name = "emails", description = "Newsletter subscriber list."),
        (name = "sent_emails", description = "Bulk email dispatch and history.")
    )
)]
pub struct AdminApiDoc;

//=========================================================================================
// Router
//=========================================================================================

pub fn router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route(
            "/users",
            get(users::list_active_users_handler).post(users::create_user_handler),
        )
        .route("/users/suspended", get(users::list_suspended_users_handler))
        .route("/users/email/{email}", get(users::find_users_by_email_handler))
        .route(
            "/users/{id}",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/users/{id}/password",
            put(users::update_user_with_password_handler),
        )
        .route(
            "/emails",
            get(emails::list_emails_handler).post(emails::register_email_handler),
        )
        .route(
            "/emails/{id}",
            get(emails::get_email_handler).delete(emails::delete_email_handler),
        )
        .route(
            "/sent_emails",
            get(sent_emails::list_sent_emails_handler).post(sent_emails::send_email_handler),
        )
        .route("/sent_emails/{id}", get(sent_emails::get_sent_email_handler))
        .with_state(state)
}
