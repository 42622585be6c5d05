//! services/api/src/web/state.rs
//!
//! Defines the shared state handed to every handler of each service.

use portal_core::ports::{DatabaseService, MailService};
use std::sync::Arc;

/// State of the admin service, created once at startup.
#[derive(Clone)]
pub struct AdminState {
    pub db: Arc<dyn DatabaseService>,
    pub mailer: Arc<dyn MailService>,
}

/// State of the public content service, created once at startup.
#[derive(Clone)]
pub struct ContentState {
    pub db: Arc<dyn DatabaseService>,
}
