//! services/api/src/bin/admin.rs

use api_lib::{
    adapters::{DbAdapter, SmtpMailAdapter},
    config::{Config, MailConfig},
    error::ApiError,
    web::{
        admin_router,
        server::{build_app, init_tracing, serve},
        AdminApiDoc, AdminState,
    },
};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env("0.0.0.0:8000")?;
    init_tracing(config.log_level);
    let mail_config = MailConfig::from_env()?;
    info!("Configuration loaded. Starting admin service...");

    // --- 2. Connect to the Document Store ---
    info!("Connecting to database '{}'...", config.database_name);
    let db_adapter = DbAdapter::connect(&config.mongodb_uri, &config.database_name).await?;
    db_adapter.ping().await?;
    info!("Database reachable.");

    // --- 3. Initialize the Mail Transport ---
    let mail_adapter = SmtpMailAdapter::new(&mail_config)?;
    info!(
        "Mail transport ready: {}:{} as {}",
        mail_config.smtp_host, mail_config.smtp_port, mail_config.mail_from
    );

    // --- 4. Build the Shared State and Router ---
    let state = Arc::new(AdminState {
        db: Arc::new(db_adapter),
        mailer: Arc::new(mail_adapter),
    });
    let app = build_app(admin_router(state), AdminApiDoc::openapi(), &config)?;

    // --- 5. Start the Server ---
    serve(app, config.bind_address).await
}
