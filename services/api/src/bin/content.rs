//! services/api/src/bin/content.rs

use api_lib::{
    adapters::DbAdapter,
    config::Config,
    error::ApiError,
    web::{
        content_router,
        server::{build_app, init_tracing, serve},
        ContentApiDoc, ContentState,
    },
};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Config::from_env("0.0.0.0:8001")?;
    init_tracing(config.log_level);
    info!("Configuration loaded. Starting content service...");

    info!("Connecting to database '{}'...", config.database_name);
    let db_adapter = DbAdapter::connect(&config.mongodb_uri, &config.database_name).await?;
    db_adapter.ping().await?;
    info!("Database reachable.");

    let state = Arc::new(ContentState {
        db: Arc::new(db_adapter),
    });
    let app = build_app(content_router(state), ContentApiDoc::openapi(), &config)?;

    serve(app, config.bind_address).await
}
