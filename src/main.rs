use document_stitcher::{
    config::{database, server::ServerConfig, statuses},
    core::{generator::BusinessDocumentGenerator, status, token::InMemoryTokenStore},
    errors::Result,
    web::{AppState, create_router},
};
use dotenvy::dotenv;
use std::{path::Path, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    let server_config = ServerConfig::from_env();
    info!("Loaded server configuration: {:?}", server_config);

    // 3. Connect and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 4. Seed document statuses from config.toml (optional)
    if Path::new(&server_config.status_config_path).exists() {
        let config = statuses::load_config(&server_config.status_config_path)
            .inspect_err(|e| error!("Invalid status configuration: {}", e))?;
        status::seed_statuses(&db, &config.statuses).await?;
    } else {
        warn!(
            "Status configuration {} not found, skipping seeding",
            server_config.status_config_path
        );
    }

    // 5. Serve
    let state = AppState::new(
        db,
        Arc::new(InMemoryTokenStore::new()),
        Arc::new(BusinessDocumentGenerator),
    );
    let listener = tokio::net::TcpListener::bind(&server_config.bind_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", server_config.bind_address, e))?;
    info!("Listening on {}", server_config.bind_address);
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
