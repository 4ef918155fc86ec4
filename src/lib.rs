pub mod api;
pub mod config;
pub mod crypto;
pub mod dashboard;
pub mod db;
pub mod models;
pub mod monitoring;
pub mod prediction;
pub mod session_store;
pub mod transplants;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiContext, ServerError};
use crate::config::{ConfigError, ServerConfig};
use crate::db::seed::SeedError;
use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Seeding failed: {0}")]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load configuration, prepare the database and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServerConfig::from_env()?;
    tracing::info!(db_path = %config.db_path.display(), production = config.production, "Configuration loaded");

    {
        let conn = db::open_database(&config.db_path)?;
        if config.seed_demo_data {
            let today = chrono::Utc::now().date_naive();
            let report = db::seed::seed_demo_data(&conn, today, crypto::PBKDF2_ITERATIONS)?;
            tracing::info!(?report, "Demo data seeded");
        }
    }

    let ctx = ApiContext::from_config(&config);
    let server = api::start_api_server(ctx, config.bind_addr, config.static_dir.clone()).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    tokio::signal::ctrl_c().await.map_err(StartupError::Signal)?;
    tracing::info!("Shutdown requested");
    server.stop().await;

    Ok(())
}
