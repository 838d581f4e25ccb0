//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are rendered by
//! the domain crates through `kernel::error::AppError`.

mod app;
mod config;

use auth::PgUserRepository;
use catalog::{CatalogAppState, HttpAssetFetcher, PgCatalogRepository};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let catalog_config = config.catalog_config();
    let fetcher = HttpAssetFetcher::new(&catalog_config)?;
    tracing::info!(
        images_dir = %catalog_config.images_dir.display(),
        fetch_timeout_secs = catalog_config.fetch_timeout.as_secs(),
        "Image storage configured"
    );

    let catalog = CatalogAppState::new(
        PgCatalogRepository::new(pool.clone()),
        fetcher,
        catalog_config,
    );

    let app = app::build_router(
        PgUserRepository::new(pool),
        config.auth_config(),
        catalog,
        &config.images_dir,
    );

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
