//! # HR Desk API Server
//!
//! REST API for keeping HR records: users with bearer tokens, companies
//! with logos and employees with profile pictures.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Initialize logging (`LOG_FORMAT=json` for JSON lines)
//! 3. Connect to PostgreSQL and apply pending migrations
//! 4. Create the image directory
//! 5. Serve until Ctrl-C, then drain connections and close the pool
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/hrdesk cargo run -p hrdesk-api
//! ```

use hrdesk_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use hrdesk_shared::{
    assets::LocalContentStore,
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "hrdesk_api=debug,hrdesk_shared=debug,tower_http=debug";

fn init_tracing(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    );

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires; a listener that fails to install never resolves
async fn wait_for_signal(signal: impl std::future::Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received, draining connections...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.logging.format);

    tracing::info!("HR Desk API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut db_config = DatabaseConfig::new(config.database.url.clone());
    db_config.max_connections = config.database.max_connections;
    let pool = create_pool(db_config).await?;

    run_migrations(&pool).await?;

    LocalContentStore::new(config.storage.public_dir.clone())
        .ensure_root()
        .await?;
    tracing::info!(dir = %config.storage.public_dir.display(), "Image storage ready");

    let address = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}
