//! # ItemHub API Server
//!
//! Serves user registration, item management and user deactivation over
//! HTTP, authenticated with per-user API tokens.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/itemhub cargo run -p itemhub-api
//! ```

use itemhub_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use itemhub_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    tracing::info!("ItemHub API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let db = pool::create_pool(config.pool_config()).await?;

    if config.database.run_migrations {
        migrations::run_migrations(&db).await?;
    }

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "itemhub_api=debug,itemhub_shared=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
