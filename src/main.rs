use std::sync::Arc;

use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_recs::{
    config::Config,
    db::{self, PgUserStore},
    routes::{create_router, AppState},
    services::{EngineSettings, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (state, pool) = match connect(&config).await {
        Ok((state, pool)) => (state, Some(pool)),
        Err(e) => {
            tracing::error!(error = %e, "Starting in degraded mode; recommendation requests will fail");
            (AppState::degraded(), None)
        }
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    Ok(())
}

/// Opens the store and provider; any failure leaves the server degraded
async fn connect(config: &Config) -> anyhow::Result<(AppState, PgPool)> {
    let api_key = config.require_tmdb_api_key()?.to_string();
    let database_url = config.require_database_url()?;

    let pool = db::create_pool(database_url, config.database_max_connections).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    let provider = TmdbProvider::new(
        api_key,
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
    );
    let settings = EngineSettings {
        candidate_page_count: config.candidate_page_count,
        top_n: config.top_n,
    };

    let state = AppState::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(provider),
        settings,
    );

    Ok((state, pool))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
