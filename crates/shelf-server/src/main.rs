mod api;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use shelf_catalog::{CatalogClient, RecommenderClient};
use shelf_core::AppConfig;
use shelf_recommend::{Cascade, CascadeConfig, CatalogSources, Shelf, TierPolicy};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(shelf_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = shelf_store::PoolConfig::from_app_config(&config);
    let pool = shelf_store::connect_pool(&config.database_url, pool_config).await?;
    shelf_store::run_migrations(&pool).await?;

    let external = CatalogClient::new(
        &config.external_base_url,
        config.catalog_timeout_secs,
        &config.user_agent,
        config.catalog_max_retries,
        config.catalog_backoff_base_ms,
    )?;
    let remote = match &config.recommender_base_url {
        Some(base_url) => Some(RecommenderClient::new(
            base_url,
            config.recommender_timeout_secs,
            &config.user_agent,
        )?),
        None => None,
    };

    let sources = CatalogSources::new(pool.clone(), external, config.external_page_limit);
    let cascade = Cascade::new(sources, remote, cascade_config(&config));
    let shelf = Arc::new(Shelf::new(pool, cascade, config.recommend_limit));

    let app = build_app(AppState { shelf });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn cascade_config(config: &AppConfig) -> CascadeConfig {
    let defaults = CascadeConfig::default();
    CascadeConfig {
        remote: TierPolicy {
            timeout: Duration::from_secs(config.recommender_timeout_secs),
            max_attempts: config.recommender_max_attempts,
            backoff_base_ms: config.recommender_backoff_base_ms,
        },
        local_full: TierPolicy {
            timeout: Duration::from_secs(config.catalog_timeout_secs),
            ..defaults.local_full
        },
        local_external: defaults.local_external,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
