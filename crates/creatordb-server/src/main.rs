mod api;
mod middleware;
mod proxy;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use creatordb_ai::{AnalysisOptions, AnthropicClient};
use creatordb_apify::ApifyClient;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
    proxy::ImageProxy,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = creatordb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = creatordb_db::PoolConfig::from_app_config(&config);
    let pool = creatordb_db::connect_pool(&config.database_url, pool_config).await?;
    creatordb_db::run_migrations(&pool).await?;

    // External clients are constructed once here and shared by reference;
    // credentials were already validated by config loading.
    let apify = Arc::new(ApifyClient::new(
        &config.apify_token,
        config.scrape_timeout_secs,
    )?);
    let anthropic = Arc::new(AnthropicClient::new(&config.anthropic_api_key)?);
    let image_proxy = Arc::new(ImageProxy::new(config.image_proxy_timeout_secs)?);

    let analysis_options = AnalysisOptions {
        freshness_days: config.analysis_freshness_days,
        post_cap: config.analysis_post_cap,
        model: config.ai_model.clone(),
        max_tokens: config.ai_max_tokens,
    };

    let auth = AuthState::from_env(matches!(
        config.env,
        creatordb_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            pool,
            apify,
            anthropic,
            image_proxy,
            analysis_options,
        },
        auth,
        default_rate_limit_state(),
    );

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting creatordb server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
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
