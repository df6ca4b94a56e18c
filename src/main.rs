//! OAuth Login Portal
//!
//! Delegates login to a third-party identity provider, records
//! authenticated users, and serves a session-gated landing flow.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oauth_portal::{
    routes, AppState, Config, GoogleProvider, InMemorySessionStore, InMemoryUserStore,
    ProviderConfig, SqliteStore, UserStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oauth_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(port = config.port, callback = %config.callback_url, "Loaded configuration");

    // Select the user store
    match config.database_path.clone() {
        Some(path) => {
            let store = SqliteStore::open(&path)?;
            tracing::info!(%path, "Using SQLite user store");
            serve(config, store).await
        }
        None => {
            tracing::info!("No DATABASE_PATH set; user records are kept in memory");
            serve(config, InMemoryUserStore::new()).await
        }
    }
}

async fn serve<U: UserStore + 'static>(config: Config, user_store: U) -> Result<()> {
    let provider = GoogleProvider::new(ProviderConfig::new(
        config.client_id.clone(),
        config.client_secret.clone(),
        config.callback_url.clone(),
    ));

    let state = Arc::new(AppState::new(
        provider,
        user_store,
        InMemorySessionStore::new(),
        &config.session_secret,
    ));

    let app = routes::create_router_with_static_path(state, &config.static_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Portal listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
