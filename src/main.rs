use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use crm_access::{
    AppState,
    auth::{AuthSession, BcryptCredentials, CredentialVerifier, DemoCredentials},
    cache::{FileTokenStore, MemoryTokenStore, RedisTokenStore, TokenStore},
    client::{DataClient, HttpClient, MemoryClient},
    config::{Config, CredentialMode, DataBackend, TokenStoreKind},
    router::create_router,
};
#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let client: Arc<dyn DataClient> = match config.data_backend {
        DataBackend::Memory => {
            tracing::info!("using in-memory data with the demo tenant");
            Arc::new(MemoryClient::with_demo_data())
        }
        DataBackend::Http => {
            let url = config.data_api_url.as_deref().unwrap_or_default();
            tracing::info!("using data backend at {}", url);
            Arc::new(HttpClient::new(url, config.data_api_key.clone()))
        }
    };

    tracing::info!("data backend: {}", client.backend_name());

    let tokens: Arc<dyn TokenStore> = match config.token_store {
        TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        TokenStoreKind::File => {
            let store = FileTokenStore::new(config.token_file.clone());
            tracing::info!("session token file: {}", store.path().display());
            Arc::new(store)
        }
        TokenStoreKind::Redis => {
            let url = config.redis_url.clone().unwrap_or_default();
            let redis = Arc::new(redis::Client::open(url)?);
            let store = RedisTokenStore::new(redis, config.session_ttl_secs);
            tracing::info!("session token key in redis: {}", store.key());
            Arc::new(store)
        }
    };

    let credentials: Arc<dyn CredentialVerifier> = match config.credential_mode {
        CredentialMode::Demo => {
            tracing::warn!("demo credentials enabled; do not use with real accounts");
            Arc::new(DemoCredentials::default())
        }
        CredentialMode::Bcrypt => Arc::new(BcryptCredentials),
    };

    let session = AuthSession::new(
        client.clone(),
        tokens,
        credentials,
        config.session_ttl(),
        &config.user_agent,
    );
    let state = AppState::new(session, client, config.clone());

    // Restore holds the write lock; requests see the shell as loading until it settles.
    let mut restore_guard = state.session.clone().write_owned().await;
    tokio::spawn(async move {
        let status = restore_guard.restore_session().await;
        tracing::info!("session restore finished: {:?}", status);
    });

    let router = create_router(state);

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid SERVER_HOST, falling back to 127.0.0.1");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
