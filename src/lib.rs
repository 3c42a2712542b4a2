use std::sync::Arc;

use auth::AuthSession;
use client::DataClient;
use config::Config;
use tokio::sync::RwLock;

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod result;
pub mod router;
pub mod routes;
pub mod utils;

/// Shared by every handler. The session lock serializes login, logout and
/// restore; readers that find it taken report the shell as loading.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<AuthSession>>,
    pub client: Arc<dyn DataClient>,
    pub config: Config,
}

impl AppState {
    pub fn new(session: AuthSession, client: Arc<dyn DataClient>, config: Config) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            client,
            config,
        }
    }
}
