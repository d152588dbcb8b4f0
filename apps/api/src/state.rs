use redis::aio::MultiplexedConnection;
use sqlx::PgPool;

use crate::ai_client::AiClient;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Session store connection. Clones share one multiplexed pipe.
    pub redis: MultiplexedConnection,
    pub ai: AiClient,
    pub config: Config,
}
