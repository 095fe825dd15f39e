//! HTTP front door
//!
//! Serves a welcome string on `/` and the stored listing on `/generate/`,
//! crawling first when the store does not exist yet.

mod routes;

pub use routes::{create_app, AppState, WELCOME_MESSAGE};

use crate::config::Config;
use crate::storage::Store;
use crate::CrawlerError;
use std::sync::Arc;

/// Binds the configured address and serves until the process exits
pub async fn start_server(config: Config, store: Arc<dyn Store>) -> Result<(), CrawlerError> {
    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Listing: http://localhost:{}/generate/", config.server.port);

    let app = create_app(AppState::new(config, store));
    axum::serve(listener, app)
        .await
        .map_err(|e| CrawlerError::Server(e.to_string()))?;

    Ok(())
}
