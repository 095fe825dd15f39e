use crate::config::Config;
use crate::crawler::regenerate_store;
use crate::output::render_listing;
use crate::storage::Store;
use axum::{extract::State, routing::get, Router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Body of `GET /`
pub const WELCOME_MESSAGE: &str = "Welcome to Real Estate Property Listings";

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn Store>,
    /// Serializes regeneration so concurrent requests crawl at most once
    generate_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            generate_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build the axum router
///
/// Unknown paths get the welcome string, like `/`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/generate", get(generate_handler))
        .route("/generate/", get(generate_handler))
        .fallback(home_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home_handler() -> &'static str {
    WELCOME_MESSAGE
}

/// Regenerates the store if it is absent, then serves its contents
///
/// Failures are logged and an empty listing is served instead; the
/// listener is never torn down by a failed crawl.
async fn generate_handler(State(state): State<AppState>) -> String {
    {
        let _guard = state.generate_lock.lock().await;
        if !state.store.exists() {
            tracing::info!("Generating store at {}", state.store.path().display());
            if let Err(e) = regenerate_store(state.config.as_ref().clone(), state.store.as_ref()).await
            {
                tracing::error!("Failed to generate store: {}", e);
            }
        }
    }

    let contents = match state.store.read_raw() {
        Ok(contents) => contents,
        Err(e) => {
            tracing::error!("Unable to read store: {}", e);
            String::new()
        }
    };

    render_listing(&contents)
}
