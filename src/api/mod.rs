use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::composer::Composer;
use crate::config::Config;
use crate::search_client::SearchClient;

pub mod error;
pub mod handlers;
pub mod models;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<dyn SearchClient>,
    pub config: Arc<Config>,
    pub composer: Composer,
}

impl AppState {
    pub fn new(search: Arc<dyn SearchClient>, config: Config) -> Self {
        Self {
            composer: Composer::new(config.max_card_bytes),
            search,
            config: Arc::new(config),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // chat webhook; GET is only for debug requests
        .route(
            "/",
            get(handlers::debug_handler)
                .post(handlers::event_handler)
                .fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health_handler))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
