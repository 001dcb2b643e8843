use super::{handlers, state::AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/filter", post(handlers::filter_handler))
        .route("/filter/explain", post(handlers::explain_handler))
        .route("/cache", delete(handlers::clear_cache_handler))
        .route("/directory", get(handlers::directory_status_handler))
        .route(
            "/directory/refresh",
            post(handlers::refresh_directory_handler),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
