use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, page};
use super::AppState;

/// Creates the main router: the page at `/` and its JSON mirror under `/api`
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(page::index).post(page::submit_form))
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Form events under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/file", post(handlers::select_file))
        .route("/top-k", put(handlers::set_top_k))
        .route("/submit", post(handlers::submit))
}
