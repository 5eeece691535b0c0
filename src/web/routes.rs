//! Web route configuration.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use super::handlers;
use super::state::AppState;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Create the router with all routes.
pub fn web_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .merge(compute_routes())
        .merge(storage_routes())
        .merge(dns_routes())
        .with_state(state)
}

fn compute_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/compute", get(handlers::compute_page))
        .route("/compute/launch", post(handlers::launch_instance))
        .route("/compute/:id/start", post(handlers::start_instance))
        .route("/compute/:id/stop", post(handlers::stop_instance))
        .route("/compute/:id/terminate", post(handlers::terminate_instance))
}

fn storage_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/storage", get(handlers::storage_page))
        .route("/storage/buckets", post(handlers::create_bucket))
        .route(
            "/storage/upload",
            post(handlers::upload_object).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

fn dns_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dns", get(handlers::dns_page))
        .route("/dns/zones", post(handlers::create_zone))
        .route("/dns/records", post(handlers::add_record))
        .route("/dns/records/delete", post(handlers::delete_record))
}
