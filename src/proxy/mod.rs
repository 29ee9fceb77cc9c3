// Public API - what other modules can use
pub use handlers::{health, list_accounts, list_orders, login, logout, not_found, place_order};
pub use service::{LoginOutcome, ProxyService};

// Internal modules
mod audit;
mod handlers;
mod service;
pub mod types;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::session::require_session;
use crate::shared::AppState;

/// Path prefix for every proxied endpoint
pub const API_PREFIX: &str = "/api/tradovate-proxy";

/// Builds the full HTTP surface. Account and order routes sit behind the
/// session cookie middleware; login, logout and health do not.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/accounts", get(list_accounts))
        .route("/orders", post(place_order).get(list_orders))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let api = Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
