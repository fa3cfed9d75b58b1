//! HTTP application wiring.
//!
//! - `routes/`: handlers, one file per area
//! - `errors.rs`: consistent JSON error responses

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use astexo_auth::Environment;

use crate::config::EdgeConfig;
use crate::middleware;

pub mod errors;
pub mod routes;

/// Shared handler state.
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub environment: Environment,
}

/// Build the full router (used by `main.rs` and the black-box tests).
pub fn build_app(config: &EdgeConfig) -> Router {
    let state = AppState {
        environment: config.environment,
    };

    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/actions/auth-cookie",
            post(routes::actions::set_auth_cookie).delete(routes::actions::delete_auth_cookie),
        )
        .route("/", get(routes::pages::shell))
        .route("/admin", get(routes::pages::shell))
        .route("/admin/*rest", get(routes::pages::shell))
        .route("/client", get(routes::pages::shell))
        .route("/client/*rest", get(routes::pages::shell))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::route_guard)))
}
