pub mod access;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod routes;
pub mod state;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::access::PermissionCheck;
use crate::config::Config;
use crate::gateway::EndpointGateway;
use crate::state::{AppState, SharedState};

pub fn build_app(
    config: Config,
    gateway: Arc<dyn EndpointGateway>,
    permissions: Arc<dyn PermissionCheck>,
) -> Router {
    let state: SharedState = Arc::new(AppState {
        config,
        gateway,
        permissions,
    });

    Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes())
        .route("/health", axum::routing::get(health))
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
