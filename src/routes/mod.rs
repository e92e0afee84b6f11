pub mod endpoint_form;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/v1/endpoint-form/submit", post(endpoint_form::submit))
        .route(
            "/api/v1/endpoint-form/required-fields",
            post(endpoint_form::required),
        )
        .route("/api/v1/endpoint-form/{id}", get(endpoint_form::details))
}
