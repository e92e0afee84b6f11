pub mod endpoints;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/endpoints/new",
            get(endpoints::new_page).post(endpoints::new_submit),
        )
        .route(
            "/endpoints/setup",
            get(endpoints::setup_page).post(endpoints::setup_submit),
        )
        .route(
            "/endpoints/{id}/edit",
            get(endpoints::edit_page).post(endpoints::edit_submit),
        )
}
