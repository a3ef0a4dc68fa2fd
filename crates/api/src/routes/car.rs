//! Route definitions for the car resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::car;
use crate::state::AppState;

/// Collection routes are plural, single-record routes singular.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(car::index))
        .route("/cars/search", get(car::search))
        .route("/car", post(car::create))
        .route(
            "/car/{id}",
            get(car::show)
                .put(car::replace)
                .patch(car::patch)
                .delete(car::delete),
        )
}
