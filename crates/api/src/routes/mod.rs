pub mod car;
pub mod health;

use axum::Router;

use crate::handlers::fallback;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// GET    /cars              list live cars
/// GET    /cars/search       filtered list
/// POST   /car               create
/// GET    /car/{id}          show
/// PUT    /car/{id}          full replace
/// PATCH  /car/{id}          partial update
/// DELETE /car/{id}          soft delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(car::router())
        .method_not_allowed_fallback(fallback::method_not_allowed)
}
