//! Route definitions for automation rule management.

use axum::routing::get;
use axum::Router;

use crate::handlers::sons;
use crate::state::AppState;

/// Son routes mounted at `/sons`.
///
/// ```text
/// GET    /        -> list_sons
/// POST   /        -> create_son
/// GET    /{id}    -> get_son
/// PUT    /{id}    -> update_son
/// DELETE /{id}    -> delete_son
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sons::list_sons).post(sons::create_son))
        .route(
            "/{id}",
            get(sons::get_son)
                .put(sons::update_son)
                .delete(sons::delete_son),
        )
}
