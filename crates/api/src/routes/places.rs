use axum::routing::get;
use axum::Router;

use crate::handlers::places;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/autocomplete", get(places::autocomplete))
        .route("/{place_id}", get(places::resolve))
}
