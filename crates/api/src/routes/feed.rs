use axum::routing::get;
use axum::Router;

use crate::handlers::feed;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/feed", get(feed::get_feed))
}
