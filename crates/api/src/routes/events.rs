use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{events, social};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(events::create_event).get(events::list_public_events))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/{id}/like", post(social::toggle_like))
        .route(
            "/{id}/comments",
            post(social::add_comment).get(social::list_comments),
        )
        .route("/{id}/share", post(social::share_event))
}
