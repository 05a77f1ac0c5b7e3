use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", put(users::update_me))
        .route("/me/sessions", delete(users::revoke_all_sessions))
        .route("/{handle}", get(users::get_profile))
        .route(
            "/{handle}/follow",
            post(users::follow).delete(users::unfollow),
        )
        .route("/{handle}/events", get(users::list_events))
        .route("/{handle}/tagged", get(users::list_tagged_events))
}
