//! Prefix search over handles, event tags, and locations.
//!
//! Requests may carry a client-side `seq` number that is echoed back
//! unchanged, so a client typing quickly can discard responses that
//! arrive out of order instead of rendering stale results.

use axum::extract::{Query, State};
use axum::Json;
use gatherly_core::search::{
    escape_like, normalize_prefix, Suggestion, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT,
    SUGGEST_LIMIT,
};
use gatherly_db::repositories::SearchRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<i64>,
    /// Client request sequence number, echoed back verbatim.
    pub seq: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub seq: Option<i64>,
    pub results: Vec<Suggestion>,
}

/// `GET /search`
pub async fn search(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<SearchResponse>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);
    run_search(&state, params, limit).await
}

/// `GET /search/suggest`
///
/// The typeahead variant: a smaller fixed limit, same shape.
pub async fn suggest(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<SearchResponse>>> {
    run_search(&state, params, SUGGEST_LIMIT).await
}

async fn run_search(
    state: &AppState,
    params: SearchParams,
    limit: i64,
) -> AppResult<Json<DataResponse<SearchResponse>>> {
    let results = match normalize_prefix(&params.q) {
        Some(term) => SearchRepo::suggest(&state.pool, &escape_like(&term), limit).await?,
        // A blank or sigil-only query has nothing to match; return an
        // empty result set rather than an error so the client can simply
        // clear its dropdown.
        None => Vec::new(),
    };

    Ok(Json(DataResponse {
        data: SearchResponse {
            query: params.q,
            seq: params.seq,
            results,
        },
    }))
}
