//! Location autocomplete and place resolution, proxied through the
//! external places API.
//!
//! Like search, responses echo the client's `seq` number so out-of-order
//! autocomplete responses can be discarded.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::places::{PlaceCandidate, PlaceLocation};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    #[serde(default)]
    pub q: String,
    /// Client request sequence number, echoed back verbatim.
    pub seq: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub seq: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub query: String,
    pub seq: Option<i64>,
    pub candidates: Vec<PlaceCandidate>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub seq: Option<i64>,
    pub place: PlaceLocation,
}

/// `GET /places/autocomplete`
pub async fn autocomplete(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> AppResult<Json<DataResponse<AutocompleteResponse>>> {
    let query = params.q.trim().to_string();

    let candidates = if query.is_empty() {
        Vec::new()
    } else {
        state
            .places
            .autocomplete(&query)
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?
    };

    Ok(Json(DataResponse {
        data: AutocompleteResponse {
            query,
            seq: params.seq,
            candidates,
        },
    }))
}

/// `GET /places/{place_id}`
pub async fn resolve(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(place_id): Path<String>,
    Query(params): Query<ResolveParams>,
) -> AppResult<Json<DataResponse<ResolveResponse>>> {
    let place = state
        .places
        .resolve(&place_id)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(DataResponse {
        data: ResolveResponse {
            seq: params.seq,
            place,
        },
    }))
}
