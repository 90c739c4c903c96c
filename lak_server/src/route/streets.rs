use axum::{
    extract::{Query, State},
    Json,
};
use lak_core::model::Street;
use serde::Deserialize;

use crate::route::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    locality: Option<String>,
}

/// List all street records, name ascending, optionally restricted to one
/// locality.
pub async fn handler(
    State(state): State<AppState>,
    Query(query_params): Query<QueryParams>,
) -> Result<Json<Vec<Street>>, ApiError> {
    let store = state.store.lock().unwrap();
    let streets = store
        .streets(query_params.locality.as_deref())
        .map_err(ApiError::internal)?;
    Ok(Json(streets))
}
