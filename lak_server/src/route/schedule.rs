use axum::{
    extract::{Query, State},
    Json,
};
use lak_core::schedule::{self, ScheduleResult};
use serde::Deserialize;

use crate::route::{require_street, ApiError};
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    street: Option<String>,
    #[serde(default, rename = "houseNumber")]
    house_number: Option<String>,
    #[serde(default)]
    year: Option<i32>,
}

/// Handle schedule lookups.
///
/// `street` is required; `houseNumber` refines the directory resolution and
/// `year` defaults to the current calendar year.
pub async fn handler(
    State(state): State<AppState>,
    Query(query_params): Query<QueryParams>,
) -> Result<Json<ScheduleResult>, ApiError> {
    let street = require_street(&query_params.street)?;
    let year = query_params.year.unwrap_or_else(schedule::current_year);
    let store = state.store.lock().unwrap();
    let result = schedule::lookup(&store, street, query_params.house_number.as_deref(), year)
        .map_err(ApiError::internal)?;
    match result {
        Some(result) => Ok(Json(result)),
        None => Err(ApiError::not_found("Street not found")),
    }
}
