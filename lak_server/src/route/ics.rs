use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use lak_core::{
    calendar::{self, ExportKind, ExportQuery},
    ical::generator::Emitter,
    schedule,
};
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
    #[serde(default, rename = "type")]
    kind: ExportKind,
    #[serde(default)]
    date: Option<String>,
}

/// Handle calendar downloads.
///
/// The export covers upcoming dates unless `date` pins a single collection
/// day; `type` selects `papier`, `karton` or `all`.
pub async fn handler(
    State(state): State<AppState>,
    Query(query_params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let street = require_street(&query_params.street)?;
    let query = ExportQuery {
        street: String::from(street),
        house_number: query_params.house_number.clone(),
        year: query_params.year.unwrap_or_else(schedule::current_year),
        kind: query_params.kind,
        date: query_params.date.clone(),
    };
    let today = calendar::today();
    let store = state.store.lock().unwrap();
    let export = calendar::export(&store, &query, &today).map_err(ApiError::internal)?;
    let Some(export) = export else {
        return Err(ApiError::not_found("Street not found"));
    };
    let response = (
        [
            (CONTENT_TYPE, String::from("text/calendar; charset=utf-8")),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.calendar.generate(),
    )
        .into_response();
    Ok(response)
}
