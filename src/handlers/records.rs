use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::db::models::FilterCriteria;
use crate::middleware::RequireSession;
use crate::{VaxError, router::VaxState};

/// GET /records -> full raw-data preview, session-gated.
pub async fn all_records(
    State(state): State<VaxState>,
    RequireSession(_session): RequireSession,
) -> Result<impl IntoResponse, VaxError> {
    let records = state.datasets.all_records().await?;
    Ok(Json(records))
}

/// GET /filters/states -> distinct state values.
pub async fn states(
    State(state): State<VaxState>,
    RequireSession(_session): RequireSession,
) -> Result<impl IntoResponse, VaxError> {
    Ok(Json(state.datasets.states().await?))
}

#[derive(Debug, Deserialize)]
pub struct CitiesQuery {
    pub state: String,
}

/// GET /filters/cities?state=.. -> distinct city values within one state.
pub async fn cities(
    State(state): State<VaxState>,
    RequireSession(_session): RequireSession,
    Query(query): Query<CitiesQuery>,
) -> Result<impl IntoResponse, VaxError> {
    Ok(Json(state.datasets.cities(&query.state).await?))
}

/// GET /filters/vaccines -> distinct vaccine descriptions.
pub async fn vaccine_descriptions(
    State(state): State<VaxState>,
    RequireSession(_session): RequireSession,
) -> Result<impl IntoResponse, VaxError> {
    Ok(Json(state.datasets.vaccine_descriptions().await?))
}

/// POST /records/filter -> records matching the supplied criteria.
/// An empty match is a valid (empty) response.
pub async fn filter(
    State(state): State<VaxState>,
    RequireSession(_session): RequireSession,
    Json(criteria): Json<FilterCriteria>,
) -> Result<impl IntoResponse, VaxError> {
    let records = state.datasets.filter(&criteria).await?;
    Ok(Json(records))
}
