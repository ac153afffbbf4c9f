use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::db::models::FilterCriteria;
use crate::middleware::RequireSession;
use crate::service::{ArimaOrder, ForecastResult};
use crate::{VaxError, router::VaxState};

/// The default order; the one the dashboard's trend view exercises.
const DEFAULT_ORDER: ArimaOrder = ArimaOrder { p: 1, d: 1, q: 0 };

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub state: String,
    pub city: String,
    pub vaccine_descriptions: BTreeSet<String>,
    pub horizon: usize,
    #[serde(default)]
    pub order: Option<ArimaOrder>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    /// The observed yearly series the model was fit on.
    pub series: Vec<(i64, f64)>,
    pub order: ArimaOrder,
    pub horizon: usize,
    pub forecast: ForecastResult,
}

/// POST /forecast -> fits an ARIMA model to the yearly vaccinated counts
/// for the filtered selection and predicts `horizon` future periods.
pub async fn forecast(
    State(state): State<VaxState>,
    RequireSession(_session): RequireSession,
    Json(req): Json<ForecastRequest>,
) -> Result<impl IntoResponse, VaxError> {
    let criteria = FilterCriteria {
        state: req.state,
        city: req.city,
        vaccine_descriptions: req.vaccine_descriptions,
    };
    let series = state.datasets.yearly_vaccinated_counts(&criteria).await?;

    let order = req.order.unwrap_or(DEFAULT_ORDER);
    let forecast = state.forecast.fit_and_forecast(&series, req.horizon, order)?;

    Ok(Json(ForecastResponse {
        series,
        order,
        horizon: req.horizon,
        forecast,
    }))
}
