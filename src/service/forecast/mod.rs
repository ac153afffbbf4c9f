//! Time-series forecasting over filtered dataset aggregates.
//!
//! Layout:
//! - `arima.rs`: the ARIMA(p,d,q) fit/forecast kernel

pub mod arima;

pub use arima::{ArimaOrder, ForecastResult};

use crate::error::VaxError;

/// Fits an ARIMA model to a chronologically ordered series and produces
/// forward predictions. The optimizer is bounded by an explicit iteration
/// budget; exhausting it is a `NonConvergence` error, never an endless fit.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    max_iter: usize,
}

impl ForecastEngine {
    pub fn new(max_iter: usize) -> Self {
        Self {
            max_iter: max_iter.max(1),
        }
    }

    /// Forecast `horizon` future periods from `(period, value)` pairs.
    /// The series must be chronologically ordered with no gaps assumed.
    pub fn fit_and_forecast(
        &self,
        series: &[(i64, f64)],
        horizon: usize,
        order: ArimaOrder,
    ) -> Result<ForecastResult, VaxError> {
        let values: Vec<f64> = series.iter().map(|&(_, v)| v).collect();
        arima::fit_and_forecast(&values, horizon, order, self.max_iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ForecastEngine {
        ForecastEngine::new(500)
    }

    #[test]
    fn five_point_series_order_110_horizon_2_yields_two_finite_values() {
        let series = vec![
            (2018, 100.0),
            (2019, 120.0),
            (2020, 90.0),
            (2021, 150.0),
            (2022, 130.0),
        ];
        let result = engine()
            .fit_and_forecast(&series, 2, ArimaOrder { p: 1, d: 1, q: 0 })
            .unwrap();
        assert_eq!(result.values.len(), 2);
        assert!(result.values.iter().all(|v| v.is_finite()));
        assert_eq!(result.lower.len(), 2);
        assert_eq!(result.upper.len(), 2);
        for i in 0..2 {
            assert!(result.lower[i] <= result.values[i]);
            assert!(result.values[i] <= result.upper[i]);
        }
    }

    #[test]
    fn single_point_series_is_insufficient_for_order_110() {
        let err = engine()
            .fit_and_forecast(&[(2018, 100.0)], 2, ArimaOrder { p: 1, d: 1, q: 0 })
            .unwrap_err();
        assert!(matches!(
            err,
            VaxError::InsufficientData {
                required: 3,
                actual: 1
            }
        ));
    }

    #[test]
    fn random_walk_with_drift_extrapolates_the_trend() {
        // (0,1,0): the differenced series is white noise around the drift,
        // so forecasts advance by the mean step.
        let series: Vec<(i64, f64)> = (0..5).map(|i| (2018 + i, 10.0 * (i + 1) as f64)).collect();
        let result = engine()
            .fit_and_forecast(&series, 2, ArimaOrder { p: 0, d: 1, q: 0 })
            .unwrap();
        assert!((result.values[0] - 60.0).abs() < 1e-9);
        assert!((result.values[1] - 70.0).abs() < 1e-9);
    }

    #[test]
    fn zero_horizon_returns_empty_forecast() {
        let series = vec![(2018, 1.0), (2019, 2.0), (2020, 3.0), (2021, 4.0)];
        let result = engine()
            .fit_and_forecast(&series, 0, ArimaOrder { p: 1, d: 0, q: 0 })
            .unwrap();
        assert!(result.values.is_empty());
        assert!(result.lower.is_empty());
        assert!(result.upper.is_empty());
    }

    #[test]
    fn bounds_widen_with_the_horizon() {
        let series: Vec<(i64, f64)> = (0..12)
            .map(|i| (2010 + i, 50.0 + ((i * 7) % 13) as f64))
            .collect();
        let result = engine()
            .fit_and_forecast(&series, 4, ArimaOrder { p: 1, d: 1, q: 0 })
            .unwrap();
        let widths: Vec<f64> = result
            .upper
            .iter()
            .zip(&result.lower)
            .map(|(u, l)| u - l)
            .collect();
        for pair in widths.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-9);
        }
    }
}
