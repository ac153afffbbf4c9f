//! ARIMA(p,d,q) fit and forecast by conditional least squares.
//!
//! Estimation follows Hannan–Rissanen: a long autoregression supplies
//! residual proxies, then one regression on lagged values and lagged
//! residuals gives the AR/MA coefficients, refined iteratively within the
//! caller's iteration budget. Pure AR models reduce to a single ordinary
//! least squares solve. Forecast variance comes from the psi weights of the
//! full (differencing included) lag polynomial.

use crate::error::VaxError;
use serde::{Deserialize, Serialize};

const CONVERGENCE_TOL: f64 = 1e-6;
const PIVOT_EPS: f64 = 1e-10;
const Z_95: f64 = 1.959_963_984_540_054;

/// Model order (p, d, q).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    /// Practical minimum number of observations for this order.
    pub fn min_points(&self) -> usize {
        self.p + self.d + self.q + 1
    }
}

/// Forward predictions with per-step 95% confidence bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastResult {
    pub values: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Fit an ARIMA(p,d,q) model to `series` and forecast `horizon` steps.
pub fn fit_and_forecast(
    series: &[f64],
    horizon: usize,
    order: ArimaOrder,
    max_iter: usize,
) -> Result<ForecastResult, VaxError> {
    let actual = series.len();
    let required = effective_min_points(order);
    if actual < required {
        return Err(VaxError::InsufficientData { required, actual });
    }

    // Difference d times, keeping every level for the integration step.
    let mut levels: Vec<Vec<f64>> = vec![series.to_vec()];
    for _ in 0..order.d {
        let prev = levels.last().expect("at least the original level");
        let next: Vec<f64> = prev.windows(2).map(|w| w[1] - w[0]).collect();
        levels.push(next);
    }
    let w = levels.last().expect("differenced level").clone();
    let n = w.len();

    let mean = w.iter().sum::<f64>() / n as f64;
    let z: Vec<f64> = w.iter().map(|v| v - mean).collect();

    let fit = estimate(&z, order.p, order.q, max_iter)?;

    // ARMA recursion on the centered scale; future shocks are zero.
    let mut zf = z;
    let mut ef = fit.residuals.clone();
    let mut point = Vec::with_capacity(horizon);
    for h in 0..horizon {
        let t = n + h;
        let mut v = 0.0;
        for (i, &phi) in fit.phi.iter().enumerate() {
            v += phi * zf[t - 1 - i];
        }
        for (j, &theta) in fit.theta.iter().enumerate() {
            v += theta * ef[t - 1 - j];
        }
        zf.push(v);
        ef.push(0.0);
        point.push(v + mean);
    }

    // Undo the differencing: each level integrates the one below it,
    // anchored at its last observed value.
    for level in (0..order.d).rev() {
        let mut last = *levels[level].last().expect("non-empty level");
        for v in point.iter_mut() {
            last += *v;
            *v = last;
        }
    }

    // Psi weights of the full polynomial phi(B)(1-B)^d drive the forecast
    // variance; cumulative squared weights give the per-step bounds.
    let full_ar = compose_with_differencing(&fit.phi, order.d);
    let psi = psi_weights(&full_ar, &fit.theta, horizon);
    let mut lower = Vec::with_capacity(horizon);
    let mut upper = Vec::with_capacity(horizon);
    let mut cum = 0.0;
    for (h, value) in point.iter().enumerate() {
        cum += psi[h] * psi[h];
        let half_width = Z_95 * (fit.sigma2 * cum).sqrt();
        lower.push(value - half_width);
        upper.push(value + half_width);
    }

    Ok(ForecastResult {
        values: point,
        lower,
        upper,
    })
}

/// Minimum observations: the order's practical floor, raised for models
/// with MA terms, where the long autoregression needs room of its own.
fn effective_min_points(order: ArimaOrder) -> usize {
    let base = order.min_points();
    if order.q == 0 {
        base
    } else {
        base.max(2 * long_ar_order(order.p, order.q) + 1 + order.d)
    }
}

fn long_ar_order(p: usize, q: usize) -> usize {
    (p + q).max(2)
}

#[derive(Debug)]
struct FittedArma {
    phi: Vec<f64>,
    theta: Vec<f64>,
    sigma2: f64,
    /// In-sample residuals aligned with the centered series (zeros where
    /// lags are unavailable).
    residuals: Vec<f64>,
}

fn estimate(z: &[f64], p: usize, q: usize, max_iter: usize) -> Result<FittedArma, VaxError> {
    let n = z.len();

    if p == 0 && q == 0 {
        let sigma2 = z.iter().map(|v| v * v).sum::<f64>() / n as f64;
        return Ok(FittedArma {
            phi: Vec::new(),
            theta: Vec::new(),
            sigma2,
            residuals: z.to_vec(),
        });
    }

    if q == 0 {
        let phi = fit_autoregression(z, p)?;
        let residuals = arma_residuals(z, &phi, &[]);
        let rows = n - p;
        let sigma2 = residuals[p..].iter().map(|e| e * e).sum::<f64>() / rows as f64;
        return Ok(FittedArma {
            phi,
            theta: Vec::new(),
            sigma2,
            residuals,
        });
    }

    // Stage 1: long AR to proxy the unobserved shocks.
    let m = long_ar_order(p, q);
    let alpha = fit_autoregression(z, m)?;
    let mut residuals = arma_residuals(z, &alpha, &[]);

    // Stage 2: regress on lagged values and lagged residual proxies,
    // refreshing the proxies until the coefficients settle.
    let start = m.max(p);
    let mut previous: Option<Vec<f64>> = None;
    for _ in 0..max_iter {
        let mut rows = Vec::with_capacity(n - start);
        let mut targets = Vec::with_capacity(n - start);
        for t in start..n {
            let mut row = Vec::with_capacity(p + q);
            for i in 1..=p {
                row.push(z[t - i]);
            }
            for j in 1..=q {
                row.push(residuals[t - j]);
            }
            rows.push(row);
            targets.push(z[t]);
        }

        let beta = solve_least_squares(&rows, &targets)
            .ok_or_else(|| VaxError::NonConvergence("singular normal equations".to_string()))?;
        let phi = beta[..p].to_vec();
        let theta = beta[p..].to_vec();

        residuals = arma_residuals(z, &phi, &theta);

        let converged = previous
            .as_ref()
            .is_some_and(|prev| max_delta(prev, &beta) < CONVERGENCE_TOL);
        if converged {
            let sigma2 =
                residuals[start..].iter().map(|e| e * e).sum::<f64>() / (n - start) as f64;
            return Ok(FittedArma {
                phi,
                theta,
                sigma2,
                residuals,
            });
        }
        previous = Some(beta);
    }

    Err(VaxError::NonConvergence(format!(
        "coefficient estimates did not settle within {max_iter} iterations"
    )))
}

/// OLS fit of an AR(k) model on the centered series.
fn fit_autoregression(z: &[f64], k: usize) -> Result<Vec<f64>, VaxError> {
    let n = z.len();
    let mut rows = Vec::with_capacity(n - k);
    let mut targets = Vec::with_capacity(n - k);
    for t in k..n {
        let row: Vec<f64> = (1..=k).map(|i| z[t - i]).collect();
        rows.push(row);
        targets.push(z[t]);
    }
    solve_least_squares(&rows, &targets)
        .ok_or_else(|| VaxError::NonConvergence("singular normal equations".to_string()))
}

/// Conditional residuals: unavailable lags contribute zero.
fn arma_residuals(z: &[f64], phi: &[f64], theta: &[f64]) -> Vec<f64> {
    let n = z.len();
    let mut e = vec![0.0; n];
    for t in 0..n {
        let mut fitted = 0.0;
        for (i, &ph) in phi.iter().enumerate() {
            if t > i {
                fitted += ph * z[t - 1 - i];
            }
        }
        for (j, &th) in theta.iter().enumerate() {
            if t > j {
                fitted += th * e[t - 1 - j];
            }
        }
        e[t] = z[t] - fitted;
    }
    e
}

fn max_delta(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Solve min ||X·beta - y|| via the normal equations with partial-pivot
/// Gaussian elimination. `None` when the system is singular or the
/// solution is not finite.
fn solve_least_squares(rows: &[Vec<f64>], y: &[f64]) -> Option<Vec<f64>> {
    let k = rows.first()?.len();
    if rows.len() < k {
        return None;
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &target) in rows.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * target;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    // Forward elimination.
    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&a, &b| xtx[a][col].abs().total_cmp(&xtx[b][col].abs()))?;
        if xtx[pivot_row][col].abs() < PIVOT_EPS {
            return None;
        }
        xtx.swap(col, pivot_row);
        xty.swap(col, pivot_row);

        for row in col + 1..k {
            let factor = xtx[row][col] / xtx[col][col];
            for j in col..k {
                xtx[row][j] -= factor * xtx[col][j];
            }
            xty[row] -= factor * xty[col];
        }
    }

    // Back substitution.
    let mut beta = vec![0.0; k];
    for row in (0..k).rev() {
        let mut acc = xty[row];
        for j in row + 1..k {
            acc -= xtx[row][j] * beta[j];
        }
        beta[row] = acc / xtx[row][row];
    }

    beta.iter().all(|b| b.is_finite()).then_some(beta)
}

/// Coefficients a_i of the full AR side: phi(B)(1-B)^d expanded, so that
/// x_t = sum a_i x_{t-i} + (MA terms). Order p + d.
fn compose_with_differencing(phi: &[f64], d: usize) -> Vec<f64> {
    // c(B) = 1 - phi_1 B - ... - phi_p B^p
    let mut c = Vec::with_capacity(phi.len() + d + 1);
    c.push(1.0);
    c.extend(phi.iter().map(|ph| -ph));

    for _ in 0..d {
        let mut next = vec![0.0; c.len() + 1];
        for (i, &coef) in c.iter().enumerate() {
            next[i] += coef;
            next[i + 1] -= coef;
        }
        c = next;
    }

    c[1..].iter().map(|coef| -coef).collect()
}

/// First `horizon` psi weights of the ARMA process defined by the AR
/// coefficients `a` and MA coefficients `theta`.
fn psi_weights(a: &[f64], theta: &[f64], horizon: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(horizon.max(1));
    psi.push(1.0);
    for k in 1..horizon {
        let mut w = if k <= theta.len() { theta[k - 1] } else { 0.0 };
        for (i, &ai) in a.iter().enumerate() {
            if k > i {
                w += ai * psi[k - 1 - i];
            }
        }
        psi.push(w);
    }
    psi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ar1_fit_recovers_a_strong_autoregression() {
        // x_t = 0.8 x_{t-1} with no noise; OLS recovers phi exactly.
        let mut series = vec![100.0];
        for _ in 0..30 {
            let last = *series.last().unwrap();
            series.push(0.8 * last);
        }
        let mean = series.iter().sum::<f64>() / series.len() as f64;
        let z: Vec<f64> = series.iter().map(|v| v - mean).collect();
        let phi = fit_autoregression(&z, 1).unwrap();
        assert!((phi[0] - 0.8).abs() < 0.05);
    }

    #[test]
    fn arma_estimation_settles_on_a_generated_series() {
        // ARMA(1,1) driven by a deterministic pseudo-noise sequence.
        let mut noise = Vec::with_capacity(80);
        let mut state: u64 = 42;
        for _ in 0..80 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            noise.push(((state >> 33) as f64 / (1u64 << 31) as f64) - 1.0);
        }
        let mut z = vec![0.0; 80];
        for t in 1..80 {
            z[t] = 0.5 * z[t - 1] + noise[t] + 0.3 * noise[t - 1];
        }

        let fit = estimate(&z, 1, 1, 500).unwrap();
        assert_eq!(fit.phi.len(), 1);
        assert_eq!(fit.theta.len(), 1);
        assert!(fit.phi[0].is_finite() && fit.theta[0].is_finite());
        assert!(fit.sigma2 > 0.0);
    }

    #[test]
    fn constant_series_with_ar_terms_is_singular() {
        let z = vec![0.0; 20];
        let err = estimate(&z, 1, 0, 100).unwrap_err();
        assert!(matches!(err, VaxError::NonConvergence(_)));
    }

    #[test]
    fn differencing_polynomial_composes_correctly() {
        // (1 - 0.5B)(1 - B) = 1 - 1.5B + 0.5B^2 -> a = [1.5, -0.5]
        let a = compose_with_differencing(&[0.5], 1);
        assert_eq!(a.len(), 2);
        assert!((a[0] - 1.5).abs() < 1e-12);
        assert!((a[1] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn psi_weights_of_a_pure_random_walk_are_all_one() {
        // ARIMA(0,1,0): x_t = x_{t-1} + e_t, psi_k = 1 for all k.
        let a = compose_with_differencing(&[], 1);
        let psi = psi_weights(&a, &[], 5);
        for w in psi {
            assert!((w - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn min_points_matches_the_contract() {
        assert_eq!(ArimaOrder { p: 1, d: 1, q: 0 }.min_points(), 3);
        assert_eq!(ArimaOrder { p: 2, d: 1, q: 1 }.min_points(), 5);
    }
}
