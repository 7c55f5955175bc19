// src/data_analysis/derivative.rs

use log::{debug, warn};
use ndarray::{Array1, ArrayView1};

/// An x-sorted series and its derivative, index-aligned.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DerivativeSeries {
    pub x: Vec<f64>,
    pub dydx: Vec<f64>,
    /// Points removed before differentiation (non-positive values in log-log mode).
    pub dropped: usize,
}

impl DerivativeSeries {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// `(x, dy/dx)` pairs with non-finite derivatives removed, ready for plotting.
    pub fn finite_points(&self) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .zip(self.dydx.iter())
            .filter(|(x, d)| x.is_finite() && d.is_finite())
            .map(|(&x, &d)| (x, d))
            .collect()
    }
}

/// Discrete derivative dy/dx over a non-uniform grid.
///
/// Interior points use the central difference `(y[i+1] - y[i-1]) / (x[i+1] - x[i-1])`,
/// the first and last points the one-sided difference to their neighbour.
/// Inputs shorter than two points yield an empty array.
pub fn gradient(y: ArrayView1<f64>, x: ArrayView1<f64>) -> Array1<f64> {
    let n = y.len().min(x.len());
    if n < 2 {
        return Array1::zeros(0);
    }

    let mut derivative = Array1::zeros(n);

    // Use forward difference for first point
    derivative[0] = (y[1] - y[0]) / (x[1] - x[0]);

    // Use central difference for middle points
    for i in 1..n - 1 {
        derivative[i] = (y[i + 1] - y[i - 1]) / (x[i + 1] - x[i - 1]);
    }

    // Use backward difference for last point
    derivative[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);

    derivative
}

/// Pairs `x` with `y` and sorts the pairs by ascending x (stable).
fn sorted_pairs(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    if x.len() != y.len() {
        warn!(
            "Derivative input length mismatch (x={}, y={}); using the first {} pairs",
            x.len(),
            y.len(),
            x.len().min(y.len())
        );
    }
    let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs
}

/// Linear-space derivative dη/dγ̇ of a viscosity curve, after sorting by shear rate.
///
/// No positivity filtering is applied. A single point yields a zero derivative,
/// an empty input an empty series.
pub fn compute_linear_derivative(x: &[f64], y: &[f64]) -> DerivativeSeries {
    let pairs = sorted_pairs(x, y);
    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

    let dydx = if xs.len() > 1 {
        gradient(ArrayView1::from(&ys), ArrayView1::from(&xs)).to_vec()
    } else {
        vec![0.0; xs.len()]
    };

    DerivativeSeries {
        x: xs,
        dydx,
        dropped: 0,
    }
}

/// Log-log derivative d(log y)/d(log x) of a viscosity curve.
///
/// Pairs are sorted by x, pairs with `x <= 0` or `y <= 0` (or NaN) are dropped and
/// counted, and the gradient is taken over `log10` of the remaining values.
/// Fewer than two remaining points yields an empty series.
pub fn compute_loglog_derivative(x: &[f64], y: &[f64]) -> DerivativeSeries {
    let pairs = sorted_pairs(x, y);
    let total = pairs.len();

    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs
        .into_iter()
        .filter(|&(x, y)| x > 0.0 && y > 0.0)
        .unzip();
    let dropped = total - xs.len();

    if dropped > 0 {
        warn!("Dropped {dropped} of {total} points with non-positive values before log-log derivative");
    }

    if xs.len() < 2 {
        warn!("Not enough valid data points for log-log derivative ({})", xs.len());
        return DerivativeSeries {
            dropped,
            ..DerivativeSeries::default()
        };
    }

    let log_x = Array1::from(xs.clone()).mapv(f64::log10);
    let log_y = Array1::from(ys).mapv(f64::log10);
    let dlog_y_dlog_x = gradient(log_y.view(), log_x.view());

    debug!(
        "Log-log derivative over {} points, x range {} to {}",
        xs.len(),
        xs[0],
        xs[xs.len() - 1]
    );

    DerivativeSeries {
        x: xs,
        dydx: dlog_y_dlog_x.to_vec(),
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_matches_central_difference() {
        let x = Array1::from(vec![0.0, 1.0, 3.0, 4.0]);
        let y = Array1::from(vec![0.0, 2.0, 4.0, 10.0]);
        let d = gradient(y.view(), x.view());
        assert_eq!(d.to_vec(), vec![2.0, 4.0 / 3.0, 8.0 / 3.0, 6.0]);
    }

    #[test]
    fn test_linear_derivative_sorts_by_x() {
        let result = compute_linear_derivative(&[3.0, 1.0, 2.0], &[9.0, 1.0, 4.0]);
        assert_eq!(result.x, vec![1.0, 2.0, 3.0]);
        assert_eq!(result.dydx, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_linear_derivative_single_point_is_zero() {
        let result = compute_linear_derivative(&[5.0], &[2.0]);
        assert_eq!(result.dydx, vec![0.0]);
        assert!(compute_linear_derivative(&[], &[]).is_empty());
    }

    #[test]
    fn test_loglog_all_filtered_is_empty() {
        let result = compute_loglog_derivative(&[-1.0, 0.0, 2.0], &[1.0, 1.0, -3.0]);
        assert!(result.is_empty());
        assert_eq!(result.dropped, 3);
    }

    #[test]
    fn test_loglog_nan_input_is_empty() {
        let result = compute_loglog_derivative(&[f64::NAN, f64::NAN], &[f64::NAN, 1.0]);
        assert!(result.x.is_empty() && result.dydx.is_empty());
    }

    #[test]
    fn test_finite_points_skips_duplicate_x() {
        let result = compute_linear_derivative(&[1.0, 1.0], &[1.0, 2.0]);
        assert!(result.finite_points().is_empty());
    }
}
