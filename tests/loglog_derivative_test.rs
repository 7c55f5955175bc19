// tests/loglog_derivative_test.rs

use proptest::prelude::*;
use rheology_csv_render::data_analysis::derivative::{
    compute_linear_derivative, compute_loglog_derivative,
};

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn power_law_has_constant_loglog_slope(
            k in -3.0f64..3.0,
            start in 0.01f64..10.0,
            ratio in 1.1f64..3.0,
            n in 3usize..30,
        ) {
            let x: Vec<f64> = (0..n).map(|i| start * ratio.powi(i as i32)).collect();
            let y: Vec<f64> = x.iter().map(|v| v.powf(k)).collect();

            let result = compute_loglog_derivative(&x, &y);
            prop_assert_eq!(result.len(), n);
            prop_assert_eq!(result.dropped, 0);
            for slope in &result.dydx {
                prop_assert!((slope - k).abs() < 1e-6, "slope {} vs k {}", slope, k);
            }
        }
    }

    #[test]
    fn test_drops_non_positive_points() {
        let x = [1.0, 10.0, 100.0, 1000.0, 10000.0];
        let y = [1.0, 0.1, -5.0, 0.001, 0.0001];

        let result = compute_loglog_derivative(&x, &y);
        assert_eq!(result.dropped, 1);
        assert_eq!(result.x, vec![1.0, 10.0, 1000.0, 10000.0]);
        for slope in &result.dydx {
            assert!((slope + 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_drops_negative_shear_rate() {
        let x = [1.0, -2.0, 10.0, 100.0, 1000.0];
        let y = [1.0, 0.5, 0.1, 0.01, 0.001];

        let result = compute_loglog_derivative(&x, &y);
        assert_eq!(result.dropped, 1);
        assert_eq!(result.x, vec![1.0, 10.0, 100.0, 1000.0]);
        assert_eq!(result.len(), 4);
        for slope in &result.dydx {
            assert!((slope + 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_short_inputs_yield_empty_results() {
        assert!(compute_loglog_derivative(&[], &[]).is_empty());
        assert!(compute_loglog_derivative(&[2.0], &[3.0]).is_empty());

        let filtered = compute_loglog_derivative(&[1.0, 2.0, 3.0], &[0.0, -1.0, 4.0]);
        assert!(filtered.is_empty());
        assert_eq!(filtered.dropped, 2);
    }

    #[test]
    fn test_input_is_sorted_before_differentiation() {
        let x = [100.0, 1.0, 10.0];
        let y = [10000.0, 1.0, 100.0];

        let result = compute_loglog_derivative(&x, &y);
        assert_eq!(result.x, vec![1.0, 10.0, 100.0]);
        for slope in &result.dydx {
            assert!((slope - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_endpoints_use_one_sided_difference() {
        let x = [1.0, 10.0, 100.0];
        let y = [1.0, 10.0, 10000.0];

        let result = compute_loglog_derivative(&x, &y);
        assert!((result.dydx[0] - 1.0).abs() < 1e-9);
        assert!((result.dydx[1] - 2.0).abs() < 1e-9);
        assert!((result.dydx[2] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_derivative_keeps_non_positive_values() {
        let result = compute_linear_derivative(&[0.0, 1.0, 2.0], &[-1.0, 1.0, 3.0]);
        assert_eq!(result.dropped, 0);
        assert_eq!(result.dydx, vec![2.0, 2.0, 2.0]);

        assert_eq!(compute_linear_derivative(&[5.0], &[1.0]).dydx, vec![0.0]);
        assert!(compute_linear_derivative(&[], &[]).is_empty());
    }
}
