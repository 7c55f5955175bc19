// tests/axis_formatting_test.rs

use rheology_csv_render::plot_framework::format_axis_value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viscosity_decades() {
        // Log-scale tick values typical of a flow curve
        let expected = [
            (0.01, "0.01"),
            (0.1, "0.1"),
            (1.0, "1"),
            (10.0, "10"),
            (100.0, "100"),
            (1000.0, "1000"),
            (10000.0, "1e4"),
        ];
        for (value, text) in expected {
            assert_eq!(format_axis_value(value), text, "value {value}");
        }
    }

    #[test]
    fn test_slope_axis_values() {
        assert_eq!(format_axis_value(-1.0), "-1");
        assert_eq!(format_axis_value(-0.25), "-0.25");
        assert_eq!(format_axis_value(0.0), "0");
        assert_eq!(format_axis_value(0.5), "0.5");
    }

    #[test]
    fn test_tiny_and_huge_values_use_exponent() {
        assert_eq!(format_axis_value(0.001), "1e-3");
        assert_eq!(format_axis_value(3.0e6), "3e6");
    }
}
