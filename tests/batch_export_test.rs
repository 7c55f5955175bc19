// tests/batch_export_test.rs

use std::fs;
use std::path::{Path, PathBuf};

use rheology_csv_render::data_analysis::batch::{analyze_file, analyze_files};
use rheology_csv_render::data_analysis::derivative::compute_loglog_derivative;
use rheology_csv_render::data_input::export_parser::load_flow_sweep;
use rheology_csv_render::data_input::sample::SweepSeries;
use rheology_csv_render::export::{export_derivative, export_long, export_single, export_wide};
use rheology_csv_render::series_names::Sweep;

const PEAK_HOLD: &str = "\
Peak hold - 1
Point,Step time,Viscosity
,s,Pa.s
1,0,120
2,1,100

Peak hold - 2
Point,Step time,Viscosity
,s,Pa.s
1,0,15
2,1,10

Peak hold - 3
Point,Step time,Viscosity
,s,Pa.s
1,0,30
2,1,60
3,2,80
";

const FLOW_SWEEP: &str = "\
Flow sweep - 1
Point,Shear rate,Viscosity
,1/s,Pa.s
1,1,100
2,10,10
3,100,1

Flow sweep - 2
Point,Shear rate,Viscosity
,1/s,Pa.s
1,100,1.5
2,10,15
";

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("fixture should be written");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_file_and_export_single() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "gel_A.csv", PEAK_HOLD);

        let result = analyze_file(&input);
        assert_eq!(result.sample, "gel_A");
        assert!(!result.record.is_error());

        let output = dir.path().join("out").join("gel_A-metrics.csv");
        export_single(&result.record, &output).unwrap();
        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Metric,Value");
        assert_eq!(lines[1], "Viscosity Ratio (%),80");
        assert_eq!(lines[3], "80% Recovery Time (s),2");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_missing_file_becomes_error_record() {
        let dir = tempfile::tempdir().unwrap();
        let result = analyze_file(&dir.path().join("absent.csv"));

        assert!(result.record.is_error());
        let message = result.record.entries()[0].1.export_text();
        assert!(message.starts_with("Failed to analyze file:"), "{message}");
    }

    #[test]
    fn test_wide_and_long_exports() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(dir.path(), "good.csv", PEAK_HOLD);
        let bad = write_file(
            dir.path(),
            "bad.csv",
            "Peak hold - 1\nPoint,Step time,Viscosity\n,s,Pa.s\n1,0,100\n",
        );

        let results = analyze_files(&[good, bad]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].sample, "good");
        assert!(results[1].record.is_error());

        let wide = dir.path().join("wide.csv");
        export_wide(&results, &wide).unwrap();
        let text = fs::read_to_string(&wide).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Sample,Viscosity Ratio (%),Thixotropic Index,80% Recovery Time (s),Structural Recovery (%),Error"
        );
        assert!(lines.next().unwrap().starts_with("good,80,10,2,"));
        assert!(lines.next().unwrap().starts_with("bad,,,,,"));

        let long = dir.path().join("long.csv");
        export_long(&results, &long).unwrap();
        let text = fs::read_to_string(&long).unwrap();
        assert_eq!(text.lines().next(), Some("Sample,Metric,Value"));
        assert_eq!(text.lines().count(), 1 + 4 + 1);
    }

    #[test]
    fn test_wide_export_without_failures_has_no_error_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "a.csv", PEAK_HOLD);
        let results = analyze_files(&[input.clone(), input]);

        let wide = dir.path().join("wide.csv");
        export_wide(&results, &wide).unwrap();
        let header = fs::read_to_string(&wide).unwrap();
        assert!(!header.lines().next().unwrap().contains("Error"));
    }

    #[test]
    fn test_flow_sweep_derivative_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "oil_run1.csv", FLOW_SWEEP);

        let table = load_flow_sweep(&input).unwrap();
        let series = SweepSeries::from_table(&table).unwrap();
        assert_eq!(series.direction(Sweep::Forward).len(), 3);
        assert_eq!(series.direction(Sweep::Reverse), &[(100.0, 1.5), (10.0, 15.0)]);

        let (x, y) = series.columns(Sweep::Forward);
        let derivative = compute_loglog_derivative(&x, &y);
        let output = dir.path().join("slope.csv");
        export_derivative(&derivative, &output).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Shear rate,d(log Viscosity)/d(log Shear rate)");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1,-1"));
    }
}
