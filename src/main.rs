// src/main.rs

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};

use rheology_csv_render::config::Config;
use rheology_csv_render::constants::METRIC_DISPLAY_DECIMALS;
use rheology_csv_render::data_analysis::batch::{analyze_files, SampleResult};
use rheology_csv_render::data_input::export_parser::{load_flow_sweep, load_peak_hold};
use rheology_csv_render::data_input::sample::{PhasedSample, SweepSeries};
use rheology_csv_render::export::{export_derivative, export_long, export_single, export_wide};
use rheology_csv_render::plot_functions::plot_diff_viscosity::plot_diff_viscosity;
use rheology_csv_render::plot_functions::plot_flow_curve::plot_flow_curve;
use rheology_csv_render::plot_functions::plot_loglog_derivative::{
    loglog_derivatives, plot_loglog_derivative,
};
use rheology_csv_render::plot_functions::plot_thixotropy::plot_thixotropy;
use rheology_csv_render::plot_functions::sweep_suffix;
use rheology_csv_render::series_names::{dataset_label, sample_name, Sweep};
use rheology_csv_render::types::LabelledPoints;

/// Rheology export renderer: flow curves, log-log slopes and thixotropy metrics
#[derive(Parser)]
#[command(name = "rheology-render")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory for plots and exports (overrides the config file)
    #[arg(long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Sweep directions to plot.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum SweepArg {
    Forward,
    Reverse,
    #[default]
    Both,
}

impl SweepArg {
    fn sweeps(self) -> Vec<Sweep> {
        match self {
            SweepArg::Forward => vec![Sweep::Forward],
            SweepArg::Reverse => vec![Sweep::Reverse],
            SweepArg::Both => Sweep::ALL.to_vec(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Plot viscosity vs shear rate for flow-sweep exports
    Flow {
        /// Flow-sweep export files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Sweep direction(s) to plot
        #[arg(long, value_enum, default_value = "both")]
        sweep: SweepArg,

        /// Overlay dη/dγ̇ on a secondary axis
        #[arg(long)]
        derivative: bool,
    },

    /// Plot the log-log derivative d(log η)/d(log γ̇) of flow-sweep exports
    Slope {
        /// Flow-sweep export files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Also write each derivative series to CSV
        #[arg(long)]
        export_csv: bool,
    },

    /// Plot viscosity vs time for peak-hold exports
    Thixotropy {
        /// Peak-hold export files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },

    /// Compute thixotropy metrics for peak-hold exports
    Analyze {
        /// Peak-hold export files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Write the metrics table to this CSV file
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,

        /// Use the long (Sample, Metric, Value) layout for multi-sample exports
        #[arg(long)]
        long: bool,
    },
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }

    match cli.command {
        Commands::Flow {
            files,
            sweep,
            derivative,
        } => run_flow(&files, &sweep.sweeps(), derivative, &config),
        Commands::Slope { files, export_csv } => run_slope(&files, export_csv, &config),
        Commands::Thixotropy { files } => run_thixotropy(&files, &config),
        Commands::Analyze {
            files,
            export,
            long,
        } => run_analyze(&files, export.as_deref(), long),
    }
}

/// Base name for output files: the file stem for one input, `comparison` for several.
fn output_root(files: &[PathBuf]) -> String {
    match files {
        [single] => sample_name(single),
        _ => "comparison".to_string(),
    }
}

fn load_sweep_datasets(files: &[PathBuf]) -> Result<Vec<(String, SweepSeries)>> {
    files
        .iter()
        .map(|path| {
            let table = load_flow_sweep(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let series = SweepSeries::from_table(&table)
                .with_context(|| format!("Invalid flow-sweep data in {}", path.display()))?;
            if series.is_empty() {
                warn!("{}: no numeric sweep rows", path.display());
            }
            Ok((dataset_label(path), series))
        })
        .collect()
}

fn run_flow(files: &[PathBuf], sweeps: &[Sweep], derivative: bool, config: &Config) -> Result<()> {
    let datasets = load_sweep_datasets(files)?;
    let root = output_root(files);
    let suffix = sweep_suffix(sweeps);

    if derivative {
        let output_file = config
            .output
            .directory
            .join(format!("{root}-{suffix}-diff.png"));
        plot_diff_viscosity(&datasets, sweeps, &output_file, &root, &config.plot)
            .map_err(|e| anyhow!("Failed to render {}: {e}", output_file.display()))?;
    } else {
        let output_file = config.output.directory.join(format!("{root}-{suffix}.png"));
        plot_flow_curve(&datasets, sweeps, &output_file, &root, &config.plot)
            .map_err(|e| anyhow!("Failed to render {}: {e}", output_file.display()))?;
    }
    Ok(())
}

fn run_slope(files: &[PathBuf], export_csv: bool, config: &Config) -> Result<()> {
    let datasets = load_sweep_datasets(files)?;
    let derivatives = loglog_derivatives(&datasets);
    for d in &derivatives {
        if d.derivative.dropped > 0 {
            warn!(
                "{} {}: dropped {} non-positive points before taking logs",
                d.dataset, d.sweep, d.derivative.dropped
            );
        }
    }

    let root = output_root(files);
    let output_file = config
        .output
        .directory
        .join(format!("{root}-loglog-derivative.png"));
    plot_loglog_derivative(&derivatives, &output_file, &root, &config.plot)
        .map_err(|e| anyhow!("Failed to render {}: {e}", output_file.display()))?;

    if export_csv {
        for d in derivatives.iter().filter(|d| !d.derivative.is_empty()) {
            let csv_path = config.output.directory.join(format!(
                "{}-{}-loglog-derivative.csv",
                d.dataset,
                d.sweep.label()
            ));
            export_derivative(&d.derivative, &csv_path)?;
            info!("Derivative written to {}", csv_path.display());
        }
    }
    Ok(())
}

fn run_thixotropy(files: &[PathBuf], config: &Config) -> Result<()> {
    let mut datasets: Vec<LabelledPoints> = Vec::new();
    for path in files {
        let table = load_peak_hold(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        match PhasedSample::from_table(&table) {
            Ok(sample) => datasets.push((dataset_label(path), sample.time_series())),
            Err(e) => warn!("Skipping {}: {e}", path.display()),
        }
    }

    let root = output_root(files);
    let output_file = config.output.directory.join(format!("{root}.png"));
    plot_thixotropy(&datasets, &output_file, &root, &config.plot)
        .map_err(|e| anyhow!("Failed to render {}: {e}", output_file.display()))?;
    Ok(())
}

fn print_results(results: &[SampleResult]) {
    for result in results {
        println!("{}", result.sample);
        for (key, value) in result.record.entries() {
            println!("  {key:<32} {}", value.display(METRIC_DISPLAY_DECIMALS));
        }
    }
}

fn run_analyze(files: &[PathBuf], export: Option<&Path>, long: bool) -> Result<()> {
    let results = analyze_files(files);
    print_results(&results);

    if let Some(path) = export {
        match results.as_slice() {
            [single] => export_single(&single.record, path)?,
            _ if long => export_long(&results, path)?,
            _ => export_wide(&results, path)?,
        }
        println!("Metrics exported to {}", path.display());
    }
    Ok(())
}
