//! ocean-heat CLI - synthetic sea-warming report data.
//!
//! Generates indicator series and spatial anomaly grids, filters them to a
//! year range, smooths them and writes CSV, JSON or Parquet tables. The
//! `monthly` command cleans an observed monthly record, or synthesises one.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::Rng;

use ocean_heat::data::export::{export_path, write_csv, ExportFrame};
use ocean_heat::{
    annual_mean_anomaly, build_report, clean_monthly, filter_samples_by_year, filter_then_smooth,
    load_monthly_csv, monthly_sea_surface_temperature, FilterRange, Indicator, MonthlySeries,
    ReportConfig, SmoothingWindow, YearMonth, YearTable,
};

/// Synthetic sea-warming indicators, filtered and smoothed.
#[derive(Parser)]
#[command(name = "ocean-heat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate, filter and smooth a single indicator as `year,value`.
    Series {
        /// Indicator name, e.g. `global-sea-temperature` or `fishery_output_t`.
        indicator: Indicator,

        #[command(flatten)]
        span: SpanArgs,

        /// Output file (.csv, .json, .parquet); CSV on stdout when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the multi-indicator report table.
    Report {
        /// JSON config file; flags below override its fields.
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        span: SpanArgs,

        /// Output file (.csv, .json, .parquet); CSV on stdout when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the year × latitude × longitude anomaly grid.
    Grid {
        #[command(flatten)]
        grid: GridArgs,

        /// Output file (.csv, .json, .parquet); CSV on stdout when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Monthly global sea-surface temperature as `date,value`.
    Monthly {
        /// Observed `date,value` CSV to clean; the synthetic 2000–2019 record
        /// is used when absent or unreadable.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Last month kept from the input (YYYY-MM); defaults to this month.
        #[arg(long)]
        cutoff: Option<YearMonth>,

        /// Random seed for the synthetic record.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file (.csv, .json, .parquet); CSV on stdout when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Year span, filter, smoothing and seed shared by `series` and `report`.
#[derive(Args)]
struct SpanArgs {
    /// First generated year.
    #[arg(long)]
    start: Option<i32>,

    /// Last generated year.
    #[arg(long)]
    end: Option<i32>,

    /// First year kept after filtering.
    #[arg(long)]
    from: Option<i32>,

    /// Last year kept after filtering.
    #[arg(long)]
    to: Option<i32>,

    /// Trailing moving-average window (1 = no smoothing).
    #[arg(short, long)]
    window: Option<usize>,

    /// Random seed for reproducible output.
    #[arg(short, long)]
    seed: Option<u64>,
}

impl SpanArgs {
    fn apply(&self, config: &mut ReportConfig) -> Result<()> {
        if let Some(start) = self.start {
            config.start_year = start;
        }
        if let Some(end) = self.end {
            config.end_year = end;
        }
        if self.from.is_some() || self.to.is_some() {
            let current = config.filter_range()?;
            config.filter = Some(FilterRange::new(
                self.from.unwrap_or(current.start_year()),
                self.to.unwrap_or(current.end_year()),
            )?);
        }
        if let Some(window) = self.window {
            config.window = SmoothingWindow::new(window)?;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(())
    }
}

#[derive(Args)]
struct GridArgs {
    /// First year of the grid.
    #[arg(long)]
    start: Option<i32>,

    /// Last year of the grid.
    #[arg(long)]
    end: Option<i32>,

    /// Number of latitudes over [-60, 60].
    #[arg(long)]
    lat_count: Option<usize>,

    /// Number of longitudes over [-180, 180].
    #[arg(long)]
    lon_count: Option<usize>,

    /// Anomaly trend per year.
    #[arg(long)]
    trend: Option<f64>,

    /// Amplitude of the sin(lon)·cos(lat) pattern.
    #[arg(long)]
    amplitude: Option<f64>,

    /// Noise standard deviation.
    #[arg(long)]
    noise: Option<f64>,

    /// First year kept after filtering.
    #[arg(long)]
    from: Option<i32>,

    /// Last year kept after filtering.
    #[arg(long)]
    to: Option<i32>,

    /// Emit the mean anomaly per year instead of every grid cell.
    #[arg(long)]
    annual_mean: bool,

    /// Random seed for reproducible output.
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Series {
            indicator,
            span,
            output,
        } => {
            let mut config = ReportConfig::default();
            span.apply(&mut config)?;
            let raw = indicator.generate(config.span()?, &mut config.rng())?;
            let prepared = filter_then_smooth(&raw, config.filter_range()?, config.window);
            log::info!("{indicator}: {} rows", prepared.len());
            emit(&YearTable::from(&prepared), output.as_deref())
        }

        Commands::Report {
            config,
            span,
            output,
        } => {
            let mut config = match config {
                Some(path) => ReportConfig::from_json_file(&path)?,
                None => ReportConfig::default(),
            };
            span.apply(&mut config)?;
            let table = build_report(&config, &mut config.rng())?;
            emit(&table, output.as_deref())
        }

        Commands::Grid { grid: args, output } => {
            let mut config = ReportConfig::default();
            let grid = &mut config.grid;
            grid.start_year = args.start.unwrap_or(grid.start_year);
            grid.end_year = args.end.unwrap_or(grid.end_year);
            grid.lat_count = args.lat_count.unwrap_or(grid.lat_count);
            grid.lon_count = args.lon_count.unwrap_or(grid.lon_count);
            grid.trend_per_year = args.trend.unwrap_or(grid.trend_per_year);
            grid.seasonal_amplitude = args.amplitude.unwrap_or(grid.seasonal_amplitude);
            grid.noise_std_dev = args.noise.unwrap_or(grid.noise_std_dev);
            config.seed = args.seed;

            let range = FilterRange::new(
                args.from.unwrap_or(config.grid.start_year),
                args.to.unwrap_or(config.grid.end_year),
            )?;
            let samples = config.grid.samples(config.rng())?;
            log::info!(
                "grid: {} rows before filtering to {range}",
                samples.len()
            );
            let kept = filter_samples_by_year(samples, range);

            let table = if args.annual_mean {
                YearTable::from_series([("mean_anomaly", annual_mean_anomaly(kept))])?
            } else {
                YearTable::from_samples(kept)
            };
            emit(&table, output.as_deref())
        }

        Commands::Monthly {
            input,
            cutoff,
            seed,
            output,
        } => {
            let cutoff = cutoff.unwrap_or_else(|| YearMonth::of(&chrono::Local::now().date_naive()));
            let config = ReportConfig {
                seed,
                ..ReportConfig::default()
            };
            let series = monthly_record(input.as_deref(), cutoff, &mut config.rng())?;
            log::info!("monthly record: {} rows", series.len());
            emit(&series, output.as_deref())
        }
    }
}

/// The cleaned record from `input`, or the synthetic record when there is no
/// input or it cannot be loaded.
fn monthly_record<R: Rng + ?Sized>(
    input: Option<&Path>,
    cutoff: YearMonth,
    rng: &mut R,
) -> Result<MonthlySeries> {
    if let Some(path) = input {
        let cleaned = load_monthly_csv(path)
            .and_then(|rows| clean_monthly(rows, cutoff).map_err(anyhow::Error::from));
        match cleaned {
            Ok(series) => return Ok(series),
            Err(err) => log::warn!(
                "could not use {}: {err:#}; falling back to synthetic data",
                path.display()
            ),
        }
    }
    Ok(monthly_sea_surface_temperature().generate(rng)?)
}

/// Write to `output`, or CSV on stdout.
fn emit<'a>(data: impl Into<ExportFrame<'a>>, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => export_path(data, path),
        None => write_csv(data, io::stdout().lock()).context("writing CSV to stdout"),
    }
}
