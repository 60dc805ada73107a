//! Synthetic sea-warming indicators and the transforms a climate report
//! applies to them.
//!
//! The crate generates annual indicator series (sea temperature, coral
//! bleaching, fish stocks, fishery output) and a year × latitude × longitude
//! anomaly grid, each as a linear trend plus Gaussian noise. Series are
//! filtered to a year range, smoothed with a trailing moving average and
//! joined into tables for export. A monthly sea-surface temperature record,
//! either loaded from CSV and cleaned or synthesised as a fallback, is
//! exported alongside. All randomness comes from an RNG passed in
//! by the caller, so seeded runs are reproducible.

pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use config::ReportConfig;
pub use data::clean::{clean_monthly, load_monthly_csv, read_monthly_csv};
pub use data::export::ExportFrame;
pub use data::filter::{filter_by_year_range, filter_samples_by_year};
pub use data::generate::{
    annual_mean_anomaly, generate_monthly_series, generate_spatial_anomaly_grid,
    generate_year_series, MonthlyParams, SeriesParams, SpatialAnomalies, SpatialGrid,
};
pub use data::model::{
    FilterRange, MonthPoint, MonthlySeries, SmoothingWindow, SpatialAnomalySample, YearMonth,
    YearPoint, YearSeries,
};
pub use data::presets::{monthly_sea_surface_temperature, Indicator};
pub use data::smooth::moving_average;
pub use data::table::YearTable;
pub use error::{PipelineError, Result};
pub use report::{build_report, filter_then_smooth};
