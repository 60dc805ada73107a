use std::collections::BTreeMap;
use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::model::{
    FilterRange, MonthPoint, MonthlySeries, SpatialAnomalySample, YearMonth, YearPoint, YearSeries,
    LATITUDE_BOUNDS, LONGITUDE_BOUNDS,
};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Noise
// ---------------------------------------------------------------------------

/// Zero-mean Gaussian noise with the given standard deviation.
fn noise_distribution(std_dev: f64) -> Result<Normal<f64>> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(PipelineError::InvalidNoise(std_dev));
    }
    Normal::new(0.0, std_dev).map_err(|_| PipelineError::InvalidNoise(std_dev))
}

// ---------------------------------------------------------------------------
// Annual indicator series
// ---------------------------------------------------------------------------

/// Generate one noisy linear-trend value per year in `[start_year, end_year]`.
///
/// `value(y) = base_value + trend_per_year * (y - start_year) + N(0, noise_std_dev)`,
/// with one independent draw per year. With `noise_std_dev == 0` the result
/// is the exact trend line.
pub fn generate_year_series<R: Rng + ?Sized>(
    start_year: i32,
    end_year: i32,
    base_value: f64,
    trend_per_year: f64,
    noise_std_dev: f64,
    rng: &mut R,
) -> Result<YearSeries> {
    let range = FilterRange::new(start_year, end_year)?;
    let noise = noise_distribution(noise_std_dev)?;

    let points = range
        .years()
        .map(|year| {
            let elapsed = f64::from(year - start_year);
            let value = base_value + trend_per_year * elapsed + noise.sample(&mut *rng);
            YearPoint { year, value }
        })
        .collect();

    log::debug!(
        "generated {} annual values for {range} (base {base_value}, trend {trend_per_year}/yr, noise σ {noise_std_dev})",
        range.year_count()
    );
    Ok(YearSeries::from_points_unchecked(points))
}

/// Parameters of a single synthetic indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesParams {
    /// Value at the first generated year.
    pub base_value: f64,
    /// Linear change per year.
    pub trend_per_year: f64,
    /// Standard deviation of the per-year Gaussian noise.
    pub noise_std_dev: f64,
}

impl SeriesParams {
    /// Run [`generate_year_series`] over `range` with these parameters.
    pub fn generate<R: Rng + ?Sized>(&self, range: FilterRange, rng: &mut R) -> Result<YearSeries> {
        generate_year_series(
            range.start_year(),
            range.end_year(),
            self.base_value,
            self.trend_per_year,
            self.noise_std_dev,
            rng,
        )
    }
}

// ---------------------------------------------------------------------------
// Monthly series
// ---------------------------------------------------------------------------

/// `months` consecutive monthly values from `start`, ramping linearly from
/// `first_value` to `last_value` with independent Gaussian noise per month.
pub fn generate_monthly_series<R: Rng + ?Sized>(
    start: YearMonth,
    months: usize,
    first_value: f64,
    last_value: f64,
    noise_std_dev: f64,
    rng: &mut R,
) -> Result<MonthlySeries> {
    let noise = noise_distribution(noise_std_dev)?;
    if start.checked_add_months(months.saturating_sub(1)).is_none() {
        return Err(PipelineError::InvalidDate(format!("{start} + {months} months")));
    }

    let points = linspace(first_value, last_value, months)
        .into_iter()
        .enumerate()
        .filter_map(|(offset, level)| {
            let date = start.checked_add_months(offset)?;
            Some(MonthPoint::new(date, level + noise.sample(&mut *rng)))
        })
        .collect();

    log::debug!("generated {months} monthly values from {start} ({first_value} → {last_value}, noise σ {noise_std_dev})");
    Ok(MonthlySeries::from_points_unchecked(points))
}

/// Parameters of a synthetic monthly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyParams {
    pub start: YearMonth,
    pub months: usize,
    pub first_value: f64,
    pub last_value: f64,
    pub noise_std_dev: f64,
}

impl MonthlyParams {
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<MonthlySeries> {
        generate_monthly_series(
            self.start,
            self.months,
            self.first_value,
            self.last_value,
            self.noise_std_dev,
            rng,
        )
    }
}

// ---------------------------------------------------------------------------
// Spatial anomaly grid
// ---------------------------------------------------------------------------

/// `count` evenly spaced values from `lo` to `hi` inclusive.
///
/// A single point sits at `lo`; zero points yield an empty axis.
pub fn linspace(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![lo],
        n => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

/// Parameters of the year × latitude × longitude anomaly grid.
///
/// `anomaly = trend_per_year * (year - start_year)
///          + seasonal_amplitude * sin(lon) * cos(lat)
///          + N(0, noise_std_dev)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialGrid {
    pub start_year: i32,
    pub end_year: i32,
    /// Number of latitudes spread over [-60, 60].
    pub lat_count: usize,
    /// Number of longitudes spread over [-180, 180].
    pub lon_count: usize,
    pub trend_per_year: f64,
    pub seasonal_amplitude: f64,
    pub noise_std_dev: f64,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self {
            start_year: 1990,
            end_year: 2025,
            lat_count: 30,
            lon_count: 60,
            trend_per_year: 0.02,
            seasonal_amplitude: 0.5,
            noise_std_dev: 0.1,
        }
    }
}

impl SpatialGrid {
    pub fn latitudes(&self) -> Vec<f64> {
        linspace(LATITUDE_BOUNDS.0, LATITUDE_BOUNDS.1, self.lat_count)
    }

    pub fn longitudes(&self) -> Vec<f64> {
        linspace(LONGITUDE_BOUNDS.0, LONGITUDE_BOUNDS.1, self.lon_count)
    }

    /// Check the year range, the noise σ and that the row count fits `usize`.
    pub fn validate(&self) -> Result<()> {
        FilterRange::new(self.start_year, self.end_year)?;
        noise_distribution(self.noise_std_dev)?;
        self.row_count().map(|_| ())
    }

    /// Row count of a full pass: years × latitudes × longitudes.
    pub fn row_count(&self) -> Result<usize> {
        let years = FilterRange::new(self.start_year, self.end_year)?.year_count();
        years
            .checked_mul(self.lat_count)
            .and_then(|n| n.checked_mul(self.lon_count))
            .ok_or(PipelineError::GridTooLarge {
                years,
                lat_count: self.lat_count,
                lon_count: self.lon_count,
            })
    }

    /// Start a fresh pass over the grid, drawing noise from `rng`.
    ///
    /// Nothing is cached: every call regenerates the grid, so two calls with
    /// identically seeded RNGs yield identical samples and unseeded calls
    /// yield independent ones.
    pub fn samples<R: Rng>(&self, rng: R) -> Result<SpatialAnomalies<R>> {
        let range = FilterRange::new(self.start_year, self.end_year)?;
        let noise = noise_distribution(self.noise_std_dev)?;
        let total = self.row_count()?;
        if total > 1_000_000 {
            log::warn!("spatial grid of {total} rows requested; consider a coarser resolution");
        }

        let latitudes = self.latitudes();
        let longitudes = self.longitudes();

        // The seasonal term only depends on the cell, not the year.
        let seasonal: Vec<f64> = latitudes
            .iter()
            .flat_map(|&lat| {
                longitudes.iter().map(move |&lon| {
                    self.seasonal_amplitude * (lon * PI / 180.0).sin() * (lat * PI / 180.0).cos()
                })
            })
            .collect();

        Ok(SpatialAnomalies {
            start_year: range.start_year(),
            trend_per_year: self.trend_per_year,
            latitudes,
            longitudes,
            seasonal,
            noise,
            rng,
            index: 0,
            total,
        })
    }
}

/// Build a [`SpatialGrid`] from positional parameters and start a pass over it.
#[allow(clippy::too_many_arguments)]
pub fn generate_spatial_anomaly_grid<R: Rng>(
    start_year: i32,
    end_year: i32,
    lat_count: usize,
    lon_count: usize,
    trend_per_year: f64,
    seasonal_amplitude: f64,
    noise_std_dev: f64,
    rng: R,
) -> Result<SpatialAnomalies<R>> {
    SpatialGrid {
        start_year,
        end_year,
        lat_count,
        lon_count,
        trend_per_year,
        seasonal_amplitude,
        noise_std_dev,
    }
    .samples(rng)
}

/// Lazy pass over a spatial grid, year-major then latitude then longitude.
pub struct SpatialAnomalies<R> {
    start_year: i32,
    trend_per_year: f64,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    /// Per-cell seasonal term, row-major by latitude.
    seasonal: Vec<f64>,
    noise: Normal<f64>,
    rng: R,
    index: usize,
    total: usize,
}

impl<R: Rng> Iterator for SpatialAnomalies<R> {
    type Item = SpatialAnomalySample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }
        let cells = self.seasonal.len();
        let year_offset = self.index / cells;
        let cell = self.index % cells;
        self.index += 1;

        let year = self.start_year + year_offset as i32;
        let anomaly = self.trend_per_year * year_offset as f64
            + self.seasonal[cell]
            + self.noise.sample(&mut self.rng);

        Some(SpatialAnomalySample {
            year,
            latitude: self.latitudes[cell / self.longitudes.len()],
            longitude: self.longitudes[cell % self.longitudes.len()],
            anomaly,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.index;
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for SpatialAnomalies<R> {}

/// Collapse samples to the mean anomaly of each year, years ascending.
pub fn annual_mean_anomaly(samples: impl IntoIterator<Item = SpatialAnomalySample>) -> YearSeries {
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for sample in samples {
        let entry = sums.entry(sample.year).or_insert((0.0, 0));
        entry.0 += sample.anomaly;
        entry.1 += 1;
    }
    let points = sums
        .into_iter()
        .map(|(year, (sum, count))| YearPoint {
            year,
            value: sum / count as f64,
        })
        .collect();
    YearSeries::from_points_unchecked(points)
}
