use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::generate::{MonthlyParams, SeriesParams};
use super::model::{FilterRange, YearMonth, YearSeries};
use crate::error::{PipelineError, Result};

/// Number of annual rows each preset was calibrated over (2000–2019).
pub const REFERENCE_SPAN_YEARS: u32 = 20;

// ---------------------------------------------------------------------------
// Indicator presets
// ---------------------------------------------------------------------------

/// The report's synthetic indicators.
///
/// Each preset is a straight line from a starting to an ending level over the
/// reference span, plus Gaussian noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    /// Mean sea temperature around the Korean peninsula, °C.
    KoreaSeaTemperature,
    /// Global mean sea-surface temperature, °C.
    GlobalSeaTemperature,
    /// Share of surveyed reefs showing bleaching, %.
    CoralBleaching,
    /// Native fish population index.
    NativeFishStock,
    /// Fishery production, tonnes.
    FisheryOutput,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::KoreaSeaTemperature,
        Indicator::GlobalSeaTemperature,
        Indicator::CoralBleaching,
        Indicator::NativeFishStock,
        Indicator::FisheryOutput,
    ];

    /// Column name used in exported tables.
    pub fn column_name(self) -> &'static str {
        match self {
            Indicator::KoreaSeaTemperature => "korea_sea_temp_c",
            Indicator::GlobalSeaTemperature => "global_sea_temp_c",
            Indicator::CoralBleaching => "coral_bleaching_pct",
            Indicator::NativeFishStock => "native_fish_stock",
            Indicator::FisheryOutput => "fishery_output_t",
        }
    }

    /// Kebab-case name accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Indicator::KoreaSeaTemperature => "korea-sea-temperature",
            Indicator::GlobalSeaTemperature => "global-sea-temperature",
            Indicator::CoralBleaching => "coral-bleaching",
            Indicator::NativeFishStock => "native-fish-stock",
            Indicator::FisheryOutput => "fishery-output",
        }
    }

    /// (start level, end level, noise σ) over the reference span.
    fn levels(self) -> (f64, f64, f64) {
        match self {
            Indicator::KoreaSeaTemperature => (15.0, 18.0, 0.2),
            Indicator::GlobalSeaTemperature => (14.0, 16.0, 0.2),
            Indicator::CoralBleaching => (10.0, 45.0, 2.0),
            Indicator::NativeFishStock => (500.0, 300.0, 10.0),
            Indicator::FisheryOutput => (1000.0, 700.0, 20.0),
        }
    }

    pub fn params(self) -> SeriesParams {
        let (start, end, noise_std_dev) = self.levels();
        SeriesParams {
            base_value: start,
            trend_per_year: (end - start) / f64::from(REFERENCE_SPAN_YEARS - 1),
            noise_std_dev,
        }
    }

    pub fn generate<R: Rng + ?Sized>(self, range: FilterRange, rng: &mut R) -> Result<YearSeries> {
        self.params().generate(range, rng)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Indicator {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Indicator::ALL
            .into_iter()
            .find(|i| {
                i.slug().eq_ignore_ascii_case(wanted) || i.column_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| PipelineError::UnknownIndicator(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Monthly fallback
// ---------------------------------------------------------------------------

/// Global mean sea-surface temperature, one value per month for twenty years
/// from January 2000, rising from 24 °C to 28 °C with σ = 0.2 °C noise.
///
/// Stands in for an observed monthly record when none is supplied.
pub fn monthly_sea_surface_temperature() -> MonthlyParams {
    MonthlyParams {
        start: YearMonth::january(2000),
        months: 240,
        first_value: 24.0,
        last_value: 28.0,
        noise_std_dev: 0.2,
    }
}
