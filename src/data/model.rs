use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// YearPoint / YearSeries – one indicator observed once per year
// ---------------------------------------------------------------------------

/// A single annual observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    pub year: i32,
    pub value: f64,
}

impl YearPoint {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Ordered per-year observations.
///
/// Years are strictly increasing with no duplicates. Generators produce a
/// contiguous range; a filtered series is a contiguous subsequence of its
/// source. A series may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearSeries {
    points: Vec<YearPoint>,
}

impl YearSeries {
    /// Validate externally supplied rows.
    pub fn from_points(points: Vec<YearPoint>) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[1].year <= pair[0].year {
                return Err(PipelineError::NonMonotonicYears {
                    previous: pair[0].year,
                    next: pair[1].year,
                });
            }
        }
        Ok(Self { points })
    }

    /// Consecutive years starting at `start_year`, one per value.
    ///
    /// Numbering stops at `i32::MAX`; values past that year are dropped.
    pub fn from_values(start_year: i32, values: impl IntoIterator<Item = f64>) -> Self {
        let points = values
            .into_iter()
            .zip(start_year..=i32::MAX)
            .map(|(value, year)| YearPoint { year, value })
            .collect();
        Self { points }
    }

    /// Caller guarantees strictly increasing years.
    pub(crate) fn from_points_unchecked(points: Vec<YearPoint>) -> Self {
        debug_assert!(points.windows(2).all(|p| p[0].year < p[1].year));
        Self { points }
    }

    pub fn points(&self) -> &[YearPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YearPoint> {
        self.points.iter()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.points.iter().map(|p| p.year)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last year, or `None` for an empty series.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        Some((self.points.first()?.year, self.points.last()?.year))
    }
}

impl<'a> IntoIterator for &'a YearSeries {
    type Item = &'a YearPoint;
    type IntoIter = std::slice::Iter<'a, YearPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// ---------------------------------------------------------------------------
// YearMonth / MonthlySeries – one indicator observed once per month
// ---------------------------------------------------------------------------

/// A calendar month. Orders chronologically; formats as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(PipelineError::InvalidDate(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub const fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    /// The month containing `date`.
    pub fn of(date: &impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Months since year 0.
    fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month - 1)
    }

    fn from_ordinal(ordinal: i64) -> Option<Self> {
        let year = i32::try_from(ordinal.div_euclid(12)).ok()?;
        let month = ordinal.rem_euclid(12) as u32 + 1;
        Some(Self { year, month })
    }

    /// `months` later, or `None` past the representable range.
    pub fn checked_add_months(self, months: usize) -> Option<Self> {
        let months = i64::try_from(months).ok()?;
        Self::from_ordinal(self.ordinal().checked_add(months)?)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = PipelineError;

    /// Accepts `YYYY-MM` or a full `YYYY-MM-DD` date; the day is dropped.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d"))
            .map(|date| YearMonth::of(&date))
            .map_err(|_| PipelineError::InvalidDate(s.to_string()))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = PipelineError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}

/// A single monthly observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthPoint {
    pub date: YearMonth,
    pub value: f64,
}

impl MonthPoint {
    pub fn new(date: YearMonth, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ordered per-month observations, months strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    points: Vec<MonthPoint>,
}

impl MonthlySeries {
    /// Validate externally supplied rows.
    pub fn from_points(points: Vec<MonthPoint>) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(PipelineError::NonMonotonicMonths {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { points })
    }

    /// Caller guarantees strictly increasing months.
    pub(crate) fn from_points_unchecked(points: Vec<MonthPoint>) -> Self {
        debug_assert!(points.windows(2).all(|p| p[0].date < p[1].date));
        Self { points }
    }

    pub fn points(&self) -> &[MonthPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonthPoint> {
        self.points.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = YearMonth> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Replace NaN values with the last non-NaN value before them.
    ///
    /// Leading NaNs have nothing to carry forward and stay NaN.
    pub fn forward_fill(&self) -> MonthlySeries {
        let mut last: Option<f64> = None;
        let points = self
            .points
            .iter()
            .map(|p| {
                if p.value.is_nan() {
                    MonthPoint {
                        date: p.date,
                        value: last.unwrap_or(f64::NAN),
                    }
                } else {
                    last = Some(p.value);
                    *p
                }
            })
            .collect();
        MonthlySeries { points }
    }
}

// ---------------------------------------------------------------------------
// SpatialAnomalySample – one cell of the year × lat × lon grid
// ---------------------------------------------------------------------------

/// Latitude extent of the anomaly grid, degrees.
pub const LATITUDE_BOUNDS: (f64, f64) = (-60.0, 60.0);
/// Longitude extent of the anomaly grid, degrees.
pub const LONGITUDE_BOUNDS: (f64, f64) = (-180.0, 180.0);

/// Synthetic temperature deviation at one grid point in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialAnomalySample {
    pub year: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub anomaly: f64,
}

// ---------------------------------------------------------------------------
// FilterRange / SmoothingWindow – validated transform parameters
// ---------------------------------------------------------------------------

/// Inclusive year range, `start_year <= end_year`.
///
/// Serialized as a two-element array `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[i32; 2]", into = "[i32; 2]")]
pub struct FilterRange {
    start_year: i32,
    end_year: i32,
}

impl FilterRange {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self> {
        if end_year < start_year {
            return Err(PipelineError::InvalidRange {
                start: start_year,
                end: end_year,
            });
        }
        Ok(Self {
            start_year,
            end_year,
        })
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }

    /// Number of years covered, at least one.
    pub fn year_count(&self) -> usize {
        (i64::from(self.end_year) - i64::from(self.start_year) + 1) as usize
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start_year..=self.end_year
    }
}

impl TryFrom<[i32; 2]> for FilterRange {
    type Error = PipelineError;

    fn try_from([start, end]: [i32; 2]) -> Result<Self> {
        FilterRange::new(start, end)
    }
}

impl From<FilterRange> for [i32; 2] {
    fn from(range: FilterRange) -> Self {
        [range.start_year, range.end_year]
    }
}

impl fmt::Display for FilterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.start_year, self.end_year)
    }
}

/// Trailing moving-average window, at least one sample wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SmoothingWindow(usize);

impl SmoothingWindow {
    pub fn new(size: usize) -> Result<Self> {
        if size < 1 {
            return Err(PipelineError::InvalidWindow(size));
        }
        Ok(Self(size))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for SmoothingWindow {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<usize> for SmoothingWindow {
    type Error = PipelineError;

    fn try_from(size: usize) -> Result<Self> {
        SmoothingWindow::new(size)
    }
}

impl From<SmoothingWindow> for usize {
    fn from(window: SmoothingWindow) -> Self {
        window.0
    }
}
