use thiserror::Error;

use crate::data::model::YearMonth;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Input-validation failures raised by the generators and transforms.
///
/// Every variant is a fail-fast check on caller-supplied parameters; an empty
/// filter result is a valid output and never an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// `end` lies before `start`.
    #[error("invalid year range: end year {end} is before start year {start}")]
    InvalidRange { start: i32, end: i32 },

    /// Smoothing window must be at least one sample wide.
    #[error("invalid smoothing window {0}: must be at least 1")]
    InvalidWindow(usize),

    /// Noise standard deviation is negative or not finite.
    #[error("invalid noise standard deviation {0}: must be finite and >= 0")]
    InvalidNoise(f64),

    /// Externally supplied rows are not strictly increasing by year.
    #[error("years must be strictly increasing: {next} follows {previous}")]
    NonMonotonicYears { previous: i32, next: i32 },

    /// Externally supplied rows are not strictly increasing by month.
    #[error("months must be strictly increasing: {next} follows {previous}")]
    NonMonotonicMonths { previous: YearMonth, next: YearMonth },

    /// Text or numbers that do not form a calendar month.
    #[error("invalid date '{0}': expected YYYY-MM or YYYY-MM-DD")]
    InvalidDate(String),

    /// Two rows for the same date carry different values.
    #[error("conflicting values for {date}: {first} and {second}")]
    ConflictingDuplicate { date: String, first: f64, second: f64 },

    /// Grid dimensions whose row count does not fit in memory addressing.
    #[error("spatial grid too large: {years} years × {lat_count} × {lon_count} overflows")]
    GridTooLarge {
        years: usize,
        lat_count: usize,
        lon_count: usize,
    },

    /// A column joined into a report table has a different year axis.
    #[error("column '{column}' does not share the report's year axis")]
    MismatchedYears { column: String },

    /// Two report columns share a name.
    #[error("duplicate report column '{0}'")]
    DuplicateColumn(String),

    /// Name does not match any known indicator.
    #[error("unknown indicator '{0}'")]
    UnknownIndicator(String),
}
