use rand::Rng;

use crate::config::ReportConfig;
use crate::data::filter::filter_by_year_range;
use crate::data::model::{FilterRange, SmoothingWindow, YearSeries};
use crate::data::smooth::smooth;
use crate::data::table::YearTable;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Filter-then-smooth
// ---------------------------------------------------------------------------

/// Restrict `series` to `range`, then smooth what is left.
///
/// Smoothing only sees the filtered rows, so the first `window - 1` years of
/// the range average fewer than `window` samples. Swapping the two steps
/// gives the same result only for a window of 1.
pub fn filter_then_smooth(
    series: &YearSeries,
    range: FilterRange,
    window: SmoothingWindow,
) -> YearSeries {
    smooth(&filter_by_year_range(series, range), window)
}

// ---------------------------------------------------------------------------
// Report assembly
// ---------------------------------------------------------------------------

/// Generate every configured indicator, filter, smooth and join on year.
pub fn build_report<R: Rng + ?Sized>(config: &ReportConfig, rng: &mut R) -> Result<YearTable> {
    config.validate()?;
    let span = config.span()?;
    let range = config.filter_range()?;

    let mut table = YearTable::default();
    for indicator in &config.indicators {
        let raw = indicator.generate(span, rng)?;
        let prepared = filter_then_smooth(&raw, range, config.window);
        table.push_column(indicator.column_name(), &prepared)?;
    }

    log::info!(
        "built report: {} indicators, {} rows for {range} (window {})",
        config.indicators.len(),
        table.len(),
        config.window.get()
    );
    Ok(table)
}
