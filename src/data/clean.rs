use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result as AnyResult};

use super::model::{MonthPoint, MonthlySeries, YearMonth};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Loading observed monthly records
// ---------------------------------------------------------------------------

/// Read `date,value` rows from a CSV file. See [`read_monthly_csv`].
pub fn load_monthly_csv(path: &Path) -> AnyResult<Vec<MonthPoint>> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_monthly_csv(file).with_context(|| format!("reading {}", path.display()))
}

/// Expected columns (any order, extra columns ignored):
/// * `date`  – `YYYY-MM` or `YYYY-MM-DD`
/// * `value` – a float; an empty cell is a missing value (NaN)
///
/// Rows are returned in file order, uncleaned.
pub fn read_monthly_csv<R: Read>(reader: R) -> AnyResult<Vec<MonthPoint>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let date_idx = headers
        .iter()
        .position(|h| h.trim() == "date")
        .context("CSV missing 'date' column")?;
    let value_idx = headers
        .iter()
        .position(|h| h.trim() == "value")
        .context("CSV missing 'value' column")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let date: YearMonth = record
            .get(date_idx)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("CSV row {row_no}: date"))?;

        let cell = record.get(value_idx).unwrap_or("").trim();
        let value = if cell.is_empty() {
            f64::NAN
        } else {
            cell.parse::<f64>()
                .with_context(|| format!("CSV row {row_no}: cannot parse value '{cell}'"))?
        };

        rows.push(MonthPoint::new(date, value));
    }

    log::debug!("read {} monthly rows", rows.len());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Turn raw monthly rows into a [`MonthlySeries`]:
///
/// 1. drop rows dated after `last_month` (records from the future),
/// 2. order by date, keeping file order among equal dates,
/// 3. drop exact duplicate rows,
/// 4. carry the last known value forward over missing ones.
///
/// Two rows for the same month with different values are an error, since
/// neither can be preferred.
pub fn clean_monthly(mut rows: Vec<MonthPoint>, last_month: YearMonth) -> Result<MonthlySeries> {
    let raw = rows.len();
    rows.retain(|row| row.date <= last_month);
    let future = raw - rows.len();
    if future > 0 {
        log::info!("dropped {future} rows dated after {last_month}");
    }

    rows.sort_by_key(|row| row.date);

    let mut kept: Vec<MonthPoint> = Vec::with_capacity(rows.len());
    for row in rows {
        match kept.last() {
            Some(prev) if prev.date == row.date => {
                if !same_value(prev.value, row.value) {
                    return Err(PipelineError::ConflictingDuplicate {
                        date: row.date.to_string(),
                        first: prev.value,
                        second: row.value,
                    });
                }
            }
            _ => kept.push(row),
        }
    }

    let duplicates = raw - future - kept.len();
    if duplicates > 0 {
        log::info!("dropped {duplicates} duplicate rows");
    }

    let missing = kept.iter().filter(|row| row.value.is_nan()).count();
    if missing > 0 {
        log::debug!("forward-filling {missing} missing values");
    }
    Ok(MonthlySeries::from_points_unchecked(kept).forward_fill())
}
