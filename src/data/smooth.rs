use super::model::{SmoothingWindow, YearPoint, YearSeries};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Trailing moving average
// ---------------------------------------------------------------------------

/// Trailing moving average with a minimum of one contributing sample.
///
/// Output value `i` is the mean of input values `max(0, i - window + 1)..=i`,
/// so the first `window - 1` rows average fewer than `window` samples. Years
/// and length are unchanged, and a window of 1 returns the input values.
///
/// Fails with [`PipelineError::InvalidWindow`](crate::error::PipelineError::InvalidWindow)
/// when `window` is 0.
pub fn moving_average(series: &YearSeries, window: usize) -> Result<YearSeries> {
    let window = SmoothingWindow::new(window)?;
    Ok(smooth(series, window))
}

/// [`moving_average`] with an already validated window.
pub fn smooth(series: &YearSeries, window: SmoothingWindow) -> YearSeries {
    let size = window.get();
    let points = series.points();
    let smoothed = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let start = (i + 1).saturating_sub(size);
            let segment = &points[start..=i];
            let sum: f64 = segment.iter().map(|q| q.value).sum();
            YearPoint {
                year: p.year,
                value: sum / segment.len() as f64,
            }
        })
        .collect();
    YearSeries::from_points_unchecked(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use approx::assert_relative_eq;

    #[test]
    fn window_of_two_averages_pairs() {
        let series = YearSeries::from_values(2000, [10.0, 20.0, 30.0]);
        let smoothed = moving_average(&series, 2).unwrap();
        assert_eq!(
            smoothed.points(),
            &[
                YearPoint::new(2000, 10.0),
                YearPoint::new(2001, 15.0),
                YearPoint::new(2002, 25.0)
            ]
        );
    }

    #[test]
    fn window_of_one_is_identity() {
        let series = YearSeries::from_values(1990, [3.25, -1.5, 7.125, 0.1, 1e9]);
        assert_eq!(moving_average(&series, 1).unwrap(), series);
    }

    #[test]
    fn window_wider_than_series_is_a_running_mean() {
        let series = YearSeries::from_values(2000, [1.0, 2.0, 3.0, 4.0]);
        let smoothed: Vec<f64> = moving_average(&series, 10).unwrap().values().collect();
        for (got, want) in smoothed.iter().zip([1.0, 1.5, 2.0, 2.5]) {
            assert_relative_eq!(*got, want);
        }
    }

    #[test]
    fn empty_series_stays_empty() {
        let smoothed = moving_average(&YearSeries::default(), 3).unwrap();
        assert!(smoothed.is_empty());
    }

    #[test]
    fn zero_window_is_rejected() {
        let series = YearSeries::from_values(2000, [1.0, 2.0]);
        assert_eq!(moving_average(&series, 0), Err(PipelineError::InvalidWindow(0)));
    }
}
