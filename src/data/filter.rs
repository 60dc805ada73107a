use super::model::{FilterRange, SpatialAnomalySample, YearSeries};

// ---------------------------------------------------------------------------
// Year-range selection
// ---------------------------------------------------------------------------

/// Rows of `series` whose year lies in `range`, order preserved.
///
/// A range that misses the series entirely yields an empty series. The
/// source is not modified, and filtering twice with the same range is the
/// same as filtering once.
pub fn filter_by_year_range(series: &YearSeries, range: FilterRange) -> YearSeries {
    let points = series
        .iter()
        .filter(|p| range.contains(p.year))
        .copied()
        .collect();
    YearSeries::from_points_unchecked(points)
}

/// Lazily keep the spatial samples whose year lies in `range`.
pub fn filter_samples_by_year<I>(
    samples: I,
    range: FilterRange,
) -> impl Iterator<Item = SpatialAnomalySample>
where
    I: IntoIterator<Item = SpatialAnomalySample>,
{
    samples
        .into_iter()
        .filter(move |s| range.contains(s.year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::YearPoint;

    fn decade() -> YearSeries {
        YearSeries::from_values(2000, (0..10).map(f64::from))
    }

    #[test]
    fn keeps_inclusive_bounds() {
        let filtered = filter_by_year_range(&decade(), FilterRange::new(2003, 2005).unwrap());
        assert_eq!(
            filtered.points(),
            &[
                YearPoint::new(2003, 3.0),
                YearPoint::new(2004, 4.0),
                YearPoint::new(2005, 5.0)
            ]
        );
    }

    #[test]
    fn disjoint_range_is_empty_not_an_error() {
        let filtered = filter_by_year_range(&decade(), FilterRange::new(1950, 1960).unwrap());
        assert!(filtered.is_empty());
    }

    #[test]
    fn range_wider_than_series_keeps_everything() {
        let series = decade();
        let filtered = filter_by_year_range(&series, FilterRange::new(1900, 2100).unwrap());
        assert_eq!(filtered, series);
    }

    #[test]
    fn filtering_is_idempotent() {
        let range = FilterRange::new(2002, 2007).unwrap();
        let once = filter_by_year_range(&decade(), range);
        let twice = filter_by_year_range(&once, range);
        assert_eq!(once, twice);
    }

    #[test]
    fn spatial_filter_drops_other_years() {
        let samples = (1990..1995).map(|year| SpatialAnomalySample {
            year,
            latitude: 0.0,
            longitude: 0.0,
            anomaly: 0.0,
        });
        let years: Vec<i32> = filter_samples_by_year(samples, FilterRange::new(1991, 1992).unwrap())
            .map(|s| s.year)
            .collect();
        assert_eq!(years, vec![1991, 1992]);
    }
}
