use super::model::{SpatialAnomalySample, YearSeries};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// YearTable – a year column plus named float columns
// ---------------------------------------------------------------------------

/// Column-oriented table handed to exporters.
///
/// Report tables join indicator series on a shared, strictly increasing year
/// axis. Spatial tables repeat each year once per grid cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearTable {
    years: Vec<i32>,
    columns: Vec<(String, Vec<f64>)>,
}

impl YearTable {
    /// Join named series that share the same years.
    pub fn from_series<I, S>(named: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, YearSeries)>,
        S: Into<String>,
    {
        let mut table = YearTable::default();
        for (name, series) in named {
            table.push_column(name, &series)?;
        }
        Ok(table)
    }

    /// `year,latitude,longitude,anomaly` rows, in sample order.
    pub fn from_samples(samples: impl IntoIterator<Item = SpatialAnomalySample>) -> Self {
        let samples = samples.into_iter();
        let capacity = samples.size_hint().0;
        let mut years = Vec::with_capacity(capacity);
        let mut latitudes = Vec::with_capacity(capacity);
        let mut longitudes = Vec::with_capacity(capacity);
        let mut anomalies = Vec::with_capacity(capacity);
        for s in samples {
            years.push(s.year);
            latitudes.push(s.latitude);
            longitudes.push(s.longitude);
            anomalies.push(s.anomaly);
        }
        YearTable {
            years,
            columns: vec![
                ("latitude".to_string(), latitudes),
                ("longitude".to_string(), longitudes),
                ("anomaly".to_string(), anomalies),
            ],
        }
    }

    /// Append a column. The first column fixes the year axis.
    pub fn push_column(&mut self, name: impl Into<String>, series: &YearSeries) -> Result<()> {
        let name = name.into();
        if self.columns.iter().any(|(existing, _)| *existing == name) {
            return Err(PipelineError::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.years = series.years().collect();
        } else if !series.years().eq(self.years.iter().copied()) {
            return Err(PipelineError::MismatchedYears { column: name });
        }
        log::debug!("table column '{name}': {} rows", series.len());
        self.columns.push((name, series.values().collect()));
        Ok(())
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Values of row `index`, one per column.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.years.len() {
            return None;
        }
        Some(self.columns.iter().map(|(_, values)| values[index]).collect())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

impl From<&YearSeries> for YearTable {
    /// `year,value` table of a single series.
    fn from(series: &YearSeries) -> Self {
        YearTable {
            years: series.years().collect(),
            columns: vec![("value".to_string(), series.values().collect())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_and_duplicate_columns() {
        let a = YearSeries::from_values(2000, [1.0, 2.0]);
        let b = YearSeries::from_values(2001, [1.0, 2.0]);

        let mut table = YearTable::default();
        table.push_column("a", &a).unwrap();
        assert_eq!(
            table.push_column("b", &b),
            Err(PipelineError::MismatchedYears { column: "b".into() })
        );
        assert_eq!(
            table.push_column("a", &a),
            Err(PipelineError::DuplicateColumn("a".into()))
        );
        assert_eq!(table.row(1), Some(vec![2.0]));
        assert_eq!(table.row(2), None);
    }

    #[test]
    fn joins_series_in_order() {
        let table = YearTable::from_series([
            ("temp", YearSeries::from_values(2000, [14.0, 14.5])),
            ("fish", YearSeries::from_values(2000, [500.0, 480.0])),
        ])
        .unwrap();
        assert_eq!(table.years(), &[2000, 2001]);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["temp", "fish"]);
        assert_eq!(table.column("fish"), Some(&[500.0, 480.0][..]));
        assert_eq!(table.column("coral"), None);
    }

    #[test]
    fn single_series_becomes_year_value() {
        let series = YearSeries::from_values(1999, [0.5]);
        let table = YearTable::from(&series);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["value"]);
        assert_eq!(table.row(0), Some(vec![0.5]));
    }

    #[test]
    fn samples_keep_repeated_years() {
        let samples = [(-60.0, -180.0), (60.0, 180.0)].map(|(latitude, longitude)| {
            SpatialAnomalySample {
                year: 2000,
                latitude,
                longitude,
                anomaly: 0.25,
            }
        });
        let table = YearTable::from_samples(samples);
        assert_eq!(table.years(), &[2000, 2000]);
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["latitude", "longitude", "anomaly"]
        );
        assert_eq!(table.row(1), Some(vec![60.0, 180.0, 0.25]));
    }
}
