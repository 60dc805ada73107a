use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::data::generate::SpatialGrid;
use crate::data::model::{FilterRange, SmoothingWindow};
use crate::data::presets::Indicator;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Report parameters
// ---------------------------------------------------------------------------

/// Every knob of a report run, passed explicitly into the pipeline.
///
/// Missing fields fall back to [`ReportConfig::default`], so a JSON file only
/// needs to name what it changes:
///
/// ```json
/// { "filter": [2005, 2015], "window": 3, "seed": 42 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// First generated year.
    pub start_year: i32,
    /// Last generated year.
    pub end_year: i32,
    /// Years kept in the report; the full generated span when absent.
    pub filter: Option<FilterRange>,
    /// Trailing moving-average window applied after filtering.
    pub window: SmoothingWindow,
    /// RNG seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    /// Report columns, in order.
    pub indicators: Vec<Indicator>,
    /// Spatial anomaly grid parameters.
    pub grid: SpatialGrid,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            start_year: 2000,
            end_year: 2019,
            filter: None,
            window: SmoothingWindow::default(),
            seed: None,
            indicators: Indicator::ALL.to_vec(),
            grid: SpatialGrid::default(),
        }
    }
}

impl ReportConfig {
    /// Read a config from a JSON file.
    pub fn from_json_file(path: &Path) -> AnyResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: ReportConfig =
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("validating config {}", path.display()))?;
        Ok(config)
    }

    /// Check year spans and the grid before anything is generated.
    pub fn validate(&self) -> Result<()> {
        self.span()?;
        self.grid.validate()
    }

    /// Full generated span.
    pub fn span(&self) -> Result<FilterRange> {
        FilterRange::new(self.start_year, self.end_year)
    }

    /// Years kept after filtering.
    pub fn filter_range(&self) -> Result<FilterRange> {
        match self.filter {
            Some(range) => Ok(range),
            None => self.span(),
        }
    }

    /// Seeded RNG for this run.
    pub fn rng(&self) -> ChaCha8Rng {
        let seed = self.seed.unwrap_or_else(|| {
            let seed = rand::thread_rng().gen();
            log::info!("no seed configured; using {seed}");
            seed
        });
        ChaCha8Rng::seed_from_u64(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ReportConfig =
            serde_json::from_str(r#"{ "filter": [2005, 2015], "window": 3, "seed": 42 }"#).unwrap();
        assert_eq!(config.start_year, 2000);
        assert_eq!(config.end_year, 2019);
        assert_eq!(config.window.get(), 3);
        assert_eq!(config.filter_range().unwrap(), FilterRange::new(2005, 2015).unwrap());
        assert_eq!(config.indicators, Indicator::ALL.to_vec());
    }

    #[test]
    fn indicators_parse_by_slug() {
        let config: ReportConfig =
            serde_json::from_str(r#"{ "indicators": ["coral-bleaching", "fishery-output"] }"#).unwrap();
        assert_eq!(
            config.indicators,
            vec![Indicator::CoralBleaching, Indicator::FisheryOutput]
        );
    }

    #[test]
    fn reversed_span_fails_validation() {
        let config = ReportConfig {
            start_year: 2010,
            end_year: 2000,
            ..ReportConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(PipelineError::InvalidRange {
                start: 2010,
                end: 2000
            })
        );
    }

    #[test]
    fn grid_problems_fail_validation() {
        let config = ReportConfig {
            grid: SpatialGrid {
                noise_std_dev: -0.5,
                ..SpatialGrid::default()
            },
            ..ReportConfig::default()
        };
        assert_eq!(config.validate(), Err(PipelineError::InvalidNoise(-0.5)));

        let config = ReportConfig {
            grid: SpatialGrid {
                start_year: 2025,
                end_year: 1990,
                ..SpatialGrid::default()
            },
            ..ReportConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(PipelineError::InvalidRange {
                start: 2025,
                end: 1990
            })
        );

        let parsed: ReportConfig =
            serde_json::from_str(r#"{ "grid": { "noise_std_dev": -1.0 } }"#).unwrap();
        assert_eq!(parsed.validate(), Err(PipelineError::InvalidNoise(-1.0)));
    }

    #[test]
    fn invalid_window_rejected_while_parsing() {
        assert!(serde_json::from_str::<ReportConfig>(r#"{ "window": 0 }"#).is_err());
    }

    #[test]
    fn seeded_rngs_agree() {
        let config = ReportConfig {
            seed: Some(11),
            ..ReportConfig::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "start_year": 1995, "end_year": 2005, "seed": 1 }}"#).unwrap();
        let config = ReportConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.span().unwrap(), FilterRange::new(1995, 2005).unwrap());

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, r#"{{ "start_year": 2005, "end_year": 1995 }}"#).unwrap();
        assert!(ReportConfig::from_json_file(bad.path()).is_err());
    }
}
