//! Data layer: core types, synthesis, transforms and export.
//!
//! Architecture:
//! ```text
//!   presets / parameters          observed monthly CSV
//!        │                               │
//!        ▼                               ▼
//!   ┌──────────┐                   ┌──────────┐
//!   │ generate  │                  │  clean    │  cutoff, dedup, forward-fill
//!   └──────────┘                   └──────────┘
//!        │  YearSeries, SpatialAnomalies,      │
//!        │  MonthlySeries ◄────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  keep years in FilterRange
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  smooth   │  trailing moving average
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  table    │  join on year → YearTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  .csv / .json / .parquet (monthly series go here directly)
//!   └──────────┘
//! ```

pub mod clean;
pub mod export;
pub mod filter;
pub mod generate;
pub mod model;
pub mod presets;
pub mod smooth;
pub mod table;
