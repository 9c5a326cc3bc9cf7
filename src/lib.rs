//! Skill Forecast - Monte Carlo projection of occupational exposure to automation
//!
//! This library provides:
//! - Similarity-weighted growth synthesis from benchmark trends
//! - Seeded Monte Carlo capability trajectories with percentile bands
//! - Demand decay and skill-level vulnerability
//! - Occupation aggregation under max, mean or demand-weighted mean
//! - Country adoption adjustment via a capacity-driven time dilation

pub mod cli;
pub mod config;
pub mod country;
pub mod error;
pub mod growth;
pub mod pipeline;
pub mod projection;
pub mod quality;
pub mod report;
pub mod skills;
pub mod tables;
pub mod vulnerability;

// Re-export commonly used types
pub use config::{AggregationMethod, DuplicateSkillPolicy, ForecastConfig};
pub use country::{load_country_table, CountryProfile, CountryTable};
pub use error::{ForecastError, Result};
pub use growth::{BenchmarkTable, SkillRegistry};
pub use pipeline::{ForecastOutput, ForecastPipeline};
pub use projection::{Band, ProjectionSet, YearSeries};
pub use quality::DataQualityReport;
pub use report::RunSummary;
pub use skills::{load_skill_table, SkillRow, SkillTable};
pub use vulnerability::OccupationVulnerability;
