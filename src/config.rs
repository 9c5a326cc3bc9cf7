//! Run configuration
//!
//! One immutable [`ForecastConfig`] is built at start-up and passed by
//! reference to every stage.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// How skill-level vulnerability reduces to one occupation-level value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    /// Bottleneck: the single most exposed skill sets the occupation value
    Max,
    /// Unweighted average over the occupation's skills
    Mean,
    /// Average weighted by each skill row's start-year demand
    WeightedMean,
}

impl AggregationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::Max => "max",
            AggregationMethod::Mean => "mean",
            AggregationMethod::WeightedMean => "weighted_mean",
        }
    }
}

impl FromStr for AggregationMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "max" => Ok(AggregationMethod::Max),
            "mean" => Ok(AggregationMethod::Mean),
            "weighted_mean" => Ok(AggregationMethod::WeightedMean),
            other => Err(ForecastError::UnknownPolicy { name: other.to_string() }),
        }
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when several rows carry the same standardized skill name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSkillPolicy {
    /// Keep the first row's growth rate and baseline; count the conflicts
    KeepFirst,
    /// Abort the run on the first conflicting duplicate
    Reject,
}

impl FromStr for DuplicateSkillPolicy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "keep_first" => Ok(DuplicateSkillPolicy::KeepFirst),
            "reject" => Ok(DuplicateSkillPolicy::Reject),
            other => Err(ForecastError::UnknownDuplicatePolicy { name: other.to_string() }),
        }
    }
}

/// Configuration for a forecasting run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastConfig {
    /// First projected year; baseline capability and demand refer to it
    pub start_year: i32,

    /// Last projected year (inclusive)
    pub end_year: i32,

    /// Monte Carlo draws per distinct skill
    pub n_samples: usize,

    /// Standard deviation of the sampled growth as a fraction of |growth|
    pub growth_sd_fraction: f64,

    /// Base seed; skill `i` (first-appearance order) uses `random_seed + i`
    pub random_seed: u64,

    /// Growth rate (pts/year) used when a skill has no usable benchmark data
    pub fallback_growth_pts: f64,

    /// Annual geometric decay applied to skill demand
    pub demand_decay_rate: f64,

    /// Occupation-level reduction policy
    pub aggregation: AggregationMethod,

    /// Resolution of duplicate skill names
    pub duplicate_policy: DuplicateSkillPolicy,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            start_year: 2024,
            end_year: 2035,
            n_samples: 2000,
            growth_sd_fraction: 0.20,
            random_seed: 42,
            fallback_growth_pts: 9.0,
            demand_decay_rate: 0.005,
            aggregation: AggregationMethod::Max,
            duplicate_policy: DuplicateSkillPolicy::KeepFirst,
        }
    }
}

/// On-disk form of the configuration; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    start_year: Option<i32>,
    end_year: Option<i32>,
    n_samples: Option<usize>,
    growth_sd_fraction: Option<f64>,
    random_seed: Option<u64>,
    fallback_growth_pts: Option<f64>,
    demand_decay_rate: Option<f64>,
    aggregation: Option<String>,
    duplicate_policy: Option<String>,
}

impl ForecastConfig {
    /// Load a JSON config file; missing fields keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ForecastError::MissingInput {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_reader(file)
    }

    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let raw: ConfigFile = serde_json::from_reader(reader)?;
        let defaults = Self::default();

        let config = Self {
            start_year: raw.start_year.unwrap_or(defaults.start_year),
            end_year: raw.end_year.unwrap_or(defaults.end_year),
            n_samples: raw.n_samples.unwrap_or(defaults.n_samples),
            growth_sd_fraction: raw.growth_sd_fraction.unwrap_or(defaults.growth_sd_fraction),
            random_seed: raw.random_seed.unwrap_or(defaults.random_seed),
            fallback_growth_pts: raw.fallback_growth_pts.unwrap_or(defaults.fallback_growth_pts),
            demand_decay_rate: raw.demand_decay_rate.unwrap_or(defaults.demand_decay_rate),
            aggregation: match raw.aggregation {
                Some(name) => name.parse()?,
                None => defaults.aggregation,
            },
            duplicate_policy: match raw.duplicate_policy {
                Some(name) => name.parse()?,
                None => defaults.duplicate_policy,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range scalars before any input is read
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(ForecastError::InvalidConfig { reason });

        if self.end_year < self.start_year {
            return invalid(format!(
                "end_year {} precedes start_year {}",
                self.end_year, self.start_year
            ));
        }
        if self.n_samples == 0 {
            return invalid("n_samples must be at least 1".to_string());
        }
        if !self.growth_sd_fraction.is_finite() || self.growth_sd_fraction < 0.0 {
            return invalid(format!(
                "growth_sd_fraction must be a non-negative number, got {}",
                self.growth_sd_fraction
            ));
        }
        if !(0.0..1.0).contains(&self.demand_decay_rate) {
            return invalid(format!(
                "demand_decay_rate must lie in [0, 1), got {}",
                self.demand_decay_rate
            ));
        }
        if !self.fallback_growth_pts.is_finite() {
            return invalid("fallback_growth_pts must be finite".to_string());
        }
        Ok(())
    }

    /// Projected years in order, inclusive of both ends
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.end_year
    }

    pub fn year_count(&self) -> usize {
        (self.end_year - self.start_year + 1).max(0) as usize
    }
}
