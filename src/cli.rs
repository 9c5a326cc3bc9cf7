//! Command-line configuration shared by the binaries
//!
//! Values resolve in order: built-in defaults, then the JSON file given with
//! `--config`, then individual flags.

use crate::config::{AggregationMethod, DuplicateSkillPolicy, ForecastConfig};
use crate::error::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// First projected year
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last projected year (inclusive)
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Monte Carlo samples per skill
    #[arg(long)]
    pub samples: Option<usize>,

    /// Growth standard deviation as a fraction of |growth|
    #[arg(long)]
    pub growth_sd: Option<f64>,

    /// Base random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Growth (pts/year) for skills without usable benchmarks
    #[arg(long)]
    pub fallback_growth: Option<f64>,

    /// Annual demand decay rate
    #[arg(long)]
    pub decay_rate: Option<f64>,

    /// Occupation aggregation: max, mean or weighted_mean
    #[arg(long)]
    pub aggregation: Option<String>,

    /// Duplicate skill policy: keep_first or reject
    #[arg(long)]
    pub duplicates: Option<String>,
}

impl ConfigArgs {
    /// Merge file and flag values over the defaults, then validate
    pub fn resolve(&self) -> Result<ForecastConfig> {
        let mut config = match &self.config {
            Some(path) => ForecastConfig::from_json_path(path)?,
            None => ForecastConfig::default(),
        };

        if let Some(v) = self.start_year {
            config.start_year = v;
        }
        if let Some(v) = self.end_year {
            config.end_year = v;
        }
        if let Some(v) = self.samples {
            config.n_samples = v;
        }
        if let Some(v) = self.growth_sd {
            config.growth_sd_fraction = v;
        }
        if let Some(v) = self.seed {
            config.random_seed = v;
        }
        if let Some(v) = self.fallback_growth {
            config.fallback_growth_pts = v;
        }
        if let Some(v) = self.decay_rate {
            config.demand_decay_rate = v;
        }
        if let Some(name) = &self.aggregation {
            config.aggregation = name.parse::<AggregationMethod>()?;
        }
        if let Some(name) = &self.duplicates {
            config.duplicate_policy = name.parse::<DuplicateSkillPolicy>()?;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.config.resolve().unwrap(), ForecastConfig::default());
    }

    #[test]
    fn test_flags_override() {
        let cli = TestCli::parse_from([
            "test",
            "--samples",
            "100",
            "--aggregation",
            "weighted_mean",
            "--end-year",
            "2030",
            "--duplicates",
            "reject",
        ]);
        let config = cli.config.resolve().unwrap();
        assert_eq!(config.n_samples, 100);
        assert_eq!(config.aggregation, AggregationMethod::WeightedMean);
        assert_eq!(config.end_year, 2030);
        assert_eq!(config.duplicate_policy, DuplicateSkillPolicy::Reject);
        assert_eq!(config.random_seed, 42);
    }

    #[test]
    fn test_bad_flag_values() {
        let cli = TestCli::parse_from(["test", "--aggregation", "sum"]);
        assert!(matches!(cli.config.resolve(), Err(ForecastError::UnknownPolicy { .. })));

        let cli = TestCli::parse_from(["test", "--start-year", "2040"]);
        assert!(matches!(cli.config.resolve(), Err(ForecastError::InvalidConfig { .. })));
    }

    #[test]
    fn test_missing_config_file() {
        let cli = TestCli::parse_from(["test", "--config", "/nonexistent/forecast.json"]);
        assert!(matches!(cli.config.resolve(), Err(ForecastError::MissingInput { .. })));
    }
}
