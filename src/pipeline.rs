//! End-to-end forecasting pipeline
//!
//! Holds the validated configuration and benchmark growth table once, then
//! runs the stages in order: growth synthesis, Monte Carlo projection,
//! skill vulnerability, occupation aggregation and, optionally, the country
//! adjustment. Each stage is a plain function of the previous stage's output.

use crate::config::ForecastConfig;
use crate::country::{CountryAdjuster, CountryProfile, CountryTable};
use crate::error::Result;
use crate::growth::{BenchmarkTable, SkillRegistry};
use crate::projection::{ProjectionSet, TrajectoryProjector};
use crate::quality::DataQualityReport;
use crate::skills::{SkillRow, SkillTable};
use crate::tables::CountryTableWriter;
use crate::vulnerability::{
    OccupationAggregator, OccupationVulnerability, SkillVulnerability, VulnerabilityCalculator,
};
use log::{debug, info};
use std::io;

/// Everything produced by one global run
#[derive(Debug, Clone)]
pub struct ForecastOutput {
    pub registry: SkillRegistry,
    pub projections: ProjectionSet,
    pub skill_vulnerability: Vec<SkillVulnerability>,
    pub occupations: Vec<OccupationVulnerability>,
    pub report: DataQualityReport,
}

/// Pre-validated pipeline, reusable across input tables
///
/// # Example
/// ```ignore
/// let pipeline = ForecastPipeline::new(ForecastConfig::default())?;
/// let table = load_skill_table("skills.csv")?;
/// let output = pipeline.run(&table)?;
/// ```
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: ForecastConfig,
    benchmarks: BenchmarkTable,
}

impl ForecastPipeline {
    /// Validate `config` and use the built-in benchmark growth table
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let benchmarks = BenchmarkTable::default_rates(config.fallback_growth_pts);
        Ok(Self { config, benchmarks })
    }

    /// Replace the benchmark growth table
    pub fn with_benchmarks(mut self, benchmarks: BenchmarkTable) -> Self {
        self.benchmarks = benchmarks;
        self
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn benchmarks(&self) -> &BenchmarkTable {
        &self.benchmarks
    }

    /// Run the global stages over a loaded skill table
    pub fn run(&self, table: &SkillTable) -> Result<ForecastOutput> {
        self.run_with_report(&table.rows, table.report.clone())
    }

    /// Run the global stages over rows built in memory
    pub fn run_rows(&self, rows: &[SkillRow]) -> Result<ForecastOutput> {
        let report = DataQualityReport {
            rows_read: rows.len(),
            ..DataQualityReport::default()
        };
        self.run_with_report(rows, report)
    }

    fn run_with_report(&self, rows: &[SkillRow], mut report: DataQualityReport) -> Result<ForecastOutput> {
        info!(
            "Forecasting {} skill rows over {}-{} ({} aggregation)",
            rows.len(),
            self.config.start_year,
            self.config.end_year,
            self.config.aggregation
        );

        let registry = SkillRegistry::build(rows, &self.benchmarks, self.config.duplicate_policy, &mut report)?;
        let projections = TrajectoryProjector::new(&self.config).project_all(&registry)?;
        let skill_vulnerability = VulnerabilityCalculator::new(&self.config).calculate(rows, &projections)?;
        let occupations =
            OccupationAggregator::new(self.config.aggregation).aggregate(&skill_vulnerability, &mut report)?;

        Ok(ForecastOutput {
            registry,
            projections,
            skill_vulnerability,
            occupations,
            report,
        })
    }

    /// Capacity score and adoption multiplier per country, sorted by name
    pub fn country_profiles(&self, countries: &CountryTable) -> Vec<CountryProfile> {
        let mut profiles: Vec<CountryProfile> = countries
            .countries
            .iter()
            .map(CountryProfile::from_indicators)
            .collect();
        profiles.sort_by(|a, b| a.country.cmp(&b.country));
        profiles
    }

    /// Adjust every occupation for every country, writing as it goes
    ///
    /// Only one country's rows are resident at a time. Returns the profiles
    /// in the order they were written.
    pub fn write_countries<W: io::Write>(
        &self,
        writer: W,
        countries: &CountryTable,
        occupations: &[OccupationVulnerability],
    ) -> Result<Vec<CountryProfile>> {
        let adjuster = CountryAdjuster::new(&self.config);
        let mut table_writer = CountryTableWriter::new(writer, &self.config)?;
        let profiles = self.country_profiles(countries);

        for profile in &profiles {
            let rows = adjuster.adjust(profile, occupations)?;
            debug!(
                "{}: capacity {:.3}, multiplier {:.3}, {} occupations",
                profile.country,
                profile.capacity_score,
                profile.adoption_multiplier,
                rows.len()
            );
            table_writer.write_country(&rows)?;
        }

        table_writer.finish()?;
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AggregationMethod, DuplicateSkillPolicy};
    use crate::country::{load_country_table_from_reader, Indicator};
    use crate::error::ForecastError;
    use approx::assert_relative_eq;

    fn small_config() -> ForecastConfig {
        ForecastConfig {
            n_samples: 500,
            ..ForecastConfig::default()
        }
    }

    fn rows() -> Vec<SkillRow> {
        vec![
            SkillRow::new("Developers", "15-1252.00", "Coding", 0.5, 0.4).with_benchmark("HumanEval", 0.8),
            SkillRow::new("Developers", "15-1252.00", "Critical Thinking", 0.3, 0.2)
                .with_benchmark("MMLU", 0.6)
                .with_benchmark("BIG-Bench", 0.4),
            SkillRow::new("Nurses", "29-1141.00", "critical thinking", 0.6, 0.2)
                .with_benchmark("MMLU", 0.6)
                .with_benchmark("BIG-Bench", 0.4),
            SkillRow::new("Nurses", "29-1141.00", "Patient Care", 0.9, 0.05),
        ]
    }

    #[test]
    fn test_coding_scenario_end_to_end() {
        let pipeline = ForecastPipeline::new(small_config()).unwrap();
        let output = pipeline.run_rows(&rows()).unwrap();

        let coding = output.registry.get("coding").unwrap();
        assert_relative_eq!(coding.growth_pts, 16.2, epsilon = 1e-12);

        let projection = output.projections.get("coding").unwrap();
        assert_eq!(projection.deterministic.get(2030), Some(&1.0));

        let record = output
            .skill_vulnerability
            .iter()
            .find(|r| r.skill == "coding")
            .unwrap();
        let median_2030 = record.vulnerability.get(2030).unwrap().median;
        assert_relative_eq!(median_2030, 0.5 * 0.995_f64.powi(6), epsilon = 1e-9);
        assert_relative_eq!(median_2030, 0.4852, epsilon = 1e-4);
    }

    #[test]
    fn test_shared_skill_projected_once() {
        let output = ForecastPipeline::new(small_config()).unwrap().run_rows(&rows()).unwrap();

        assert_eq!(output.registry.len(), 3);
        assert_eq!(output.projections.len(), 3);
        assert_eq!(output.skill_vulnerability.len(), 4);
        assert_eq!(output.report.duplicate_skill_rows, 1);
        assert_eq!(output.report.rows_without_similarity, 1);
        assert_eq!(output.report.conflicting_growth + output.report.conflicting_baseline, 0);
    }

    #[test]
    fn test_occupations_sorted_with_ordered_bands() {
        let output = ForecastPipeline::new(small_config()).unwrap().run_rows(&rows()).unwrap();

        let names: Vec<_> = output.occupations.iter().map(|o| o.occupation.as_str()).collect();
        assert_eq!(names, vec!["Developers", "Nurses"]);
        for occupation in &output.occupations {
            assert_eq!(occupation.vulnerability.len(), 12);
            for (_, band) in occupation.vulnerability.iter() {
                assert!(band.is_ordered());
                assert!(band.within(0.0, 1.0));
            }
        }
    }

    #[test]
    fn test_runs_are_reproducible() {
        let pipeline = ForecastPipeline::new(small_config()).unwrap();
        let first = pipeline.run_rows(&rows()).unwrap();
        let second = pipeline.run_rows(&rows()).unwrap();
        assert_eq!(first.occupations, second.occupations);
        assert_eq!(first.projections, second.projections);
    }

    #[test]
    fn test_max_dominates_mean() {
        let run = |aggregation| {
            let config = ForecastConfig {
                aggregation,
                ..small_config()
            };
            ForecastPipeline::new(config).unwrap().run_rows(&rows()).unwrap().occupations
        };
        let max = run(AggregationMethod::Max);
        let mean = run(AggregationMethod::Mean);

        for (a, b) in max.iter().zip(&mean) {
            for ((_, hi), (_, avg)) in a.vulnerability.iter().zip(b.vulnerability.iter()) {
                assert!(hi.median >= avg.median - 1e-15);
            }
        }
    }

    #[test]
    fn test_reject_policy_stops_on_conflict() {
        let config = ForecastConfig {
            duplicate_policy: DuplicateSkillPolicy::Reject,
            ..small_config()
        };
        let mut conflicting = rows();
        conflicting.push(SkillRow::new("Writers", "27-3043.00", "Coding", 0.2, 0.9));

        let err = ForecastPipeline::new(config).unwrap().run_rows(&conflicting).unwrap_err();
        assert!(matches!(err, ForecastError::ConflictingSkill { ref skill } if skill == "coding"));
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = ForecastConfig {
            n_samples: 0,
            ..ForecastConfig::default()
        };
        let err = ForecastPipeline::new(config).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_benchmark_override() {
        let table = BenchmarkTable::new([("HumanEval", 2.0)], 9.0);
        let pipeline = ForecastPipeline::new(small_config()).unwrap().with_benchmarks(table);
        let output = pipeline.run_rows(&rows()).unwrap();
        assert_relative_eq!(output.registry.get("coding").unwrap().growth_pts, 2.0, epsilon = 1e-12);
        // MMLU and BIG-Bench are no longer known
        assert_relative_eq!(output.registry.get("critical_thinking").unwrap().growth_pts, 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_write_countries_streams_every_pair() {
        let pipeline = ForecastPipeline::new(small_config()).unwrap();
        let output = pipeline.run_rows(&rows()).unwrap();
        let countries = load_country_table_from_reader(
            "Variable,Atlantis,Lemuria\nInternet users (% of population),80,20\n".as_bytes(),
        )
        .unwrap();

        let mut buffer = Vec::new();
        let profiles = pipeline
            .write_countries(&mut buffer, &countries, &output.occupations)
            .unwrap();

        assert_eq!(profiles.len(), 2);
        assert_relative_eq!(
            profiles[0].capacity_score,
            Indicator::Internet.weight() * 0.8,
            epsilon = 1e-12
        );
        assert!(profiles[0].adoption_multiplier > profiles[1].adoption_multiplier);

        let text = String::from_utf8(buffer).unwrap();
        // header plus 2 countries x 2 occupations
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().nth(3).unwrap().starts_with("Lemuria,"));
    }

    #[test]
    fn test_countries_written_in_name_order() {
        let pipeline = ForecastPipeline::new(small_config()).unwrap();
        let output = pipeline.run_rows(&rows()).unwrap();
        let countries = load_country_table_from_reader(
            "Variable,Zembla,Atlantis\nInternet users (% of population),20,80\n".as_bytes(),
        )
        .unwrap();

        let mut buffer = Vec::new();
        let profiles = pipeline
            .write_countries(&mut buffer, &countries, &output.occupations)
            .unwrap();

        let names: Vec<_> = profiles.iter().map(|p| p.country.as_str()).collect();
        assert_eq!(names, vec!["Atlantis", "Zembla"]);
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("Atlantis,"));
        assert!(text.lines().nth(3).unwrap().starts_with("Zembla,"));
    }
}
