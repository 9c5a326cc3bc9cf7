//! Run summary for console and JSON output

use crate::config::ForecastConfig;
use crate::country::CountryProfile;
use crate::pipeline::ForecastOutput;
use crate::projection::Band;
use crate::quality::DataQualityReport;
use crate::vulnerability::OccupationVulnerability;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of occupations listed at each end of the ranking
pub const DEFAULT_RANK_COUNT: usize = 10;

/// Distribution of synthesized growth rates across distinct skills (pts/year)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl GrowthStats {
    /// `None` for an empty slice
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        Some(Self {
            mean: sorted.iter().sum::<f64>() / n as f64,
            median,
            min: sorted[0],
            max: sorted[n - 1],
        })
    }
}

/// An occupation's median vulnerability at both ends of the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationRank {
    pub occupation: String,
    pub code: String,
    pub start_median: f64,
    pub end_median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub start_year: i32,
    pub end_year: i32,
    pub n_samples: usize,
    pub aggregation: String,

    pub distinct_skills: usize,
    pub skill_rows: usize,
    pub occupations: usize,

    pub growth: Option<GrowthStats>,
    pub mean_baseline: f64,

    /// Mean end-year capability band across distinct skills
    pub mean_end_capability: Band,

    pub mean_start_vulnerability: f64,
    pub mean_end_vulnerability: f64,

    /// Mean % change of occupation median vulnerability, start to end year,
    /// over occupations with non-zero start vulnerability
    pub mean_pct_change: Option<f64>,

    pub most_exposed: Vec<OccupationRank>,
    pub least_exposed: Vec<OccupationRank>,

    pub countries: Vec<CountryProfile>,
    pub quality: DataQualityReport,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn rank(occupation: &OccupationVulnerability, config: &ForecastConfig) -> OccupationRank {
    OccupationRank {
        occupation: occupation.occupation.clone(),
        code: occupation.code.clone(),
        start_median: occupation.median_at(config.start_year).unwrap_or(0.0),
        end_median: occupation.median_at(config.end_year).unwrap_or(0.0),
    }
}

impl RunSummary {
    pub fn from_output(output: &ForecastOutput, config: &ForecastConfig, rank_count: usize) -> Self {
        let growth: Vec<f64> = output.registry.iter().map(|p| p.growth_pts).collect();

        let end_bands: Vec<Band> = output
            .projections
            .iter()
            .filter_map(|p| p.bands.get(config.end_year).copied())
            .collect();
        let mean_end_capability = Band::new(
            mean(end_bands.iter().map(|b| b.median)),
            mean(end_bands.iter().map(|b| b.p05)),
            mean(end_bands.iter().map(|b| b.p95)),
        );

        let mut ranks: Vec<OccupationRank> = output.occupations.iter().map(|o| rank(o, config)).collect();
        ranks.sort_by(|a, b| {
            b.end_median
                .total_cmp(&a.end_median)
                .then_with(|| a.occupation.cmp(&b.occupation))
                .then_with(|| a.code.cmp(&b.code))
        });

        let changes: Vec<f64> = ranks
            .iter()
            .filter(|r| r.start_median > 0.0)
            .map(|r| (r.end_median - r.start_median) / r.start_median * 100.0)
            .collect();
        let mean_pct_change = (!changes.is_empty()).then(|| mean(changes.iter().copied()));

        let most_exposed = ranks.iter().take(rank_count).cloned().collect();
        let least_exposed = ranks.iter().rev().take(rank_count).cloned().collect();

        Self {
            generated_at: Utc::now(),
            start_year: config.start_year,
            end_year: config.end_year,
            n_samples: config.n_samples,
            aggregation: config.aggregation.to_string(),
            distinct_skills: output.registry.len(),
            skill_rows: output.skill_vulnerability.len(),
            occupations: output.occupations.len(),
            growth: GrowthStats::from_values(&growth),
            mean_baseline: mean(output.registry.iter().map(|p| p.baseline)),
            mean_end_capability,
            mean_start_vulnerability: mean(ranks.iter().map(|r| r.start_median)),
            mean_end_vulnerability: mean(ranks.iter().map(|r| r.end_median)),
            mean_pct_change,
            most_exposed,
            least_exposed,
            countries: Vec::new(),
            quality: output.report.clone(),
        }
    }

    /// Attach the country stage results and its data-quality counts
    pub fn with_countries(mut self, profiles: Vec<CountryProfile>, report: DataQualityReport) -> Self {
        self.countries = profiles;
        self.quality.merge(report);
        self
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Skill Forecast Summary")?;
        writeln!(f, "======================")?;
        writeln!(f, "  Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(
            f,
            "  Horizon: {}-{}, {} samples, {} aggregation",
            self.start_year, self.end_year, self.n_samples, self.aggregation
        )?;
        writeln!(
            f,
            "  Skill rows: {}, distinct skills: {}, occupations: {}",
            self.skill_rows, self.distinct_skills, self.occupations
        )?;

        writeln!(f, "\nCapability:")?;
        if let Some(g) = &self.growth {
            writeln!(
                f,
                "  Growth (pts/yr): mean {:.2}, median {:.2}, min {:.2}, max {:.2}",
                g.mean, g.median, g.min, g.max
            )?;
        }
        writeln!(f, "  Mean baseline ({}): {:.3}", self.start_year, self.mean_baseline)?;
        let c = &self.mean_end_capability;
        writeln!(
            f,
            "  Mean capability ({}): {:.3} [{:.3}, {:.3}]",
            self.end_year, c.median, c.p05, c.p95
        )?;

        writeln!(f, "\nVulnerability (median):")?;
        writeln!(f, "  Mean {}: {:.3}", self.start_year, self.mean_start_vulnerability)?;
        writeln!(f, "  Mean {}: {:.3}", self.end_year, self.mean_end_vulnerability)?;
        if let Some(change) = self.mean_pct_change {
            writeln!(f, "  Mean change: {:+.1}%", change)?;
        }

        for (title, ranks) in [("Most exposed", &self.most_exposed), ("Least exposed", &self.least_exposed)] {
            if ranks.is_empty() {
                continue;
            }
            writeln!(f, "\n{} ({}):", title, self.end_year)?;
            for r in ranks {
                writeln!(
                    f,
                    "  {:<50} {:>12} {:>7.3} -> {:>7.3}",
                    r.occupation, r.code, r.start_median, r.end_median
                )?;
            }
        }

        if !self.countries.is_empty() {
            writeln!(f, "\nCountries:")?;
            writeln!(f, "  {:<30} {:>9} {:>11}", "Country", "Capacity", "Multiplier")?;
            let mut countries: Vec<&CountryProfile> = self.countries.iter().collect();
            countries.sort_by(|a, b| b.capacity_score.total_cmp(&a.capacity_score));
            for p in countries {
                writeln!(
                    f,
                    "  {:<30} {:>9.3} {:>11.3}",
                    p.country, p.capacity_score, p.adoption_multiplier
                )?;
            }
        }

        if self.quality.has_warnings() {
            let q = &self.quality;
            writeln!(f, "\nData quality:")?;
            writeln!(f, "  Rows dropped: {} of {}", q.rows_dropped, q.rows_read)?;
            writeln!(f, "  Rows on fallback growth: {}", q.rows_without_similarity)?;
            writeln!(f, "  Unmatched benchmark references: {}", q.unmatched_benchmarks)?;
            writeln!(
                f,
                "  Duplicate skill rows: {} ({} growth / {} baseline conflicts)",
                q.duplicate_skill_rows, q.conflicting_growth, q.conflicting_baseline
            )?;
            writeln!(f, "  Zero-weight occupations: {}", q.zero_weight_occupations)?;
            writeln!(f, "  Missing country indicators: {}", q.missing_indicators)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::{SkillParameters, SkillRegistry};
    use crate::projection::{ProjectionSet, YearSeries};
    use approx::assert_relative_eq;

    fn occupation(name: &str, start: f64, end: f64) -> OccupationVulnerability {
        OccupationVulnerability {
            occupation: name.to_string(),
            code: format!("{}-00", name.len()),
            skill_count: 1,
            vulnerability: YearSeries::from_fn(2024, 2035, |y| {
                Band::point(if y == 2035 { end } else { start })
            }),
        }
    }

    fn output() -> ForecastOutput {
        ForecastOutput {
            registry: SkillRegistry::from_parameters(vec![
                SkillParameters { skill: "a".to_string(), baseline: 0.2, growth_pts: 10.0 },
                SkillParameters { skill: "b".to_string(), baseline: 0.4, growth_pts: 20.0 },
                SkillParameters { skill: "c".to_string(), baseline: 0.6, growth_pts: 9.0 },
            ]),
            projections: ProjectionSet::default(),
            skill_vulnerability: Vec::new(),
            occupations: vec![
                occupation("Clerks", 0.2, 0.4),
                occupation("Nurses", 0.1, 0.1),
                occupation("Painters", 0.0, 0.3),
            ],
            report: DataQualityReport::new(),
        }
    }

    #[test]
    fn test_growth_stats() {
        let stats = GrowthStats::from_values(&[10.0, 20.0, 9.0, 15.0]).unwrap();
        assert_relative_eq!(stats.mean, 13.5);
        assert_relative_eq!(stats.median, 12.5);
        assert_eq!(stats.min, 9.0);
        assert_eq!(stats.max, 20.0);
        assert!(GrowthStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_summary_from_output() {
        let config = ForecastConfig::default();
        let summary = RunSummary::from_output(&output(), &config, 2);

        assert_eq!(summary.distinct_skills, 3);
        assert_relative_eq!(summary.mean_baseline, 0.4, epsilon = 1e-12);
        assert_relative_eq!(summary.growth.unwrap().median, 10.0);

        assert_eq!(summary.most_exposed.len(), 2);
        assert_eq!(summary.most_exposed[0].occupation, "Clerks");
        assert_eq!(summary.most_exposed[1].occupation, "Painters");
        assert_eq!(summary.least_exposed[0].occupation, "Nurses");

        // Painters start at zero and are excluded: (100% + 0%) / 2
        assert_relative_eq!(summary.mean_pct_change.unwrap(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_summary_serializes_and_displays() {
        let config = ForecastConfig::default();
        let profile = CountryProfile {
            country: "Freedonia".to_string(),
            capacity_score: 0.5,
            adoption_multiplier: 0.9,
        };
        let mut country_report = DataQualityReport::new();
        country_report.record_missing_indicator("Freedonia", "Internet users (% of population)");

        let summary = RunSummary::from_output(&output(), &config, 5).with_countries(vec![profile], country_report);
        assert_eq!(summary.quality.missing_indicators, 1);

        let json = serde_json::to_string(&summary).unwrap();
        let parsed: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.countries, summary.countries);
        assert_eq!(parsed.generated_at, summary.generated_at);

        let text = summary.to_string();
        assert!(text.contains("Most exposed (2035)"));
        assert!(text.contains("Freedonia"));
        assert!(text.contains("Missing country indicators: 1"));
    }
}
