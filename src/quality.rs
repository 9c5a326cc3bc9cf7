//! Non-fatal data-quality accounting
//!
//! Recoverable problems are fixed locally (fallback growth, zero indicator,
//! dropped row) and counted here so the caller can see how much of the output
//! rests on fallbacks.

use log::warn;
use serde::{Deserialize, Serialize};

/// Maximum number of example names kept per category
const SAMPLE_LIMIT: usize = 10;

/// Counts of recovered data-quality conditions for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReport {
    /// Skill rows read from the skill-demand table
    pub rows_read: usize,

    /// Rows dropped because demand or baseline capability was unusable
    pub rows_dropped: usize,

    /// Distinct standardized skill names
    pub distinct_skills: usize,

    /// Rows with no positive benchmark similarity (fallback growth used)
    pub rows_without_similarity: usize,

    /// Benchmark references whose name is absent from the growth table
    pub unmatched_benchmarks: usize,

    /// Rows repeating an already-seen skill name
    pub duplicate_skill_rows: usize,

    /// Duplicates whose synthesized growth differs from the kept value
    pub conflicting_growth: usize,

    /// Duplicates whose baseline capability differs from the kept value
    pub conflicting_baseline: usize,

    /// Occupations whose weighted mean fell back to an unweighted mean
    pub zero_weight_occupations: usize,

    /// Country indicator values that were missing or non-numeric
    pub missing_indicators: usize,

    /// Example names for the categories above
    pub samples: QualitySamples,
}

/// A few example names per category, for log messages and JSON summaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitySamples {
    pub unmatched_benchmarks: Vec<String>,
    pub fallback_skills: Vec<String>,
    pub conflicting_skills: Vec<String>,
    pub missing_indicators: Vec<String>,
}

fn push_sample(samples: &mut Vec<String>, name: &str) {
    if samples.len() < SAMPLE_LIMIT && !samples.iter().any(|s| s == name) {
        samples.push(name.to_string());
    }
}

impl DataQualityReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_unmatched_benchmark(&mut self, benchmark: &str) {
        self.unmatched_benchmarks += 1;
        push_sample(&mut self.samples.unmatched_benchmarks, benchmark);
    }

    pub fn record_fallback_skill(&mut self, skill: &str) {
        self.rows_without_similarity += 1;
        push_sample(&mut self.samples.fallback_skills, skill);
    }

    pub fn record_conflict(&mut self, skill: &str, growth_differs: bool, baseline_differs: bool) {
        if growth_differs {
            self.conflicting_growth += 1;
        }
        if baseline_differs {
            self.conflicting_baseline += 1;
        }
        push_sample(&mut self.samples.conflicting_skills, skill);
    }

    pub fn record_missing_indicator(&mut self, country: &str, indicator: &str) {
        self.missing_indicators += 1;
        push_sample(
            &mut self.samples.missing_indicators,
            &format!("{country}: {indicator}"),
        );
    }

    /// Fold another report's counts into this one
    pub fn merge(&mut self, other: DataQualityReport) {
        self.rows_read += other.rows_read;
        self.rows_dropped += other.rows_dropped;
        self.distinct_skills += other.distinct_skills;
        self.rows_without_similarity += other.rows_without_similarity;
        self.unmatched_benchmarks += other.unmatched_benchmarks;
        self.duplicate_skill_rows += other.duplicate_skill_rows;
        self.conflicting_growth += other.conflicting_growth;
        self.conflicting_baseline += other.conflicting_baseline;
        self.zero_weight_occupations += other.zero_weight_occupations;
        self.missing_indicators += other.missing_indicators;

        for name in other.samples.unmatched_benchmarks {
            push_sample(&mut self.samples.unmatched_benchmarks, &name);
        }
        for name in other.samples.fallback_skills {
            push_sample(&mut self.samples.fallback_skills, &name);
        }
        for name in other.samples.conflicting_skills {
            push_sample(&mut self.samples.conflicting_skills, &name);
        }
        for name in other.samples.missing_indicators {
            push_sample(&mut self.samples.missing_indicators, &name);
        }
    }

    pub fn has_warnings(&self) -> bool {
        self.rows_dropped > 0
            || self.rows_without_similarity > 0
            || self.unmatched_benchmarks > 0
            || self.duplicate_skill_rows > 0
            || self.zero_weight_occupations > 0
            || self.missing_indicators > 0
    }

    /// Emit one `warn!` line per non-zero category
    pub fn log_warnings(&self) {
        if self.rows_dropped > 0 {
            warn!(
                "Dropped {} of {} skill rows with missing demand or capability",
                self.rows_dropped, self.rows_read
            );
        }
        if self.rows_without_similarity > 0 {
            warn!(
                "{} rows have no benchmark similarity and use the fallback growth rate (e.g. {:?})",
                self.rows_without_similarity, self.samples.fallback_skills
            );
        }
        if self.unmatched_benchmarks > 0 {
            warn!(
                "{} benchmark references not in the growth table (e.g. {:?})",
                self.unmatched_benchmarks, self.samples.unmatched_benchmarks
            );
        }
        if self.duplicate_skill_rows > 0 {
            warn!(
                "{} duplicate skill rows resolved keep-first: {} with differing growth, {} with differing baseline (e.g. {:?})",
                self.duplicate_skill_rows,
                self.conflicting_growth,
                self.conflicting_baseline,
                self.samples.conflicting_skills
            );
        }
        if self.zero_weight_occupations > 0 {
            warn!(
                "{} occupations have zero total demand; weighted mean fell back to mean",
                self.zero_weight_occupations
            );
        }
        if self.missing_indicators > 0 {
            warn!(
                "{} country indicator values missing, treated as 0 (e.g. {:?})",
                self.missing_indicators, self.samples.missing_indicators
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_capped_and_unique() {
        let mut report = DataQualityReport::new();
        for i in 0..25 {
            report.record_unmatched_benchmark(&format!("bench_{}", i % 15));
        }
        assert_eq!(report.unmatched_benchmarks, 25);
        assert_eq!(report.samples.unmatched_benchmarks.len(), SAMPLE_LIMIT);
    }

    #[test]
    fn test_merge_adds_counts() {
        let mut a = DataQualityReport::new();
        a.rows_read = 10;
        a.record_fallback_skill("typing");

        let mut b = DataQualityReport::new();
        b.record_missing_indicator("Chad", "Internet users (% of population)");
        b.record_fallback_skill("typing");

        a.merge(b);
        assert_eq!(a.rows_read, 10);
        assert_eq!(a.rows_without_similarity, 2);
        assert_eq!(a.samples.fallback_skills, vec!["typing".to_string()]);
        assert_eq!(a.missing_indicators, 1);
        assert!(a.has_warnings());
    }
}
