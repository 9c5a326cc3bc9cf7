//! Distinct-skill registry: one baseline and one growth rate per skill name
//!
//! First pass of the two-pass design. Every downstream stage looks skills up
//! here instead of recomputing per occupation row.

use super::benchmarks::BenchmarkTable;
use super::synthesizer::synthesize_growth;
use crate::config::DuplicateSkillPolicy;
use crate::error::{ForecastError, Result};
use crate::quality::DataQualityReport;
use crate::skills::SkillRow;
use log::{debug, info, warn};
use std::collections::HashMap;

/// Tolerance for treating duplicate values as equal
const CONFLICT_TOLERANCE: f64 = 1e-12;

/// Projection inputs for one distinct skill
#[derive(Debug, Clone, PartialEq)]
pub struct SkillParameters {
    /// Standardized skill name
    pub skill: String,

    /// Start-year capability in [0, 1]
    pub baseline: f64,

    /// Synthesized growth in pts/year
    pub growth_pts: f64,
}

impl SkillParameters {
    /// Growth as an annual fraction of the [0, 1] capability scale
    pub fn growth_frac(&self) -> f64 {
        self.growth_pts / 100.0
    }
}

/// Immutable map from skill name to its parameters, in first-appearance order
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: Vec<SkillParameters>,
    index: HashMap<String, usize>,
}

impl SkillRegistry {
    /// Resolve every distinct skill name in `rows`
    ///
    /// The first row seen for a name fixes its baseline and growth. Later rows
    /// for the same name are counted; rows that disagree are counted as
    /// conflicts (`KeepFirst`) or abort the run (`Reject`). Values are never
    /// averaged across duplicates.
    pub fn build(
        rows: &[SkillRow],
        table: &BenchmarkTable,
        policy: DuplicateSkillPolicy,
        report: &mut DataQualityReport,
    ) -> Result<Self> {
        let mut registry = Self::default();

        for row in rows {
            let estimate = synthesize_growth(&row.benchmarks, table);
            if estimate.used_fallback {
                report.record_fallback_skill(&row.skill);
            }
            for name in &estimate.unmatched {
                report.record_unmatched_benchmark(name.as_deref().unwrap_or("<unnamed>"));
            }

            match registry.index.get(&row.skill) {
                None => {
                    registry.index.insert(row.skill.clone(), registry.skills.len());
                    registry.skills.push(SkillParameters {
                        skill: row.skill.clone(),
                        baseline: row.capability,
                        growth_pts: estimate.growth_pts,
                    });
                }
                Some(&i) => {
                    report.duplicate_skill_rows += 1;
                    let kept = &registry.skills[i];
                    let growth_differs =
                        (kept.growth_pts - estimate.growth_pts).abs() > CONFLICT_TOLERANCE;
                    let baseline_differs =
                        (kept.baseline - row.capability).abs() > CONFLICT_TOLERANCE;

                    if growth_differs || baseline_differs {
                        if policy == DuplicateSkillPolicy::Reject {
                            return Err(ForecastError::ConflictingSkill { skill: row.skill.clone() });
                        }
                        debug!(
                            "Skill '{}' ({} / {}): keeping growth {:.3} baseline {:.3}, ignoring {:.3} / {:.3}",
                            row.skill,
                            row.occupation,
                            row.code,
                            kept.growth_pts,
                            kept.baseline,
                            estimate.growth_pts,
                            row.capability
                        );
                        report.record_conflict(&row.skill, growth_differs, baseline_differs);
                    }
                }
            }
        }

        report.distinct_skills = registry.skills.len();
        if report.conflicting_growth + report.conflicting_baseline > 0 {
            warn!(
                "Duplicate skill policy keep_first discarded {} conflicting growth rates and {} conflicting baselines",
                report.conflicting_growth, report.conflicting_baseline
            );
        }
        info!(
            "Resolved {} distinct skills from {} rows",
            registry.skills.len(),
            rows.len()
        );

        Ok(registry)
    }

    /// Build directly from parameters (first occurrence of a name wins)
    pub fn from_parameters(parameters: Vec<SkillParameters>) -> Self {
        let mut registry = Self::default();
        for p in parameters {
            if !registry.index.contains_key(&p.skill) {
                registry.index.insert(p.skill.clone(), registry.skills.len());
                registry.skills.push(p);
            }
        }
        registry
    }

    pub fn get(&self, skill: &str) -> Option<&SkillParameters> {
        self.index.get(skill).map(|&i| &self.skills[i])
    }

    pub fn as_slice(&self) -> &[SkillParameters] {
        &self.skills
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillParameters> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
