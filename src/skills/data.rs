//! Skill row data structures matching the skill-demand table

use serde::{Deserialize, Serialize};

/// Benchmark/similarity column pairs carried per row
pub const MAX_BENCHMARKS: usize = 5;

/// Standardize a skill or benchmark name for matching
///
/// Trims, lower-cases, turns each whitespace run into `_` and collapses
/// repeated underscores, so `"Active  Listening"` and `"active_listening"`
/// name the same skill.
pub fn standardize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_underscore = false;

    for ch in raw.trim().chars() {
        let ch = if ch.is_whitespace() { '_' } else { ch };
        if ch == '_' {
            if !last_underscore {
                out.push('_');
            }
            last_underscore = true;
        } else {
            out.extend(ch.to_lowercase());
            last_underscore = false;
        }
    }

    out
}

/// One benchmark association of a skill row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkLink {
    /// Standardized benchmark name; `None` when the name cell was empty
    pub name: Option<String>,

    /// Similarity weight in [0, 1]; 0 when the cell was empty or not a number
    pub similarity: f64,
}

impl BenchmarkLink {
    pub fn new(name: Option<&str>, similarity: Option<f64>) -> Self {
        let name = name
            .map(standardize_name)
            .filter(|n| !n.is_empty());
        let similarity = match similarity {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => 0.0,
        };
        Self { name, similarity }
    }
}

/// One (occupation, skill) row of the skill-demand table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRow {
    /// Occupation title
    pub occupation: String,

    /// Occupation code (e.g. an O*NET-SOC code)
    pub code: String,

    /// Standardized skill name
    pub skill: String,

    /// Start-year demand weight in [0, 1]
    pub demand: f64,

    /// Start-year automated capability score in [0, 1]
    pub capability: f64,

    /// Up to [`MAX_BENCHMARKS`] benchmark associations
    pub benchmarks: Vec<BenchmarkLink>,
}

impl SkillRow {
    pub fn new(occupation: &str, code: &str, skill: &str, demand: f64, capability: f64) -> Self {
        Self {
            occupation: occupation.to_string(),
            code: code.to_string(),
            skill: standardize_name(skill),
            demand: demand.clamp(0.0, 1.0),
            capability: capability.clamp(0.0, 1.0),
            benchmarks: Vec::new(),
        }
    }

    /// Attach a benchmark association (builder style, used by loaders and tests)
    pub fn with_benchmark(mut self, name: &str, similarity: f64) -> Self {
        if self.benchmarks.len() < MAX_BENCHMARKS {
            self.benchmarks.push(BenchmarkLink::new(Some(name), Some(similarity)));
        }
        self
    }
}
