//! Projection output structures

use super::series::{Band, YearSeries};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Capability trajectory of one distinct skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProjection {
    /// Standardized skill name
    pub skill: String,

    /// Start-year capability
    pub baseline: f64,

    /// Synthesized growth (pts/year)
    pub growth_pts: f64,

    /// Linear trend without uncertainty, for sanity checks
    pub deterministic: YearSeries<f64>,

    /// Monte Carlo median and 5th/95th percentile capability per year
    pub bands: YearSeries<Band>,
}

/// All skill projections, addressable by skill name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionSet {
    projections: Vec<SkillProjection>,
    index: HashMap<String, usize>,
}

impl ProjectionSet {
    pub fn new(projections: Vec<SkillProjection>) -> Self {
        let index = projections
            .iter()
            .enumerate()
            .map(|(i, p)| (p.skill.clone(), i))
            .collect();
        Self { projections, index }
    }

    pub fn get(&self, skill: &str) -> Option<&SkillProjection> {
        self.index.get(skill).map(|&i| &self.projections[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillProjection> {
        self.projections.iter()
    }

    pub fn as_slice(&self) -> &[SkillProjection] {
        &self.projections
    }

    pub fn len(&self) -> usize {
        self.projections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }
}
