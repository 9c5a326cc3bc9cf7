//! Skill-row vulnerability: decayed demand x projected capability

use super::demand::demand_series;
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::projection::{Band, ProjectionSet, YearSeries};
use crate::skills::SkillRow;
use log::info;
use serde::{Deserialize, Serialize};

/// Vulnerability trajectory of one occupation's skill row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillVulnerability {
    pub occupation: String,
    pub code: String,
    pub skill: String,

    /// Start-year demand (weight for `weighted_mean` aggregation)
    pub demand: f64,

    /// Demand × capability for median, p05 and p95
    pub vulnerability: YearSeries<Band>,
}

/// Second pass of the two-pass design: joins rows against skill projections
pub struct VulnerabilityCalculator<'a> {
    config: &'a ForecastConfig,
}

impl<'a> VulnerabilityCalculator<'a> {
    pub fn new(config: &'a ForecastConfig) -> Self {
        Self { config }
    }

    /// Vulnerability for one row
    ///
    /// Fails if the row's skill was never projected or its trajectory lacks a
    /// configured year; nothing is filled in.
    pub fn for_row(&self, row: &SkillRow, projections: &ProjectionSet) -> Result<SkillVulnerability> {
        let projection = projections
            .get(&row.skill)
            .ok_or_else(|| ForecastError::MissingSkill { skill: row.skill.clone() })?;

        let demand = demand_series(row.demand, self.config);
        let mut values = Vec::with_capacity(demand.len());
        for (year, &d) in demand.iter() {
            let capability = projection.bands.get(year).ok_or_else(|| ForecastError::MissingYear {
                subject: row.skill.clone(),
                year,
            })?;
            values.push(capability.scale(d));
        }

        Ok(SkillVulnerability {
            occupation: row.occupation.clone(),
            code: row.code.clone(),
            skill: row.skill.clone(),
            demand: row.demand,
            vulnerability: YearSeries::from_values(self.config.start_year, values),
        })
    }

    /// Vulnerability for every row, in input order
    pub fn calculate(&self, rows: &[SkillRow], projections: &ProjectionSet) -> Result<Vec<SkillVulnerability>> {
        let records = rows
            .iter()
            .map(|row| self.for_row(row, projections))
            .collect::<Result<Vec<_>>>()?;
        info!("Calculated vulnerability for {} skill rows", records.len());
        Ok(records)
    }
}
