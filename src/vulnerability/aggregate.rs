//! Occupation-level aggregation of skill vulnerability

use super::calculator::SkillVulnerability;
use crate::config::AggregationMethod;
use crate::error::{ForecastError, Result};
use crate::projection::{Band, YearSeries};
use crate::quality::DataQualityReport;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vulnerability trajectory of one occupation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationVulnerability {
    pub occupation: String,
    pub code: String,

    /// Skill rows that were reduced into this occupation
    pub skill_count: usize,

    /// Aggregated median, p05 and p95 vulnerability per year
    pub vulnerability: YearSeries<Band>,
}

impl OccupationVulnerability {
    pub fn median_at(&self, year: i32) -> Option<f64> {
        self.vulnerability.get(year).map(|b| b.median)
    }
}

/// Reduces skill rows sharing (occupation, code) under one policy
#[derive(Debug, Clone, Copy)]
pub struct OccupationAggregator {
    method: AggregationMethod,
}

impl OccupationAggregator {
    pub fn new(method: AggregationMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> AggregationMethod {
        self.method
    }

    /// One row per (occupation, code), sorted by occupation then code
    ///
    /// Each variant column is reduced independently, so under `max` the
    /// median and the p95 of an occupation may come from different skills.
    pub fn aggregate(
        &self,
        records: &[SkillVulnerability],
        report: &mut DataQualityReport,
    ) -> Result<Vec<OccupationVulnerability>> {
        let mut groups: BTreeMap<(&str, &str), Vec<&SkillVulnerability>> = BTreeMap::new();
        for record in records {
            groups
                .entry((record.occupation.as_str(), record.code.as_str()))
                .or_default()
                .push(record);
        }

        let occupations = groups
            .into_iter()
            .map(|((occupation, code), members)| self.reduce_group(occupation, code, &members, report))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Aggregated {} skill rows into {} occupations using '{}'",
            records.len(),
            occupations.len(),
            self.method
        );
        Ok(occupations)
    }

    fn reduce_group(
        &self,
        occupation: &str,
        code: &str,
        members: &[&SkillVulnerability],
        report: &mut DataQualityReport,
    ) -> Result<OccupationVulnerability> {
        let first = &members[0].vulnerability;
        let total_weight: f64 = members.iter().map(|m| m.demand).sum();

        let method = match self.method {
            AggregationMethod::WeightedMean if total_weight <= 0.0 => {
                report.zero_weight_occupations += 1;
                AggregationMethod::Mean
            }
            method => method,
        };

        let mut values = Vec::with_capacity(first.len());
        let mut bands = Vec::with_capacity(members.len());
        for year in first.years() {
            bands.clear();
            for member in members {
                let band = member.vulnerability.get(year).ok_or_else(|| ForecastError::MissingYear {
                    subject: format!("{} / {}", member.occupation, member.skill),
                    year,
                })?;
                bands.push((member.demand, *band));
            }
            values.push(Band::new(
                reduce(method, &bands, |b| b.median),
                reduce(method, &bands, |b| b.p05),
                reduce(method, &bands, |b| b.p95),
            ));
        }

        Ok(OccupationVulnerability {
            occupation: occupation.to_string(),
            code: code.to_string(),
            skill_count: members.len(),
            vulnerability: YearSeries::from_values(first.start_year(), values),
        })
    }
}

/// Reduce one variant over (weight, band) pairs; `bands` is never empty
fn reduce<F>(method: AggregationMethod, bands: &[(f64, Band)], variant: F) -> f64
where
    F: Fn(&Band) -> f64,
{
    match method {
        AggregationMethod::Max => bands
            .iter()
            .map(|(_, b)| variant(b))
            .fold(f64::NEG_INFINITY, f64::max),
        AggregationMethod::Mean => {
            bands.iter().map(|(_, b)| variant(b)).sum::<f64>() / bands.len() as f64
        }
        AggregationMethod::WeightedMean => {
            let total: f64 = bands.iter().map(|(w, _)| w).sum();
            bands.iter().map(|(w, b)| w * variant(b)).sum::<f64>() / total
        }
    }
}
