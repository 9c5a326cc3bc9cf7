//! Adoption-speed multiplier and effective-year remapping

use super::indicators::CountryIndicators;
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::projection::{Band, YearSeries};
use crate::vulnerability::OccupationVulnerability;
use serde::{Deserialize, Serialize};

/// Slowest adoption speed, reached as capacity goes to -inf
const MULTIPLIER_FLOOR: f64 = 0.3;
/// Span of the logistic above the floor
const MULTIPLIER_SPAN: f64 = 1.2;
/// Logistic steepness
const STEEPNESS: f64 = 5.0;
/// Capacity at the logistic midpoint
const MIDPOINT: f64 = 0.5;

/// Logistic map from capacity score to adoption speed, roughly (0.3, 1.5)
pub fn adoption_multiplier(capacity: f64) -> f64 {
    MULTIPLIER_FLOOR + MULTIPLIER_SPAN / (1.0 + (-STEEPNESS * (capacity - MIDPOINT)).exp())
}

/// Year of the global trajectory a country has reached by calendar `year`
///
/// Rounds half to even and clamps to `[start_year, end_year]`.
pub fn effective_year(year: i32, multiplier: f64, start_year: i32, end_year: i32) -> i32 {
    let stretched = start_year as f64 + (year - start_year) as f64 * multiplier;
    let rounded = stretched.round_ties_even();
    rounded.max(start_year as f64).min(end_year as f64) as i32
}

/// Capacity and adoption speed of one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryProfile {
    pub country: String,
    pub capacity_score: f64,
    pub adoption_multiplier: f64,
}

impl CountryProfile {
    pub fn from_indicators(indicators: &CountryIndicators) -> Self {
        let capacity_score = indicators.capacity_score();
        Self {
            country: indicators.country.clone(),
            capacity_score,
            adoption_multiplier: adoption_multiplier(capacity_score),
        }
    }
}

/// One occupation's trajectory as traversed by one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryOccupation {
    pub country: String,
    pub capacity_score: f64,
    pub adoption_multiplier: f64,
    pub occupation: String,
    pub code: String,
    pub vulnerability: YearSeries<Band>,
}

/// Reindexes global occupation trajectories onto a country's time axis
pub struct CountryAdjuster<'a> {
    config: &'a ForecastConfig,
}

impl<'a> CountryAdjuster<'a> {
    pub fn new(config: &'a ForecastConfig) -> Self {
        Self { config }
    }

    /// The country's value at year `y` is the global value at its effective year
    pub fn adjust_occupation(
        &self,
        profile: &CountryProfile,
        occupation: &OccupationVulnerability,
    ) -> Result<CountryOccupation> {
        let (start, end) = (self.config.start_year, self.config.end_year);
        let mut values = Vec::with_capacity(self.config.year_count());
        for year in self.config.years() {
            let effective = effective_year(year, profile.adoption_multiplier, start, end);
            let band = occupation.vulnerability.get(effective).ok_or_else(|| ForecastError::MissingYear {
                subject: format!("{} / {}", occupation.occupation, occupation.code),
                year: effective,
            })?;
            values.push(*band);
        }

        Ok(CountryOccupation {
            country: profile.country.clone(),
            capacity_score: profile.capacity_score,
            adoption_multiplier: profile.adoption_multiplier,
            occupation: occupation.occupation.clone(),
            code: occupation.code.clone(),
            vulnerability: YearSeries::from_values(start, values),
        })
    }

    /// Every occupation for one country, in occupation order
    pub fn adjust(
        &self,
        profile: &CountryProfile,
        occupations: &[OccupationVulnerability],
    ) -> Result<Vec<CountryOccupation>> {
        occupations
            .iter()
            .map(|occupation| self.adjust_occupation(profile, occupation))
            .collect()
    }
}
