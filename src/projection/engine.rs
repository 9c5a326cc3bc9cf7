//! Capability trajectory projection with Monte Carlo uncertainty

use super::percentile::percentile_mapped;
use super::results::{ProjectionSet, SkillProjection};
use super::series::{Band, YearSeries};
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::growth::{SkillParameters, SkillRegistry};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

/// Floor on the sampled growth standard deviation (as a fraction)
pub const MIN_GROWTH_SD: f64 = 0.0001;

/// Bounds applied to every sampled annual growth fraction
pub const SAMPLE_GROWTH_MIN: f64 = -0.05;
pub const SAMPLE_GROWTH_MAX: f64 = 1.0;

/// Capability after `years_elapsed` years of linear growth, clipped to [0, 1]
pub fn linear_capability(baseline: f64, growth_frac: f64, years_elapsed: i32) -> f64 {
    (baseline + growth_frac * years_elapsed as f64).clamp(0.0, 1.0)
}

/// Standard deviation of the sampled growth fraction
pub fn growth_sd(growth_frac: f64, sd_fraction: f64) -> f64 {
    (growth_frac.abs() * sd_fraction).max(MIN_GROWTH_SD)
}

/// Projects skill capability forward from the start year
pub struct TrajectoryProjector<'a> {
    config: &'a ForecastConfig,
}

impl<'a> TrajectoryProjector<'a> {
    pub fn new(config: &'a ForecastConfig) -> Self {
        Self { config }
    }

    /// Linear trend per year, no uncertainty
    pub fn deterministic(&self, params: &SkillParameters) -> YearSeries<f64> {
        let start = self.config.start_year;
        YearSeries::from_fn(start, self.config.end_year, |year| {
            linear_capability(params.baseline, params.growth_frac(), year - start)
        })
    }

    /// Seed for the skill at first-appearance position `index`
    pub fn seed_for(&self, index: usize) -> u64 {
        self.config.random_seed.wrapping_add(index as u64)
    }

    /// Draw clipped growth fractions for one skill, returned in ascending order
    pub fn sample_growth(&self, params: &SkillParameters, index: usize) -> Result<Vec<f64>> {
        let mean = params.growth_frac();
        let sd = growth_sd(mean, self.config.growth_sd_fraction);
        let normal = Normal::new(mean, sd).map_err(|e| ForecastError::Distribution {
            skill: params.skill.clone(),
            reason: e.to_string(),
        })?;

        let mut rng = StdRng::seed_from_u64(self.seed_for(index));
        let mut samples: Vec<f64> = (0..self.config.n_samples)
            .map(|_| normal.sample(&mut rng).clamp(SAMPLE_GROWTH_MIN, SAMPLE_GROWTH_MAX))
            .collect();
        samples.sort_by(f64::total_cmp);

        Ok(samples)
    }

    /// Median and 5th/95th percentile capability per year for one skill
    pub fn project_skill(&self, params: &SkillParameters, index: usize) -> Result<SkillProjection> {
        let samples = self.sample_growth(params, index)?;
        let start = self.config.start_year;

        // For elapsed >= 0 the projection is non-decreasing in the sampled rate,
        // so the sorted samples stay sorted after projecting.
        let bands = YearSeries::from_fn(start, self.config.end_year, |year| {
            let elapsed = year - start;
            let project = |sample: f64| linear_capability(params.baseline, sample, elapsed);
            Band::new(
                percentile_mapped(&samples, 50.0, project),
                percentile_mapped(&samples, 5.0, project),
                percentile_mapped(&samples, 95.0, project),
            )
        });

        debug!(
            "Projected '{}': baseline {:.3}, growth {:.2} pts/yr, {} median {:.3}",
            params.skill,
            params.baseline,
            params.growth_pts,
            self.config.end_year,
            bands.values().last().map(|b| b.median).unwrap_or(f64::NAN)
        );

        Ok(SkillProjection {
            skill: params.skill.clone(),
            baseline: params.baseline,
            growth_pts: params.growth_pts,
            deterministic: self.deterministic(params),
            bands,
        })
    }

    /// Project every registered skill in parallel
    ///
    /// Each skill's generator is seeded from its registry position, so the
    /// result does not depend on how rayon schedules the work.
    pub fn project_all(&self, registry: &SkillRegistry) -> Result<ProjectionSet> {
        info!(
            "Running Monte Carlo: {} samples x {} skills x {} years",
            self.config.n_samples,
            registry.len(),
            self.config.year_count()
        );

        let projections = registry
            .as_slice()
            .par_iter()
            .enumerate()
            .map(|(index, params)| self.project_skill(params, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(ProjectionSet::new(projections))
    }
}
