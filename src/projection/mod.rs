//! Capability trajectories for distinct skills

mod engine;
mod percentile;
mod results;
mod series;

pub use engine::{
    growth_sd, linear_capability, TrajectoryProjector, MIN_GROWTH_SD, SAMPLE_GROWTH_MAX,
    SAMPLE_GROWTH_MIN,
};
pub use percentile::{percentile_mapped, percentile_sorted};
pub use results::{ProjectionSet, SkillProjection};
pub use series::{Band, YearSeries};
