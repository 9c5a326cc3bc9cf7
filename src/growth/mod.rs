//! Per-skill growth-rate synthesis from benchmark similarities
//!
//! Growth rates are fixed per benchmark; a skill's rate is the
//! similarity-weighted average of the rates of the benchmarks it resembles.
//! The [`SkillRegistry`] resolves each distinct skill name to exactly one
//! baseline and growth rate before anything is projected.

mod benchmarks;
mod registry;
mod synthesizer;

pub use benchmarks::{BenchmarkTable, DEFAULT_FALLBACK_GROWTH, DEFAULT_GROWTH_RATES};
pub use registry::{SkillParameters, SkillRegistry};
pub use synthesizer::{synthesize_growth, GrowthEstimate};
