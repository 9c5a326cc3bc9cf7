//! Demand decay, skill-level vulnerability and occupation aggregation
//!
//! Vulnerability is decayed demand times capability, computed separately for
//! the median and both percentile bands.

mod aggregate;
mod calculator;
mod demand;

pub use aggregate::{OccupationAggregator, OccupationVulnerability};
pub use calculator::{SkillVulnerability, VulnerabilityCalculator};
pub use demand::{decayed_demand, demand_series};
