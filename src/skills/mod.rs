//! Skill rows of the skill-demand table and their loading

mod data;
pub mod loader;

pub use data::{standardize_name, BenchmarkLink, SkillRow, MAX_BENCHMARKS};
pub use loader::{load_skill_table, load_skill_table_from_reader, SkillTable};
