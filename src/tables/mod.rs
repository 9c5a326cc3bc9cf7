//! Flat-file output tables
//!
//! Wide column names (`Vulnerability_Median_2030` etc.) exist only here; the
//! rest of the pipeline works with [`crate::projection::YearSeries`].

mod columns;
mod occupation;
mod writer;

pub use columns::{
    adjusted_column, country_headers, occupation_headers, skill_headers, vulnerability_column,
    Variant,
};
pub use occupation::{load_occupation_table, load_occupation_table_from_reader};
pub use writer::{write_occupation_table, write_skill_table, CountryTableWriter};
