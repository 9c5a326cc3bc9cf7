//! Country adoption adjustment
//!
//! Macro indicators give each country a capacity score in [0, 1]; a logistic
//! map turns that into an adoption-speed multiplier that stretches or
//! compresses the global occupation trajectory along the time axis.

mod adoption;
mod indicators;
pub mod loader;

pub use adoption::{
    adoption_multiplier, effective_year, CountryAdjuster, CountryOccupation, CountryProfile,
};
pub use indicators::{CountryIndicators, Indicator};
pub use loader::{load_country_table, load_country_table_from_reader, CountryTable};
