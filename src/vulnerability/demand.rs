//! Geometric decay of task demand

use crate::config::ForecastConfig;
use crate::projection::YearSeries;

/// Demand after `years_elapsed` years of decay at `decay_rate` per year, clipped to [0, 1]
pub fn decayed_demand(start_demand: f64, decay_rate: f64, years_elapsed: i32) -> f64 {
    (start_demand * (1.0 - decay_rate).powi(years_elapsed)).clamp(0.0, 1.0)
}

/// Decayed demand for every configured year
pub fn demand_series(start_demand: f64, config: &ForecastConfig) -> YearSeries<f64> {
    let start = config.start_year;
    YearSeries::from_fn(start, config.end_year, |year| {
        decayed_demand(start_demand, config.demand_decay_rate, year - start)
    })
}
