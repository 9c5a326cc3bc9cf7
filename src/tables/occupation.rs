//! Read back a previously written occupation table

use super::columns::{vulnerability_column, Variant};
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::projection::{Band, YearSeries};
use crate::vulnerability::OccupationVulnerability;
use csv::{Reader, StringRecord};
use log::info;
use std::fs::File;
use std::path::Path;

const TABLE: &str = "occupation";

fn column_index(headers: &StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| ForecastError::missing_column(TABLE, column))
}

/// Load occupation trajectories covering the configured years
pub fn load_occupation_table<P: AsRef<Path>>(
    path: P,
    config: &ForecastConfig,
) -> Result<Vec<OccupationVulnerability>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ForecastError::MissingInput {
        path: path.to_path_buf(),
        source,
    })?;
    let occupations = load_occupation_table_from_reader(file, config)?;
    info!("Loaded {} occupations from {}", occupations.len(), path.display());
    Ok(occupations)
}

/// Load occupation trajectories from any reader
///
/// Every `Vulnerability_{variant}_{year}` column for the configured years
/// must be present and every cell numeric; `Skill_Count` is optional.
pub fn load_occupation_table_from_reader<R: std::io::Read>(
    reader: R,
    config: &ForecastConfig,
) -> Result<Vec<OccupationVulnerability>> {
    let mut csv_reader = Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let occupation_idx = column_index(&headers, "Occupation")?;
    let code_idx = column_index(&headers, "Code")?;
    let count_idx = headers.iter().position(|h| h.trim() == "Skill_Count");

    let mut year_columns = Vec::with_capacity(config.year_count());
    for year in config.years() {
        let mut indices = [0usize; 3];
        for (slot, variant) in indices.iter_mut().zip(Variant::ALL) {
            *slot = column_index(&headers, &vulnerability_column(variant, year))?;
        }
        year_columns.push((year, indices));
    }

    let mut occupations = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let occupation = record.get(occupation_idx).unwrap_or_default().trim().to_string();
        let code = record.get(code_idx).unwrap_or_default().trim().to_string();
        let skill_count = count_idx
            .and_then(|i| record.get(i))
            .and_then(|cell| cell.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let mut values = Vec::with_capacity(year_columns.len());
        for (year, [median, p05, p95]) in &year_columns {
            let cell = |i: usize| {
                record
                    .get(i)
                    .and_then(|c| c.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ForecastError::MissingYear {
                        subject: occupation.clone(),
                        year: *year,
                    })
            };
            values.push(Band::new(cell(*median)?, cell(*p05)?, cell(*p95)?));
        }

        occupations.push(OccupationVulnerability {
            occupation,
            code,
            skill_count,
            vulnerability: YearSeries::from_values(config.start_year, values),
        });
    }

    Ok(occupations)
}
