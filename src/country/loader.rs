//! Load the country indicator table
//!
//! The table is long: one row per indicator (`Variable` column), one column
//! per country. It is pivoted here to one [`CountryIndicators`] per country.

use super::indicators::{CountryIndicators, Indicator};
use crate::error::{ForecastError, Result};
use crate::quality::DataQualityReport;
use csv::Reader;
use log::{debug, info};
use std::fs::File;
use std::path::Path;

const TABLE: &str = "country-indicator";
const VARIABLE_COLUMN: &str = "Variable";
const FORMULA_SUFFIX: &str = " (Formula)";

/// Per-country indicators plus the count of values that were missing
#[derive(Debug, Clone)]
pub struct CountryTable {
    pub countries: Vec<CountryIndicators>,
    pub report: DataQualityReport,
}

/// Country columns as (column index, country name)
///
/// When any header carries the ` (Formula)` suffix, only those columns are
/// countries; otherwise every column except `Variable` is.
fn country_columns(headers: &csv::StringRecord, variable_idx: usize) -> Vec<(usize, String)> {
    let formula: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| {
            h.trim()
                .strip_suffix(FORMULA_SUFFIX)
                .map(|name| (i, name.trim().to_string()))
        })
        .collect();
    if !formula.is_empty() {
        return formula;
    }

    headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != variable_idx && !h.trim().is_empty())
        .map(|(i, h)| (i, h.trim().to_string()))
        .collect()
}

/// Load the country indicator table from a CSV file
pub fn load_country_table<P: AsRef<Path>>(path: P) -> Result<CountryTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ForecastError::MissingInput {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_country_table_from_reader(file)?;
    info!("Loaded indicators for {} countries from {}", table.countries.len(), path.display());
    Ok(table)
}

/// Load the country indicator table from any reader
pub fn load_country_table_from_reader<R: std::io::Read>(reader: R) -> Result<CountryTable> {
    let mut csv_reader = Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let variable_idx = headers
        .iter()
        .position(|h| h.trim() == VARIABLE_COLUMN)
        .ok_or_else(|| ForecastError::missing_column(TABLE, VARIABLE_COLUMN))?;

    let columns = country_columns(&headers, variable_idx);
    let mut countries: Vec<CountryIndicators> = columns
        .iter()
        .map(|(_, name)| CountryIndicators::new(name))
        .collect();
    let mut seen = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let label = record.get(variable_idx).unwrap_or_default();
        let Some(indicator) = Indicator::from_label(label) else {
            debug!("Ignoring indicator row '{}'", label.trim());
            continue;
        };
        if seen.contains(&indicator) {
            debug!("Ignoring repeated indicator row '{}'", label.trim());
            continue;
        }
        seen.push(indicator);

        for ((col, _), country) in columns.iter().zip(countries.iter_mut()) {
            let value = record
                .get(*col)
                .and_then(|cell| cell.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite());
            country.set(indicator, value);
        }
    }

    let mut report = DataQualityReport::new();
    for country in &countries {
        for indicator in country.missing() {
            report.record_missing_indicator(&country.country, indicator.label());
        }
    }

    Ok(CountryTable { countries, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FORMULA_TABLE: &str = r#"Variable,Source,Freedonia (Formula),Freedonia (Raw),Sylvania (Formula)
Public R&D expenditure (% of GDP),WB,1.0,x,2.5
Electricity Access (% of population),WB,100,x,60
IT service exports (% of GDP),WB,5,x,..
Internet users (% of population),WB,90,x,40
Fixed broadband subscriptions (per 100 people),WB,30,x,2
High-tech exports (% of manufactured exports),WB,15,x,1
"Government Effectiveness (WGI, estimate)",WB,1.0,x,-0.5
Researchers in R&D (per million people),WB,4000,x,100
GDP growth,WB,2,x,3
"#;

    #[test]
    fn test_pivot_formula_columns() {
        let table = load_country_table_from_reader(FORMULA_TABLE.as_bytes()).unwrap();
        let names: Vec<_> = table.countries.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["Freedonia", "Sylvania"]);

        let freedonia = &table.countries[0];
        assert_eq!(freedonia.get(Indicator::Electricity), Some(100.0));
        assert_eq!(freedonia.get(Indicator::GovernmentEffectiveness), Some(1.0));

        let sylvania = &table.countries[1];
        assert_eq!(sylvania.get(Indicator::ItExports), None);
        assert_eq!(table.report.missing_indicators, 1);
    }

    #[test]
    fn test_capacity_from_loaded_table() {
        let table = load_country_table_from_reader(FORMULA_TABLE.as_bytes()).unwrap();
        let expected = 0.15 * 0.5 + 0.10 * 1.0 + 0.15 * 0.1 + 0.15 * 0.9 + 0.10 * 0.75
            + 0.10 * 0.5 + 0.15 * 0.7 + 0.10 * 0.5;
        assert_relative_eq!(table.countries[0].capacity_score(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_plain_columns_and_missing_rows() {
        let csv = "Variable,Atlantis,Lemuria\nInternet users (% of population),80,20\n";
        let table = load_country_table_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.countries.len(), 2);
        assert_eq!(table.countries[1].country, "Lemuria");
        assert_eq!(table.countries[1].get(Indicator::Internet), Some(20.0));
        // seven indicator rows absent for each of two countries
        assert_eq!(table.report.missing_indicators, 14);
    }

    #[test]
    fn test_missing_variable_column() {
        let csv = "Indicator,Atlantis\nInternet users (% of population),80\n";
        let err = load_country_table_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ForecastError::MissingColumn { ref column, .. } if column == "Variable"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_country_table("no/such/countries.csv").unwrap_err();
        assert!(matches!(err, ForecastError::MissingInput { .. }));
    }
}
