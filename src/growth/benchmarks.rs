//! Benchmark growth-rate table

use crate::error::{ForecastError, Result};
use crate::skills::standardize_name;
use csv::Reader;
use log::info;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Growth (pts/year) for benchmarks absent from the table
pub const DEFAULT_FALLBACK_GROWTH: f64 = 9.0;

/// Assumed annual improvement per benchmark, in percentage points per year
pub const DEFAULT_GROWTH_RATES: [(&str, f64); 10] = [
    ("MMLU", 9.5),
    ("MMLU-Pro", 9.5),
    ("MMLU-Pro(1yr-spike)", 33.1),
    ("HumanEval", 16.2),
    ("MATH", 18.2),
    ("MedQA", 9.3),
    ("HellaSwag", 9.6),
    ("BIG-Bench", 10.0),
    ("LegalBench", 9.0),
    ("PubMedQA", 9.0),
];

/// Lookup from standardized benchmark name to annual growth
#[derive(Debug, Clone)]
pub struct BenchmarkTable {
    rates: HashMap<String, f64>,
    fallback: f64,
}

/// Raw row of a benchmark override CSV
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Benchmark")]
    benchmark: String,
    #[serde(rename = "Annual_Growth_pts")]
    annual_growth_pts: f64,
}

impl BenchmarkTable {
    /// Build a table from (name, pts/year) pairs; names are standardized
    pub fn new<'a, I>(rates: I, fallback: f64) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        Self {
            rates: rates
                .into_iter()
                .map(|(name, rate)| (standardize_name(name), rate))
                .collect(),
            fallback,
        }
    }

    /// The built-in table with the given fallback rate
    pub fn default_rates(fallback: f64) -> Self {
        Self::new(DEFAULT_GROWTH_RATES, fallback)
    }

    /// Replace the built-in table with a `Benchmark,Annual_Growth_pts` CSV
    pub fn from_csv_path(path: &Path, fallback: f64) -> Result<Self> {
        let file = File::open(path).map_err(|source| ForecastError::MissingInput {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file, fallback)?;
        info!("Loaded {} benchmark growth rates from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: std::io::Read>(reader: R, fallback: f64) -> Result<Self> {
        let mut csv_reader = Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        for column in ["Benchmark", "Annual_Growth_pts"] {
            if !headers.iter().any(|h| h.trim() == column) {
                return Err(ForecastError::missing_column("benchmark-growth", column));
            }
        }

        let mut rates = HashMap::new();
        for result in csv_reader.deserialize() {
            let row: CsvRow = result?;
            rates.insert(standardize_name(&row.benchmark), row.annual_growth_pts);
        }

        Ok(Self { rates, fallback })
    }

    /// Growth for a standardized benchmark name, if known
    pub fn rate(&self, name: &str) -> Option<f64> {
        self.rates.get(name).copied()
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        Self::default_rates(DEFAULT_FALLBACK_GROWTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = BenchmarkTable::default();
        assert_eq!(table.rate("humaneval"), Some(16.2));
        assert_eq!(table.rate("mmlu-pro(1yr-spike)"), Some(33.1));
        assert_eq!(table.rate("big-bench"), Some(10.0));
        assert_eq!(table.rate("arc-agi"), None);
        assert_eq!(table.fallback(), 9.0);
    }

    #[test]
    fn test_override_from_csv() {
        let csv = "Benchmark,Annual_Growth_pts\nSWE-bench,22.5\nHumanEval,12.0\n";
        let table = BenchmarkTable::from_reader(csv.as_bytes(), 7.0).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rate("swe-bench"), Some(22.5));
        assert_eq!(table.rate("humaneval"), Some(12.0));
        assert_eq!(table.rate("math"), None);
        assert_eq!(table.fallback(), 7.0);
    }

    #[test]
    fn test_override_requires_columns() {
        let csv = "Name,Rate\nMATH,1.0\n";
        assert!(matches!(
            BenchmarkTable::from_reader(csv.as_bytes(), 9.0),
            Err(ForecastError::MissingColumn { .. })
        ));
    }
}
