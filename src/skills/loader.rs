//! Load skill rows from the skill-demand CSV

use super::data::{BenchmarkLink, SkillRow};
use crate::error::{ForecastError, Result};
use crate::quality::DataQualityReport;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use std::fs::File;
use std::path::Path;

const TABLE: &str = "skill-demand";

const REQUIRED_COLUMNS: [&str; 4] = ["Occupation", "Code", "Skill", "SkillDemand"];

/// Raw CSV row; numeric cells that fail to parse come through as `None`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Occupation")]
    occupation: String,
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Skill")]
    skill: String,
    #[serde(rename = "SkillDemand", deserialize_with = "csv::invalid_option")]
    skill_demand: Option<f64>,
    #[serde(rename = "AI_Score_2024", default, deserialize_with = "csv::invalid_option")]
    ai_score: Option<f64>,
    #[serde(rename = "Collated_Score", default, deserialize_with = "csv::invalid_option")]
    collated_score: Option<f64>,

    #[serde(rename = "Benchmark_1", default)]
    benchmark_1: Option<String>,
    #[serde(rename = "Benchmark_1_Similarity", default, deserialize_with = "csv::invalid_option")]
    similarity_1: Option<f64>,
    #[serde(rename = "Benchmark_2", default)]
    benchmark_2: Option<String>,
    #[serde(rename = "Benchmark_2_Similarity", default, deserialize_with = "csv::invalid_option")]
    similarity_2: Option<f64>,
    #[serde(rename = "Benchmark_3", default)]
    benchmark_3: Option<String>,
    #[serde(rename = "Benchmark_3_Similarity", default, deserialize_with = "csv::invalid_option")]
    similarity_3: Option<f64>,
    #[serde(rename = "Benchmark_4", default)]
    benchmark_4: Option<String>,
    #[serde(rename = "Benchmark_4_Similarity", default, deserialize_with = "csv::invalid_option")]
    similarity_4: Option<f64>,
    #[serde(rename = "Benchmark_5", default)]
    benchmark_5: Option<String>,
    #[serde(rename = "Benchmark_5_Similarity", default, deserialize_with = "csv::invalid_option")]
    similarity_5: Option<f64>,
}

impl CsvRow {
    /// Baseline capability in [0, 1]; `Collated_Score` is on a 0-100 scale
    fn capability(&self) -> Option<f64> {
        let finite = |v: &f64| v.is_finite();
        self.ai_score
            .filter(finite)
            .or_else(|| self.collated_score.map(|s| s / 100.0).filter(finite))
            .map(|v| v.clamp(0.0, 1.0))
    }

    fn to_skill_row(self) -> Option<SkillRow> {
        let demand = self.skill_demand.filter(|d| d.is_finite())?;
        let capability = self.capability()?;

        let pairs = [
            (self.benchmark_1, self.similarity_1),
            (self.benchmark_2, self.similarity_2),
            (self.benchmark_3, self.similarity_3),
            (self.benchmark_4, self.similarity_4),
            (self.benchmark_5, self.similarity_5),
        ];
        let benchmarks = pairs
            .into_iter()
            .filter(|(name, similarity)| name.is_some() || similarity.is_some())
            .map(|(name, similarity)| BenchmarkLink::new(name.as_deref(), similarity))
            .collect();

        let mut row = SkillRow::new(&self.occupation, &self.code, &self.skill, demand, capability);
        row.benchmarks = benchmarks;
        Some(row)
    }
}

/// Skill rows plus what was dropped or repaired while reading them
#[derive(Debug, Clone)]
pub struct SkillTable {
    pub rows: Vec<SkillRow>,
    pub report: DataQualityReport,
}

fn check_headers(headers: &StringRecord) -> Result<()> {
    let has = |name: &str| headers.iter().any(|h| h.trim() == name);

    for column in REQUIRED_COLUMNS {
        if !has(column) {
            return Err(ForecastError::missing_column(TABLE, column));
        }
    }
    if !has("AI_Score_2024") && !has("Collated_Score") {
        return Err(ForecastError::missing_column(TABLE, "AI_Score_2024"));
    }
    Ok(())
}

/// Load the skill-demand table from a CSV file
pub fn load_skill_table<P: AsRef<Path>>(path: P) -> Result<SkillTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ForecastError::MissingInput {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_skill_table_from_reader(file)?;
    info!("Loaded {} skill rows from {}", table.rows.len(), path.display());
    Ok(table)
}

/// Load the skill-demand table from any reader (e.g. string buffer)
pub fn load_skill_table_from_reader<R: std::io::Read>(reader: R) -> Result<SkillTable> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    check_headers(&headers)?;

    let mut rows = Vec::new();
    let mut report = DataQualityReport::new();

    for result in csv_reader.deserialize() {
        let raw: CsvRow = result?;
        report.rows_read += 1;
        match raw.to_skill_row() {
            Some(row) => rows.push(row),
            None => report.rows_dropped += 1,
        }
    }

    Ok(SkillTable { rows, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Occupation,Code,Skill,SkillDemand,AI_Score_2024,Benchmark_1,Benchmark_1_Similarity,Benchmark_2,Benchmark_2_Similarity
Software Developers,15-1252.00,Programming,0.9,0.40,HumanEval,0.8,MMLU,
Software Developers,15-1252.00,Active  Listening,0.5,0.30,,,,
Lawyers,23-1011.00,Programming,0.2,0.40,HumanEval,0.8,,
Lawyers,23-1011.00,Writing,n/a,0.55,MMLU,0.6,,
";

    #[test]
    fn test_load_rows_and_drop_unusable() {
        let table = load_skill_table_from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.report.rows_read, 4);
        assert_eq!(table.report.rows_dropped, 1);
        assert_eq!(table.rows.len(), 3);

        let first = &table.rows[0];
        assert_eq!(first.skill, "programming");
        assert_eq!(first.code, "15-1252.00");
        assert_eq!(first.benchmarks.len(), 2);
        assert_eq!(first.benchmarks[0].name.as_deref(), Some("humaneval"));
        assert_eq!(first.benchmarks[0].similarity, 0.8);
        // Named benchmark with empty similarity contributes nothing
        assert_eq!(first.benchmarks[1].similarity, 0.0);

        assert_eq!(table.rows[1].skill, "active_listening");
        assert!(table.rows[1].benchmarks.is_empty());
    }

    #[test]
    fn test_collated_score_is_rescaled() {
        let csv = "Occupation,Code,Skill,SkillDemand,Collated_Score\nClerks,43-9061.00,Typing,0.4,72.5\n";
        let table = load_skill_table_from_reader(csv.as_bytes()).unwrap();
        assert!((table.rows[0].capability - 0.725).abs() < 1e-12);
    }

    #[test]
    fn test_unusable_ai_score_falls_back_to_collated() {
        let csv = "Occupation,Code,Skill,SkillDemand,AI_Score_2024,Collated_Score\nClerks,43-9061.00,Typing,0.4,NaN,72.5\n";
        let table = load_skill_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.report.rows_dropped, 0);
        assert!((table.rows[0].capability - 0.725).abs() < 1e-12);
    }

    #[test]
    fn test_padded_cells_are_trimmed() {
        let csv = "Occupation,Code,Skill,SkillDemand,AI_Score_2024,Benchmark_1,Benchmark_1_Similarity\nClerks,43-9061.00,Typing, 0.4 , 0.5 , MMLU , 0.6 \n";
        let table = load_skill_table_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.report.rows_dropped, 0);
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.demand, 0.4);
        assert_eq!(row.capability, 0.5);
        assert_eq!(row.benchmarks[0].name.as_deref(), Some("mmlu"));
        assert_eq!(row.benchmarks[0].similarity, 0.6);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Occupation,Code,Skill,AI_Score_2024\nClerks,43-9061.00,Typing,0.4\n";
        let err = load_skill_table_from_reader(csv.as_bytes()).unwrap_err();
        assert!(
            matches!(err, ForecastError::MissingColumn { ref column, .. } if column == "SkillDemand")
        );
    }

    #[test]
    fn test_missing_capability_column() {
        let csv = "Occupation,Code,Skill,SkillDemand\nClerks,43-9061.00,Typing,0.4\n";
        let err = load_skill_table_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ForecastError::MissingColumn { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_skill_table("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, ForecastError::MissingInput { .. }));
    }
}
