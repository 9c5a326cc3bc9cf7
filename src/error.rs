//! Error types for the forecasting pipeline
//!
//! Only two classes of failure abort a run: missing inputs (files, columns,
//! year values) and bad configuration. Everything recoverable is counted in
//! [`crate::quality::DataQualityReport`] instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    /// A required source file could not be opened
    #[error("missing input file {path}: {source}")]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from a table header
    #[error("table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    /// A per-year value needed downstream is absent
    #[error("no value for year {year} in trajectory of '{subject}'")]
    MissingYear { subject: String, year: i32 },

    /// A skill row references a skill that was never projected
    #[error("skill '{skill}' has no capability projection")]
    MissingSkill { skill: String },

    /// Aggregation method name not recognised
    #[error("unknown aggregation method '{name}' (expected max, mean or weighted_mean)")]
    UnknownPolicy { name: String },

    /// Duplicate skill policy name not recognised
    #[error("unknown duplicate skill policy '{name}' (expected keep_first or reject)")]
    UnknownDuplicatePolicy { name: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Duplicate skill rows disagree and the duplicate policy is `reject`
    #[error("skill '{skill}' appears with conflicting growth rate or baseline capability")]
    ConflictingSkill { skill: String },

    #[error("cannot build growth distribution for skill '{skill}': {reason}")]
    Distribution { skill: String, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ForecastError {
    pub fn missing_column(table: &str, column: &str) -> Self {
        Self::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    /// True for errors raised while validating configuration, before any input is read
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownPolicy { .. } | Self::UnknownDuplicatePolicy { .. } | Self::InvalidConfig { .. }
        )
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;
