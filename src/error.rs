use crate::schema::ColumnRole;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgingReportError {
    #[error("Required column role '{0}' is missing from the semantic mapping")]
    MissingRole(ColumnRole),

    #[error("Column '{column}' mapped for role '{role}' does not exist in the dataset")]
    UnknownColumn { role: ColumnRole, column: String },

    #[error("Row {row} has {found} cells but the header defines {expected} columns")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Invalid reporting date '{0}': expected YYYY-MM-DD")]
    InvalidReportingDate(String),

    #[error("Semantic column mapping failed: {0}")]
    MappingFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "openai")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AgingReportError>;
