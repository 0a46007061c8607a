use std::path::PathBuf;

use thiserror::Error;

/// Fatal precondition failures. Short history, empty buckets and empty
/// datasets are not errors; they surface as values further down the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("required artifact not found: {} ({hint})", .path.display())]
    MissingArtifact { path: PathBuf, hint: &'static str },

    #[error("{artifact} is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        artifact: String,
        columns: Vec<String>,
    },

    #[error("{artifact} line {line}: {message}")]
    InvalidRow {
        artifact: String,
        line: u64,
        message: String,
    },

    #[error("unknown role tag '{tag}' for player '{player}'")]
    UnknownRole { player: String, tag: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
