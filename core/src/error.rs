//! Error types for sautibench.
//!
//! Every skip or failure in the scrape/eval pipelines maps to one of these
//! variants so it can be logged and surfaced as a note in the output tables
//! instead of aborting the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;

/// Errors that can occur while scraping the registry or evaluating models.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Registry entry lacks an id or any recognizable language tags.
    #[error("model {model} has no usable language metadata")]
    MetadataMissing { model: String },

    /// Model raised at inference time despite declaring support.
    #[error("inference failed for {model} on {language}: {message}")]
    Inference {
        model: String,
        language: String,
        message: String,
    },

    /// Requested language/split is not present in the dataset root.
    #[error("dataset split {language}/{split} not found at {path}")]
    DatasetMissing {
        language: String,
        split: String,
        path: PathBuf,
    },

    /// No local file mapping exists for a hub model id.
    #[error("no model file known for {model}")]
    UnknownModel { model: String },

    /// Audio file could not be decoded.
    #[error("audio error: {0}")]
    Audio(String),

    /// Support matrix CSV is malformed.
    #[error("matrix format error: {0}")]
    MatrixFormat(String),

    /// HTTP transport error talking to the registry or model host.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
