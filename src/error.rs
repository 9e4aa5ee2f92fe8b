//! Error types for the spamlens library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`SpamlensError`] enum. Training errors (`DegenerateCorpus`,
//! `InsufficientTrainingData`) are fatal to a training run; artifact errors
//! (`ArtifactNotFound`, `ArtifactCorrupt`) are fatal to service startup.
//!
//! # Examples
//!
//! ```
//! use spamlens::error::{Result, SpamlensError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SpamlensError::config("test fraction must be below 1.0"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for spamlens operations.
#[derive(Error, Debug)]
pub enum SpamlensError {
    /// The training corpus is empty or yields no vocabulary after analysis.
    #[error("Degenerate corpus: {0}")]
    DegenerateCorpus(String),

    /// Labels are misaligned with vectors or a class has no examples.
    #[error("Insufficient training data: {0}")]
    InsufficientTrainingData(String),

    /// An artifact file is missing.
    #[error("Artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// An artifact file exists but cannot be used.
    #[error("Artifact corrupt: {}: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// A feature vector was scored against a model of another vocabulary.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Corpus file parsing errors
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with SpamlensError.
pub type Result<T> = std::result::Result<T, SpamlensError>;

impl SpamlensError {
    /// Create a new degenerate corpus error.
    pub fn degenerate_corpus<S: Into<String>>(msg: S) -> Self {
        SpamlensError::DegenerateCorpus(msg.into())
    }

    /// Create a new insufficient training data error.
    pub fn insufficient_training_data<S: Into<String>>(msg: S) -> Self {
        SpamlensError::InsufficientTrainingData(msg.into())
    }

    /// Create a new artifact not found error.
    pub fn artifact_not_found<P: Into<PathBuf>>(path: P) -> Self {
        SpamlensError::ArtifactNotFound { path: path.into() }
    }

    /// Create a new artifact corrupt error.
    pub fn artifact_corrupt<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        SpamlensError::ArtifactCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SpamlensError::Analysis(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        SpamlensError::Corpus(msg.into())
    }

    /// Create a new invalid config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SpamlensError::Config(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SpamlensError::SerializationError(msg.into())
    }

    /// Whether this error comes from the artifact store.
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            SpamlensError::ArtifactNotFound { .. } | SpamlensError::ArtifactCorrupt { .. }
        )
    }
}
