//! # spamlens
//!
//! Spam detection for short text messages.
//!
//! ## Features
//!
//! - Regex tokenization with lowercasing and English stop words
//! - TF-IDF features over a vocabulary learned at training time
//! - Multinomial Naive Bayes with additive smoothing
//! - Checksummed, versioned on-disk artifacts
//! - A thread-safe scoring service with a fixed 0.5 decision threshold
//!
//! ## Example
//!
//! ```no_run
//! use spamlens::scoring::{ScoringConfig, ScoringService};
//!
//! # fn main() -> spamlens::error::Result<()> {
//! let service = ScoringService::initialize(&ScoringConfig::default())?;
//! let result = service.score("Win a free vacation now")?;
//! println!("{} ({:.2}%)", result.label, result.confidence_percent());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod error;
pub mod ml;
pub mod scoring;
pub mod storage;
pub mod training;

pub mod prelude {
    pub use crate::error::{Result, SpamlensError};
    pub use crate::ml::{Label, LabeledMessage, PredictionResult};
    pub use crate::scoring::{ScoringConfig, ScoringService};
    pub use crate::training::{TrainingConfig, TrainingPipeline};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
