//! Offline training.
//!
//! `LoadCorpus -> Split -> FitExtractor -> FitClassifier -> Evaluate -> Persist`
//!
//! Any failure before `Persist` aborts the run without writing artifacts.

pub mod config;
pub mod corpus;
pub mod pipeline;
pub mod split;

pub use config::TrainingConfig;
pub use corpus::{CorpusFormat, builtin_corpus, load_corpus, parse_corpus};
pub use pipeline::{Stage, TrainedModel, TrainingPipeline, TrainingReport, train};
pub use split::Split;
