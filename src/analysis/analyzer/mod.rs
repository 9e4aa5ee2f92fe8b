//! Analyzer implementations that combine tokenizers and filters.

#[allow(clippy::module_inception)]
mod analyzer;
pub mod language;
mod pipeline;
mod settings;

pub use analyzer::Analyzer;
pub use language::EnglishAnalyzer;
pub use pipeline::PipelineAnalyzer;
pub use settings::{AnalyzerSettings, StopWords};
