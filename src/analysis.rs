//! Text analysis for message tokenization.
//!
//! Tokenizers split raw text into tokens, token filters transform or drop
//! them, and analyzers chain the two into the term sequence consumed by the
//! TF-IDF extractor.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, AnalyzerSettings, EnglishAnalyzer, PipelineAnalyzer, StopWords};
pub use token::{Token, TokenStream};
