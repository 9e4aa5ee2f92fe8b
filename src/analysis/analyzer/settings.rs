//! Serializable analyzer description.
//!
//! Analyzers are trait objects and cannot be persisted directly. The fitted
//! extractor stores an [`AnalyzerSettings`] instead and rebuilds the exact
//! same pipeline when it is loaded back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, EnglishAnalyzer, PipelineAnalyzer};
use crate::analysis::token_filter::{LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::analysis::tokenizer::regex::DEFAULT_TOKEN_PATTERN;
use crate::error::Result;

/// Stop word list selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StopWords {
    /// Built-in English list.
    #[default]
    English,
    /// No stop word removal.
    None,
    /// Caller-provided list.
    Custom(Vec<String>),
}

/// Settings from which an analyzer is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Regex whose matches become tokens.
    pub token_pattern: String,
    /// Lowercase tokens before stop word removal.
    pub lowercase: bool,
    /// Stop words to remove.
    pub stop_words: StopWords,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            lowercase: true,
            stop_words: StopWords::English,
        }
    }
}

impl AnalyzerSettings {
    /// Build the analyzer described by these settings.
    pub fn build(&self) -> Result<Arc<dyn Analyzer>> {
        if *self == Self::default() {
            return Ok(Arc::new(EnglishAnalyzer::new()?));
        }

        let tokenizer = Arc::new(RegexTokenizer::with_pattern(&self.token_pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer);
        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        match &self.stop_words {
            StopWords::English => {
                analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
            }
            StopWords::Custom(words) => {
                analyzer = analyzer.add_filter(Arc::new(StopFilter::from_words(words.clone())));
            }
            StopWords::None => {}
        }

        Ok(Arc::new(analyzer))
    }
}
