//! Scoring service.
//!
//! A [`ScoringService`] owns one loaded extractor/classifier pair and turns
//! message text into a [`PredictionResult`]. It is immutable once built and
//! can be cloned or shared across threads freely.

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamlensError};
use crate::ml::{FittedClassifier, FittedExtractor, Label, PredictionResult};
use crate::storage::{ArtifactStore, DEFAULT_MODEL_DIR};

/// Spam probability above which a message is labeled spam.
///
/// The comparison is strict: exactly 0.5 is ham.
pub const SPAM_THRESHOLD: f64 = 0.5;

/// Where the scoring service finds its artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub model_dir: PathBuf,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
        }
    }
}

impl ScoringConfig {
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }
}

/// Apply the decision rule to a spam probability.
pub fn decide(spam_probability: f64) -> Label {
    if spam_probability > SPAM_THRESHOLD {
        Label::Spam
    } else {
        Label::Ham
    }
}

/// Read-only scoring over a fitted pair.
#[derive(Debug, Clone)]
pub struct ScoringService {
    extractor: Arc<FittedExtractor>,
    classifier: Arc<FittedClassifier>,
}

impl ScoringService {
    /// Build a service from an in-memory pair.
    pub fn new(extractor: FittedExtractor, classifier: FittedClassifier) -> Result<Self> {
        if extractor.vocabulary_size() != classifier.n_features() {
            return Err(SpamlensError::DimensionMismatch {
                expected: extractor.vocabulary_size(),
                actual: classifier.n_features(),
            });
        }
        Ok(Self {
            extractor: Arc::new(extractor),
            classifier: Arc::new(classifier),
        })
    }

    /// Load the artifacts named by `config`. Fails if either is missing or
    /// unreadable.
    pub fn initialize(config: &ScoringConfig) -> Result<Self> {
        let (extractor, classifier) = ArtifactStore::new(&config.model_dir).load()?;
        let service = Self::new(extractor, classifier)?;
        info!(
            "Scoring service ready (vocabulary size {})",
            service.vocabulary_size()
        );
        Ok(service)
    }

    /// Score one message. Surrounding whitespace is ignored; empty text is
    /// scored from the class priors alone.
    pub fn score(&self, text: &str) -> Result<PredictionResult> {
        let text = text.trim();
        let vector = self.extractor.transform(text)?;
        let spam_probability = self.classifier.predict_probability(&vector)?;
        let label = decide(spam_probability);
        debug!(
            "Scored {} chars ({} known terms): p(spam) = {spam_probability:.4}",
            text.len(),
            vector.nnz()
        );
        Ok(PredictionResult {
            label,
            spam_probability,
        })
    }

    /// Score possibly absent text; `None` is treated as empty.
    pub fn score_option(&self, text: Option<&str>) -> Result<PredictionResult> {
        self.score(text.unwrap_or_default())
    }

    /// Score many messages in parallel, preserving order.
    pub fn score_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<Vec<PredictionResult>> {
        texts.par_iter().map(|t| self.score(t.as_ref())).collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.extractor.vocabulary_size()
    }

    /// Training examples per class as `(ham, spam)`.
    pub fn class_counts(&self) -> (usize, usize) {
        self.classifier.class_counts()
    }

    pub fn extractor(&self) -> &FittedExtractor {
        &self.extractor
    }

    pub fn classifier(&self) -> &FittedClassifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{MultinomialNaiveBayes, TfIdfVectorizer};

    fn service() -> ScoringService {
        let texts = [
            "win a free prize now",
            "claim your free cash prize",
            "lunch tomorrow with the team",
            "meeting moved to friday",
        ];
        let labels = [Label::Spam, Label::Spam, Label::Ham, Label::Ham];
        let extractor = TfIdfVectorizer::new().fit(&texts).unwrap();
        let vectors = extractor.transform_batch(&texts).unwrap();
        let classifier = MultinomialNaiveBayes::new().fit(&vectors, &labels).unwrap();
        ScoringService::new(extractor, classifier).unwrap()
    }

    #[test]
    fn test_decide() {
        assert_eq!(decide(0.5), Label::Ham);
        assert_eq!(decide(0.500_001), Label::Spam);
        assert_eq!(decide(0.0), Label::Ham);
        assert_eq!(decide(1.0), Label::Spam);
    }

    #[test]
    fn test_score() {
        let service = service();
        let spam = service.score("free prize").unwrap();
        assert_eq!(spam.label, Label::Spam);
        assert!(spam.spam_probability > 0.5);

        let ham = service.score("team lunch").unwrap();
        assert_eq!(ham.label, Label::Ham);
    }

    #[test]
    fn test_empty_and_absent_text() {
        let service = service();
        let empty = service.score("   ").unwrap();
        assert_eq!(empty.spam_probability, 0.5);
        assert_eq!(empty.label, Label::Ham);
        assert_eq!(service.score_option(None).unwrap(), empty);
    }

    #[test]
    fn test_score_batch_preserves_order() {
        let service = service();
        let texts = ["free prize", "team lunch", "free cash"];
        let batch = service.score_batch(&texts).unwrap();
        let single: Vec<_> = texts.iter().map(|t| service.score(t).unwrap()).collect();
        assert_eq!(batch, single);
    }

    #[test]
    fn test_rejects_mismatched_pair() {
        let extractor = TfIdfVectorizer::new().fit(&["alpha beta", "gamma"]).unwrap();
        let other = TfIdfVectorizer::new().fit(&["delta"]).unwrap();
        let vectors = other.transform_batch(&["delta", "delta"]).unwrap();
        let classifier = MultinomialNaiveBayes::new()
            .fit(&vectors, &[Label::Ham, Label::Spam])
            .unwrap();
        assert!(matches!(
            ScoringService::new(extractor, classifier),
            Err(SpamlensError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ScoringService>();
    }
}
