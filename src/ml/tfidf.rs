//! TF-IDF vectorizer for text feature extraction.
//!
//! [`TfIdfVectorizer`] is the unfitted builder; fitting it on a corpus yields
//! a [`FittedExtractor`] that owns the vocabulary and IDF weights and turns
//! messages into L2-normalized [`FeatureVector`]s.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, AnalyzerSettings};
use crate::error::{Result, SpamlensError};
use crate::ml::feature::FeatureVector;

/// TF-IDF vectorizer for text feature extraction.
#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    settings: AnalyzerSettings,
}

impl TfIdfVectorizer {
    /// Create a vectorizer using the default English analysis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vectorizer with custom analyzer settings.
    pub fn with_settings(settings: AnalyzerSettings) -> Self {
        Self { settings }
    }

    /// Fit the vectorizer on training documents.
    ///
    /// Vocabulary indices are assigned in lexicographic term order, so the
    /// same corpus always produces the same mapping. IDF is smoothed:
    /// `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit<S: AsRef<str>>(&self, documents: &[S]) -> Result<FittedExtractor> {
        if documents.is_empty() {
            return Err(SpamlensError::degenerate_corpus(
                "cannot fit a vectorizer on an empty corpus",
            ));
        }

        let analyzer = self.settings.build()?;
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let unique_terms: BTreeSet<String> =
                analyzer.terms(doc.as_ref())?.into_iter().collect();
            for term in unique_terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(SpamlensError::degenerate_corpus(format!(
                "no terms left after analysis of {} documents",
                documents.len()
            )));
        }

        let sorted: BTreeMap<String, usize> = document_frequency.into_iter().collect();
        let n_documents = documents.len();
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(sorted.len());
        for (idx, (term, df)) in sorted.into_iter().enumerate() {
            idf.push(((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        debug!(
            "Fitted TF-IDF vocabulary of {} terms over {} documents",
            vocabulary.len(),
            n_documents
        );

        Ok(FittedExtractor {
            settings: self.settings.clone(),
            vocabulary,
            idf,
            n_documents,
            analyzer,
        })
    }
}

/// Persisted form of a [`FittedExtractor`].
#[derive(Serialize, Deserialize)]
pub(crate) struct ExtractorState {
    pub(crate) settings: AnalyzerSettings,
    pub(crate) vocabulary: BTreeMap<String, usize>,
    pub(crate) idf: Vec<f64>,
    pub(crate) n_documents: usize,
}

/// A fitted TF-IDF extractor. Read-only after fitting.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "ExtractorState", into = "ExtractorState")]
pub struct FittedExtractor {
    settings: AnalyzerSettings,
    /// Vocabulary: term -> index mapping.
    vocabulary: BTreeMap<String, usize>,
    /// Inverse document frequency for each index.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for FittedExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FittedExtractor")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl PartialEq for FittedExtractor {
    fn eq(&self, other: &Self) -> bool {
        self.settings == other.settings
            && self.vocabulary == other.vocabulary
            && self.idf == other.idf
            && self.n_documents == other.n_documents
    }
}

impl From<FittedExtractor> for ExtractorState {
    fn from(extractor: FittedExtractor) -> Self {
        ExtractorState {
            settings: extractor.settings,
            vocabulary: extractor.vocabulary,
            idf: extractor.idf,
            n_documents: extractor.n_documents,
        }
    }
}

impl TryFrom<ExtractorState> for FittedExtractor {
    type Error = SpamlensError;

    fn try_from(state: ExtractorState) -> Result<Self> {
        if state.vocabulary.len() != state.idf.len() {
            return Err(SpamlensError::serialization(format!(
                "vocabulary has {} terms but {} idf weights",
                state.vocabulary.len(),
                state.idf.len()
            )));
        }
        let mut seen = vec![false; state.idf.len()];
        for &idx in state.vocabulary.values() {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(SpamlensError::serialization(format!(
                        "vocabulary index {idx} is out of range or repeated"
                    )));
                }
            }
        }
        // Smoothed IDF is always at least 1.
        if let Some(bad) = state.idf.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(SpamlensError::serialization(format!(
                "idf weight {bad} is not a positive finite number"
            )));
        }

        let analyzer = state.settings.build()?;
        Ok(FittedExtractor {
            settings: state.settings,
            vocabulary: state.vocabulary,
            idf: state.idf,
            n_documents: state.n_documents,
            analyzer,
        })
    }
}

impl FittedExtractor {
    /// Transform a document into an L2-normalized TF-IDF vector.
    ///
    /// Terms outside the vocabulary contribute nothing. A document with no
    /// known terms yields the zero vector.
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyzer.terms(document)? {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut vector = FeatureVector::from_pairs(
            self.vocabulary_size(),
            counts
                .into_iter()
                .map(|(idx, count)| (idx, count * self.idf[idx])),
        )?;
        vector.normalize();
        Ok(vector)
    }

    /// Transform many documents in parallel, preserving order.
    pub fn transform_batch<S: AsRef<str> + Sync>(
        &self,
        documents: &[S],
    ) -> Result<Vec<FeatureVector>> {
        documents
            .par_iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Index of a term, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// IDF weight of a term, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|idx| self.idf[idx])
    }

    /// Vocabulary terms in index order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }
}
