//! Feature extraction and classification.
//!
//! - [`TfIdfVectorizer`] / [`FittedExtractor`]: message text to sparse TF-IDF
//!   vectors over a learned vocabulary
//! - [`MultinomialNaiveBayes`] / [`FittedClassifier`]: vectors to a spam
//!   posterior probability
//! - [`Evaluation`]: held-out accuracy, precision and recall
//!
//! An extractor and a classifier are only meaningful as a matched pair: the
//! classifier's weight rows are indexed by the extractor's vocabulary.
//!
//! # Example
//!
//! ```
//! use spamlens::ml::{Label, MultinomialNaiveBayes, TfIdfVectorizer};
//!
//! # fn main() -> spamlens::error::Result<()> {
//! let texts = ["Win a free vacation now", "Lunch tomorrow?"];
//! let labels = [Label::Spam, Label::Ham];
//!
//! let extractor = TfIdfVectorizer::new().fit(&texts)?;
//! let vectors = extractor.transform_batch(&texts)?;
//! let classifier = MultinomialNaiveBayes::new().fit(&vectors, &labels)?;
//!
//! let p = classifier.predict_probability(&extractor.transform("free vacation")?)?;
//! assert!(p > 0.5);
//! # Ok(())
//! # }
//! ```

pub mod feature;
pub mod metrics;
pub mod naive_bayes;
pub mod tfidf;
pub mod types;

pub use feature::FeatureVector;
pub use metrics::{ClassMetrics, Evaluation};
pub use naive_bayes::{DEFAULT_ALPHA, FittedClassifier, MultinomialNaiveBayes};
pub use tfidf::{FittedExtractor, TfIdfVectorizer};
pub use types::{Label, LabeledMessage, PredictionResult};
