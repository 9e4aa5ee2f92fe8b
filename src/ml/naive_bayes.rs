//! Multinomial Naive Bayes classifier over TF-IDF features.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamlensError};
use crate::ml::feature::FeatureVector;
use crate::ml::types::Label;
use crate::scoring::decide;

/// Default additive smoothing.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Unfitted multinomial Naive Bayes model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
}

impl Default for MultinomialNaiveBayes {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl MultinomialNaiveBayes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom additive smoothing parameter.
    pub fn with_alpha(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fit the model on vectors and their labels.
    ///
    /// Per class `c` and term `t`:
    /// `log P(t|c) = ln((fc[c][t] + alpha) / (sum_t fc[c][t] + alpha * V))`,
    /// where `fc` sums feature values over the class's vectors. Class priors
    /// are the empirical class frequencies.
    pub fn fit(&self, vectors: &[FeatureVector], labels: &[Label]) -> Result<FittedClassifier> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(SpamlensError::insufficient_training_data(format!(
                "smoothing alpha must be positive, got {}",
                self.alpha
            )));
        }
        if vectors.len() != labels.len() {
            return Err(SpamlensError::insufficient_training_data(format!(
                "{} vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }
        let Some(first) = vectors.first() else {
            return Err(SpamlensError::insufficient_training_data(
                "no training examples",
            ));
        };

        let dimension = first.dimension();
        let mut class_count = [0usize; 2];
        let mut feature_count = [vec![0.0; dimension], vec![0.0; dimension]];

        for (vector, label) in vectors.iter().zip(labels) {
            if vector.dimension() != dimension {
                return Err(SpamlensError::insufficient_training_data(format!(
                    "mixed vector dimensions: {} and {}",
                    dimension,
                    vector.dimension()
                )));
            }
            let class = label.as_index();
            class_count[class] += 1;
            for (index, value) in vector.iter() {
                feature_count[class][index] += value;
            }
        }

        for label in Label::ALL {
            if class_count[label.as_index()] == 0 {
                return Err(SpamlensError::insufficient_training_data(format!(
                    "no {label} examples in training data"
                )));
            }
        }

        let total = vectors.len() as f64;
        let class_log_prior = class_count.map(|count| (count as f64 / total).ln());
        let feature_log_prob = feature_count.map(|counts| {
            let denominator = counts.iter().sum::<f64>() + self.alpha * dimension as f64;
            counts
                .iter()
                .map(|count| ((count + self.alpha) / denominator).ln())
                .collect::<Vec<f64>>()
        });

        debug!(
            "Fitted Naive Bayes on {} ham / {} spam examples, {} features",
            class_count[0], class_count[1], dimension
        );

        Ok(FittedClassifier {
            alpha: self.alpha,
            class_count,
            class_log_prior,
            feature_log_prob,
        })
    }
}

/// A fitted Naive Bayes model. Read-only after fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedClassifier {
    alpha: f64,
    /// Training examples per class, indexed by [`Label::as_index`].
    class_count: [usize; 2],
    class_log_prior: [f64; 2],
    /// Per-class smoothed log-probability of each vocabulary term.
    feature_log_prob: [Vec<f64>; 2],
}

impl FittedClassifier {
    /// Build a classifier directly from its parameters.
    pub fn from_parameters(
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    ) -> Result<Self> {
        let classifier = Self {
            alpha: DEFAULT_ALPHA,
            class_count: [0, 0],
            class_log_prior,
            feature_log_prob,
        };
        classifier.validate()?;
        Ok(classifier)
    }

    /// Check internal consistency; used after deserialization.
    pub fn validate(&self) -> Result<()> {
        let [ham, spam] = &self.feature_log_prob;
        if ham.len() != spam.len() {
            return Err(SpamlensError::serialization(format!(
                "per-class weight rows differ in length: {} and {}",
                ham.len(),
                spam.len()
            )));
        }
        let all_finite = self.class_log_prior.iter().all(|p| p.is_finite())
            && ham.iter().chain(spam.iter()).all(|p| p.is_finite());
        if !all_finite {
            return Err(SpamlensError::serialization(
                "classifier parameters contain non-finite values",
            ));
        }
        Ok(())
    }

    /// Vocabulary size this classifier was fitted against.
    pub fn n_features(&self) -> usize {
        self.feature_log_prob[0].len()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Training examples per class as `(ham, spam)`.
    pub fn class_counts(&self) -> (usize, usize) {
        (self.class_count[0], self.class_count[1])
    }

    /// Joint log-likelihoods `(ham, spam)` of a vector.
    pub fn predict_log_likelihoods(&self, vector: &FeatureVector) -> Result<(f64, f64)> {
        if vector.dimension() != self.n_features() {
            return Err(SpamlensError::DimensionMismatch {
                expected: self.n_features(),
                actual: vector.dimension(),
            });
        }
        let ham = self.class_log_prior[0] + vector.dot(&self.feature_log_prob[0])?;
        let spam = self.class_log_prior[1] + vector.dot(&self.feature_log_prob[1])?;
        Ok((ham, spam))
    }

    /// Posterior probability of the spam class.
    ///
    /// Normalized in log space as `1 / (1 + exp(jll_ham - jll_spam))`, which
    /// is exactly 0.5 when both joint log-likelihoods are equal and saturates
    /// to 0 or 1 instead of overflowing.
    pub fn predict_probability(&self, vector: &FeatureVector) -> Result<f64> {
        let (ham, spam) = self.predict_log_likelihoods(vector)?;
        Ok(1.0 / (1.0 + (ham - spam).exp()))
    }

    /// Label under the service decision rule: spam iff the posterior is
    /// strictly above [`SPAM_THRESHOLD`](crate::scoring::SPAM_THRESHOLD).
    pub fn predict(&self, vector: &FeatureVector) -> Result<Label> {
        Ok(decide(self.predict_probability(vector)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(dimension: usize, pairs: &[(usize, f64)]) -> FeatureVector {
        FeatureVector::from_pairs(dimension, pairs.iter().copied()).unwrap()
    }

    fn fitted() -> FittedClassifier {
        // Feature 0 is a spam word, feature 1 a ham word, feature 2 shared.
        let vectors = vec![
            vector(3, &[(0, 0.8), (2, 0.6)]),
            vector(3, &[(0, 1.0)]),
            vector(3, &[(1, 0.8), (2, 0.6)]),
            vector(3, &[(1, 1.0)]),
        ];
        let labels = vec![Label::Spam, Label::Spam, Label::Ham, Label::Ham];
        MultinomialNaiveBayes::new().fit(&vectors, &labels).unwrap()
    }

    #[test]
    fn test_fit_parameters() {
        let classifier = fitted();
        assert_eq!(classifier.n_features(), 3);
        assert_eq!(classifier.class_counts(), (2, 2));

        // Spam feature counts: [1.8, 0.0, 0.6], total 2.4, denominator 5.4.
        let expected = ((1.8f64 + 1.0) / 5.4).ln();
        assert!((classifier.feature_log_prob[1][0] - expected).abs() < 1e-12);
        assert!((classifier.class_log_prior[0] - 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_predict_probability() {
        let classifier = fitted();

        let spammy = classifier.predict_probability(&vector(3, &[(0, 1.0)])).unwrap();
        let hammy = classifier.predict_probability(&vector(3, &[(1, 1.0)])).unwrap();
        assert!(spammy > 0.5);
        assert!(hammy < 0.5);
        assert_eq!(classifier.predict(&vector(3, &[(0, 1.0)])).unwrap(), Label::Spam);
        assert_eq!(classifier.predict(&vector(3, &[(1, 1.0)])).unwrap(), Label::Ham);
    }

    #[test]
    fn test_zero_vector_returns_prior() {
        let classifier = fitted();
        let probability = classifier.predict_probability(&FeatureVector::zeros(3)).unwrap();
        assert_eq!(probability, 0.5);
        assert_eq!(classifier.predict(&FeatureVector::zeros(3)).unwrap(), Label::Ham);
    }

    #[test]
    fn test_predict_agrees_with_rounded_posterior() {
        // The spam prior is one ulp above the ham prior, so the posterior
        // rounds to exactly 0.5 even though spam is nominally more likely.
        let ham_prior = 0.5f64.ln();
        let spam_prior = f64::from_bits(ham_prior.to_bits() - 1);
        assert!(spam_prior > ham_prior);
        let classifier =
            FittedClassifier::from_parameters([ham_prior, spam_prior], [vec![0.0], vec![0.0]])
                .unwrap();

        let zero = FeatureVector::zeros(1);
        let (ham, spam) = classifier.predict_log_likelihoods(&zero).unwrap();
        assert!(spam > ham);
        assert_eq!(classifier.predict_probability(&zero).unwrap(), 0.5);
        assert_eq!(classifier.predict(&zero).unwrap(), Label::Ham);
    }

    #[test]
    fn test_extreme_likelihoods_stay_in_range() {
        let classifier = FittedClassifier::from_parameters(
            [0.5f64.ln(), 0.5f64.ln()],
            [vec![-1000.0, 0.0], vec![0.0, -1000.0]],
        )
        .unwrap();

        let spam = classifier.predict_probability(&vector(2, &[(0, 5.0)])).unwrap();
        let ham = classifier.predict_probability(&vector(2, &[(1, 5.0)])).unwrap();
        assert_eq!(spam, 1.0);
        assert_eq!(ham, 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let classifier = fitted();
        let result = classifier.predict_probability(&FeatureVector::zeros(4));
        assert!(matches!(
            result,
            Err(SpamlensError::DimensionMismatch {
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_fit_requires_both_classes() {
        let vectors = vec![vector(2, &[(0, 1.0)]), vector(2, &[(1, 1.0)])];
        let result = MultinomialNaiveBayes::new().fit(&vectors, &[Label::Spam, Label::Spam]);
        assert!(matches!(
            result,
            Err(SpamlensError::InsufficientTrainingData(_))
        ));
    }

    #[test]
    fn test_fit_requires_aligned_labels() {
        let vectors = vec![vector(2, &[(0, 1.0)]), vector(2, &[(1, 1.0)])];
        let result = MultinomialNaiveBayes::new().fit(&vectors, &[Label::Spam]);
        assert!(matches!(
            result,
            Err(SpamlensError::InsufficientTrainingData(_))
        ));

        let result = MultinomialNaiveBayes::new().fit(&[], &[]);
        assert!(matches!(
            result,
            Err(SpamlensError::InsufficientTrainingData(_))
        ));
    }

    #[test]
    fn test_fit_rejects_bad_alpha() {
        let vectors = vec![vector(2, &[(0, 1.0)]), vector(2, &[(1, 1.0)])];
        let labels = [Label::Spam, Label::Ham];
        assert!(MultinomialNaiveBayes::with_alpha(0.0).fit(&vectors, &labels).is_err());
        assert!(MultinomialNaiveBayes::with_alpha(f64::NAN).fit(&vectors, &labels).is_err());
    }

    #[test]
    fn test_validate_rejects_ragged_rows() {
        let result = FittedClassifier::from_parameters([0.0, 0.0], [vec![0.0], vec![0.0, 0.0]]);
        assert!(result.is_err());
    }
}
