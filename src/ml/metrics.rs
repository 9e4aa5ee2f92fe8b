//! Held-out evaluation metrics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamlensError};
use crate::ml::types::Label;

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of held-out examples with this true label.
    pub support: usize,
}

/// Classification report over a held-out set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub ham: ClassMetrics,
    pub spam: ClassMetrics,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    /// `confusion[actual][predicted]`, indexed by [`Label::as_index`].
    pub confusion: [[usize; 2]; 2],
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Evaluation {
    /// Compare predictions against ground truth.
    ///
    /// Undefined ratios (no predicted or no actual examples of a class) are
    /// reported as 0.0.
    pub fn from_predictions(actual: &[Label], predicted: &[Label]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(SpamlensError::insufficient_training_data(format!(
                "{} labels but {} predictions",
                actual.len(),
                predicted.len()
            )));
        }

        let mut confusion = [[0usize; 2]; 2];
        for (a, p) in actual.iter().zip(predicted) {
            confusion[a.as_index()][p.as_index()] += 1;
        }

        let class = |label: Label| {
            let i = label.as_index();
            let true_positive = confusion[i][i];
            let predicted_total = confusion[0][i] + confusion[1][i];
            let support = confusion[i][0] + confusion[i][1];
            let precision = ratio(true_positive, predicted_total);
            let recall = ratio(true_positive, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                precision,
                recall,
                f1,
                support,
            }
        };

        let ham = class(Label::Ham);
        let spam = class(Label::Spam);
        let total = actual.len();

        let macro_avg = ClassMetrics {
            precision: (ham.precision + spam.precision) / 2.0,
            recall: (ham.recall + spam.recall) / 2.0,
            f1: (ham.f1 + spam.f1) / 2.0,
            support: total,
        };
        let weighted = |f: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                (f(&ham) * ham.support as f64 + f(&spam) * spam.support as f64) / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m: &ClassMetrics| m.precision),
            recall: weighted(|m: &ClassMetrics| m.recall),
            f1: weighted(|m: &ClassMetrics| m.f1),
            support: total,
        };

        Ok(Self {
            accuracy: ratio(confusion[0][0] + confusion[1][1], total),
            ham,
            spam,
            macro_avg,
            weighted_avg,
            confusion,
        })
    }

    /// Number of evaluated examples.
    pub fn total(&self) -> usize {
        self.ham.support + self.spam.support
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        let rows = [
            ("ham", &self.ham),
            ("spam", &self.spam),
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ];
        for (i, (name, m)) in rows.iter().enumerate() {
            if i == 2 {
                writeln!(f)?;
            }
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}
