//! Seeded, stratified train/held-out split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::ml::{Label, LabeledMessage};

/// A corpus divided into training and held-out parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Vec<LabeledMessage>,
    pub held_out: Vec<LabeledMessage>,
}

impl Split {
    /// Shuffle each class with `seed` and hold out `test_fraction` of it.
    ///
    /// The held-out count per class is rounded, but every class that is
    /// present keeps at least one training example. The same corpus, seed
    /// and fraction always produce the same split.
    pub fn stratified(corpus: &[LabeledMessage], test_fraction: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut train = Vec::with_capacity(corpus.len());
        let mut held_out = Vec::new();

        for label in Label::ALL {
            let mut members: Vec<&LabeledMessage> =
                corpus.iter().filter(|m| m.label == label).collect();
            if members.is_empty() {
                continue;
            }
            members.shuffle(&mut rng);

            let wanted = (members.len() as f64 * test_fraction).round() as usize;
            let n_held_out = wanted.min(members.len() - 1);
            let (held, kept) = members.split_at(n_held_out);
            held_out.extend(held.iter().map(|&m| m.clone()));
            train.extend(kept.iter().map(|&m| m.clone()));
        }

        train.shuffle(&mut rng);
        held_out.shuffle(&mut rng);
        Self { train, held_out }
    }

    pub fn train_texts(&self) -> Vec<&str> {
        self.train.iter().map(|m| m.text.as_str()).collect()
    }

    pub fn train_labels(&self) -> Vec<Label> {
        self.train.iter().map(|m| m.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::corpus::builtin_corpus;

    fn count(messages: &[LabeledMessage], label: Label) -> usize {
        messages.iter().filter(|m| m.label == label).count()
    }

    #[test]
    fn test_stratified_sizes() {
        let split = Split::stratified(&builtin_corpus(), 0.2, 42);
        assert_eq!(split.train.len(), 16);
        assert_eq!(split.held_out.len(), 4);
        assert_eq!(count(&split.train, Label::Ham), 9);
        assert_eq!(count(&split.train, Label::Spam), 7);
    }

    #[test]
    fn test_reproducible() {
        let corpus = builtin_corpus();
        let a = Split::stratified(&corpus, 0.2, 7);
        let b = Split::stratified(&corpus, 0.2, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_partition_is_complete() {
        let corpus = builtin_corpus();
        let split = Split::stratified(&corpus, 0.3, 1);
        let mut all: Vec<_> = split
            .train
            .iter()
            .chain(&split.held_out)
            .map(|m| m.text.clone())
            .collect();
        let mut expected: Vec<_> = corpus.into_iter().map(|m| m.text).collect();
        all.sort();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_keeps_one_training_example_per_class() {
        let corpus = vec![
            LabeledMessage::spam("free prize"),
            LabeledMessage::ham("see you"),
            LabeledMessage::ham("call me"),
        ];
        let split = Split::stratified(&corpus, 0.9, 42);
        assert_eq!(count(&split.train, Label::Spam), 1);
        assert_eq!(count(&split.train, Label::Ham), 1);
        assert_eq!(split.held_out.len(), 1);
    }

    #[test]
    fn test_zero_fraction() {
        let split = Split::stratified(&builtin_corpus(), 0.0, 42);
        assert_eq!(split.train.len(), 20);
        assert!(split.held_out.is_empty());
    }
}
