//! End-to-end training run.

use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{Result, SpamlensError};
use crate::ml::{
    Evaluation, FittedClassifier, FittedExtractor, LabeledMessage, MultinomialNaiveBayes,
    TfIdfVectorizer,
};
use crate::scoring::decide;
use crate::storage::{ArtifactPaths, ArtifactStore};
use crate::training::config::TrainingConfig;
use crate::training::corpus::{builtin_corpus, load_corpus};
use crate::training::split::Split;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadCorpus,
    Split,
    FitExtractor,
    FitClassifier,
    Evaluate,
    Persist,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadCorpus => "load-corpus",
            Stage::Split => "split",
            Stage::FitExtractor => "fit-extractor",
            Stage::FitClassifier => "fit-classifier",
            Stage::Evaluate => "evaluate",
            Stage::Persist => "persist",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// A fitted pair that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub extractor: FittedExtractor,
    pub classifier: FittedClassifier,
    pub train_size: usize,
    pub held_out_size: usize,
    /// `None` when nothing was held out.
    pub evaluation: Option<Evaluation>,
}

/// Summary of a completed training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub train_size: usize,
    pub held_out_size: usize,
    pub vocabulary_size: usize,
    pub evaluation: Option<Evaluation>,
    pub artifacts: ArtifactPaths,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Trained on {} messages ({} held out), vocabulary size {}",
            self.train_size, self.held_out_size, self.vocabulary_size
        )?;
        writeln!(f)?;
        match &self.evaluation {
            Some(evaluation) => write!(f, "{evaluation}")?,
            None => writeln!(f, "No held-out messages; evaluation skipped.")?,
        }
        writeln!(f)?;
        writeln!(f, "Saved {}", self.artifacts.extractor.display())?;
        write!(f, "Saved {}", self.artifacts.classifier.display())
    }
}

/// Load, split, fit, evaluate and persist.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every stage using the configured corpus.
    pub fn run(&self) -> Result<TrainingReport> {
        enter(Stage::LoadCorpus);
        let corpus = match &self.config.corpus {
            Some(path) => load_corpus(path)?,
            None => builtin_corpus(),
        };
        self.run_on(&corpus)
    }

    /// Run every stage after loading on an in-memory corpus.
    pub fn run_on(&self, corpus: &[LabeledMessage]) -> Result<TrainingReport> {
        let model = self.fit(corpus)?;

        enter(Stage::Persist);
        let store = ArtifactStore::new(&self.config.model_dir);
        let artifacts = store.save(&model.extractor, &model.classifier)?;

        enter(Stage::Done);
        Ok(TrainingReport {
            train_size: model.train_size,
            held_out_size: model.held_out_size,
            vocabulary_size: model.extractor.vocabulary_size(),
            evaluation: model.evaluation,
            artifacts,
        })
    }

    /// Split, fit and evaluate without touching the disk.
    pub fn fit(&self, corpus: &[LabeledMessage]) -> Result<TrainedModel> {
        if corpus.is_empty() {
            return Err(SpamlensError::degenerate_corpus("training corpus is empty"));
        }
        info!("Training on {} messages", corpus.len());

        enter(Stage::Split);
        let split = Split::stratified(corpus, self.config.test_fraction, self.config.seed);
        debug!(
            "Split into {} training and {} held-out messages (seed {})",
            split.train.len(),
            split.held_out.len(),
            self.config.seed
        );

        enter(Stage::FitExtractor);
        let texts = split.train_texts();
        let extractor =
            TfIdfVectorizer::with_settings(self.config.analyzer.clone()).fit(&texts)?;
        info!("Vocabulary size {}", extractor.vocabulary_size());

        enter(Stage::FitClassifier);
        let vectors = extractor.transform_batch(&texts)?;
        let classifier =
            MultinomialNaiveBayes::with_alpha(self.config.alpha).fit(&vectors, &split.train_labels())?;

        enter(Stage::Evaluate);
        let evaluation = if split.held_out.is_empty() {
            warn!("Held-out set is empty; skipping evaluation");
            None
        } else {
            let evaluation = evaluate(&extractor, &classifier, &split.held_out)?;
            info!("Held-out accuracy {:.4}", evaluation.accuracy);
            Some(evaluation)
        };

        Ok(TrainedModel {
            extractor,
            classifier,
            train_size: split.train.len(),
            held_out_size: split.held_out.len(),
            evaluation,
        })
    }
}

/// Train with `config` and persist the artifacts.
pub fn train(config: TrainingConfig) -> Result<TrainingReport> {
    TrainingPipeline::new(config)?.run()
}

fn enter(stage: Stage) {
    debug!("Training stage: {stage}");
}

fn evaluate(
    extractor: &FittedExtractor,
    classifier: &FittedClassifier,
    held_out: &[LabeledMessage],
) -> Result<Evaluation> {
    let texts: Vec<&str> = held_out.iter().map(|m| m.text.as_str()).collect();
    let vectors = extractor.transform_batch(&texts)?;
    let predicted = vectors
        .iter()
        .map(|v| classifier.predict_probability(v).map(decide))
        .collect::<Result<Vec<_>>>()?;
    let actual: Vec<_> = held_out.iter().map(|m| m.label).collect();
    Evaluation::from_predictions(&actual, &predicted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> TrainingConfig {
        TrainingConfig {
            model_dir: dir.join("model"),
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_builtin_corpus() {
        let dir = tempdir().unwrap();
        let pipeline = TrainingPipeline::new(config_in(dir.path())).unwrap();
        let model = pipeline.fit(&builtin_corpus()).unwrap();

        assert_eq!(model.train_size, 16);
        assert_eq!(model.held_out_size, 4);
        assert_eq!(model.classifier.class_counts(), (9, 7));
        assert_eq!(
            model.classifier.n_features(),
            model.extractor.vocabulary_size()
        );
        assert_eq!(model.evaluation.as_ref().map(Evaluation::total), Some(4));
        // Nothing is written before persist.
        assert!(!dir.path().join("model").exists());
    }

    #[test]
    fn test_run_persists() {
        let dir = tempdir().unwrap();
        let report = train(config_in(dir.path())).unwrap();
        assert!(report.artifacts.extractor.is_file());
        assert!(report.artifacts.classifier.is_file());
        assert!(report.to_string().contains("Accuracy:"));
    }

    #[test]
    fn test_empty_corpus() {
        let dir = tempdir().unwrap();
        let pipeline = TrainingPipeline::new(config_in(dir.path())).unwrap();
        assert!(matches!(
            pipeline.run_on(&[]),
            Err(SpamlensError::DegenerateCorpus(_))
        ));
        assert!(!dir.path().join("model").exists());
    }

    #[test]
    fn test_evaluation_skipped_without_held_out() {
        let dir = tempdir().unwrap();
        let config = TrainingConfig {
            test_fraction: 0.0,
            ..config_in(dir.path())
        };
        let report = TrainingPipeline::new(config).unwrap().run().unwrap();
        assert_eq!(report.held_out_size, 0);
        assert!(report.evaluation.is_none());
        assert!(report.to_string().contains("evaluation skipped"));
    }

    #[test]
    fn test_invalid_config() {
        let config = TrainingConfig {
            test_fraction: 1.5,
            ..Default::default()
        };
        assert!(TrainingPipeline::new(config).is_err());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::FitExtractor.to_string(), "fit-extractor");
        assert_eq!(Stage::Done.to_string(), "done");
    }
}
