//! Command implementations for the spamlens CLI.

use std::fs;
use std::io::{self, BufRead};

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::scoring::{ScoringConfig, ScoringService};
use crate::storage::ArtifactStore;
use crate::training::{TrainingConfig, TrainingPipeline};

/// Execute a CLI command.
pub fn execute_command(args: SpamlensArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args, &args),
        Command::Score(score_args) => score_messages(score_args, &args),
        Command::Inspect(inspect_args) => inspect_model(inspect_args, &args),
    }
}

/// Merge the config file (if any) with command line overrides.
pub fn training_config(args: &TrainArgs) -> Result<TrainingConfig> {
    let mut config = match &args.config {
        Some(path) => TrainingConfig::from_json_file(path)?,
        None => TrainingConfig::default(),
    };

    if let Some(corpus) = &args.corpus {
        config.corpus = Some(corpus.clone());
    }
    if let Some(model_dir) = &args.model_dir {
        config.model_dir = model_dir.clone();
    }
    if let Some(test_fraction) = args.test_fraction {
        config.test_fraction = test_fraction;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }

    config.validate()?;
    Ok(config)
}

/// Train and persist a model.
fn train_model(args: &TrainArgs, cli_args: &SpamlensArgs) -> Result<()> {
    let config = training_config(args)?;
    match &config.corpus {
        Some(path) => info!("Training from {}", path.display()),
        None => info!("Training from the built-in corpus"),
    }

    let report = TrainingPipeline::new(config)?.run()?;
    output_result(&report, cli_args)
}

/// Score messages given as arguments or on stdin.
fn score_messages(args: &ScoreArgs, cli_args: &SpamlensArgs) -> Result<()> {
    let service = ScoringService::initialize(&ScoringConfig::new(&args.model_dir))?;

    let texts = if args.texts.is_empty() {
        read_lines(io::stdin().lock())?
    } else {
        args.texts.clone()
    };

    let predictions = service.score_batch(&texts)?;
    let results = ScoreResults(
        texts
            .into_iter()
            .zip(&predictions)
            .map(|(text, prediction)| ScoredMessage::new(text, prediction))
            .collect(),
    );
    output_result(&results, cli_args)
}

/// Show artifact information.
fn inspect_model(args: &InspectArgs, cli_args: &SpamlensArgs) -> Result<()> {
    let store = ArtifactStore::new(&args.model_dir);
    let (extractor, classifier) = store.load()?;
    let paths = store.paths();
    let (ham_examples, spam_examples) = classifier.class_counts();

    let model_info = ModelInfo {
        model_dir: args.model_dir.clone(),
        vocabulary_size: extractor.vocabulary_size(),
        training_documents: extractor.n_documents(),
        ham_examples,
        spam_examples,
        alpha: classifier.alpha(),
        token_pattern: extractor.settings().token_pattern.clone(),
        extractor_bytes: fs::metadata(&paths.extractor)?.len(),
        classifier_bytes: fs::metadata(&paths.classifier)?.len(),
    };
    output_result(&model_info, cli_args)
}

/// Non-blank input lines.
fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}
