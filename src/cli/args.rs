//! Command line argument parsing for the spamlens CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::storage::DEFAULT_MODEL_DIR;

/// Environment variable naming the model directory.
pub const MODEL_DIR_ENV: &str = "SPAMLENS_MODEL_DIR";

/// spamlens - spam detection for short text messages
#[derive(Parser, Debug, Clone)]
#[command(name = "spamlens")]
#[command(about = "Train and run a TF-IDF + Naive Bayes spam classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SpamlensArgs {
    /// Verbosity level (repeat for more output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SpamlensArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model and write its artifacts
    Train(TrainArgs),

    /// Score messages with a trained model
    Score(ScoreArgs),

    /// Show information about trained artifacts
    Inspect(InspectArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Training config file (JSON); flags override its values
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Corpus file (.json, .jsonl or .csv); built-in corpus if omitted
    #[arg(long, value_name = "CORPUS_FILE")]
    pub corpus: Option<PathBuf>,

    /// Directory the artifacts are written to
    #[arg(short, long, value_name = "DIR", env = MODEL_DIR_ENV)]
    pub model_dir: Option<PathBuf>,

    /// Fraction of each class held out for evaluation
    #[arg(long)]
    pub test_fraction: Option<f64>,

    /// Seed for the train/held-out shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Additive smoothing for Naive Bayes
    #[arg(long)]
    pub alpha: Option<f64>,
}

/// Arguments for scoring
#[derive(Parser, Debug, Clone)]
pub struct ScoreArgs {
    /// Directory holding the artifacts
    #[arg(short, long, value_name = "DIR", env = MODEL_DIR_ENV, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: PathBuf,

    /// Messages to score; one per line from stdin if omitted
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,
}

/// Arguments for inspecting artifacts
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Directory holding the artifacts
    #[arg(short, long, value_name = "DIR", env = MODEL_DIR_ENV, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_train_command() {
        let args = SpamlensArgs::try_parse_from([
            "spamlens",
            "train",
            "--corpus",
            "sms.csv",
            "--model-dir",
            "/tmp/model",
            "--test-fraction",
            "0.25",
            "--seed",
            "7",
        ])
        .unwrap();

        if let Command::Train(train_args) = args.command {
            assert_eq!(train_args.corpus, Some(PathBuf::from("sms.csv")));
            assert_eq!(train_args.model_dir, Some(PathBuf::from("/tmp/model")));
            assert_eq!(train_args.test_fraction, Some(0.25));
            assert_eq!(train_args.seed, Some(7));
            assert_eq!(train_args.alpha, None);
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_score_command() {
        let args = SpamlensArgs::try_parse_from([
            "spamlens",
            "score",
            "--model-dir",
            "/tmp/model",
            "Win a free vacation now",
            "Lunch?",
        ])
        .unwrap();

        if let Command::Score(score_args) = args.command {
            assert_eq!(score_args.model_dir, PathBuf::from("/tmp/model"));
            assert_eq!(score_args.texts.len(), 2);
        } else {
            panic!("Expected Score command");
        }
    }

    #[test]
    fn test_global_flags() {
        let args = SpamlensArgs::try_parse_from([
            "spamlens",
            "inspect",
            "--model-dir",
            "m",
            "--format",
            "json",
            "--pretty",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
        assert_eq!(args.verbosity(), 3);
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let args =
            SpamlensArgs::try_parse_from(["spamlens", "-v", "-q", "inspect", "-m", "m"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
