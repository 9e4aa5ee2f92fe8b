//! Output formatting for CLI commands.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::args::{OutputFormat, SpamlensArgs};
use crate::error::Result;
use crate::ml::{Label, PredictionResult};

/// Result structure for one scored message.
#[derive(Debug, Serialize)]
pub struct ScoredMessage {
    pub text: String,
    pub prediction: u8,
    pub label: Label,
    pub result: String,
    pub spam_probability: f64,
    /// Spam probability in percent, two decimals.
    pub confidence: f64,
}

impl ScoredMessage {
    pub fn new(text: String, prediction: &PredictionResult) -> Self {
        Self {
            text,
            prediction: prediction.label.as_index() as u8,
            label: prediction.label,
            result: prediction.label.display_name().to_string(),
            spam_probability: prediction.spam_probability,
            confidence: prediction.confidence_percent(),
        }
    }
}

impl fmt::Display for ScoredMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:>6.2}%  {}",
            self.result, self.confidence, self.text
        )
    }
}

/// Result structure for a scoring run.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ScoreResults(pub Vec<ScoredMessage>);

impl fmt::Display for ScoreResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{message}")?;
        }
        Ok(())
    }
}

/// Artifact information.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model_dir: PathBuf,
    pub vocabulary_size: usize,
    pub training_documents: usize,
    pub ham_examples: usize,
    pub spam_examples: usize,
    pub alpha: f64,
    pub token_pattern: String,
    pub extractor_bytes: u64,
    pub classifier_bytes: u64,
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model directory:    {}", self.model_dir.display())?;
        writeln!(f, "Vocabulary size:    {}", self.vocabulary_size)?;
        writeln!(f, "Training messages:  {}", self.training_documents)?;
        writeln!(
            f,
            "Class counts:       {} ham / {} spam",
            self.ham_examples, self.spam_examples
        )?;
        writeln!(f, "Smoothing alpha:    {}", self.alpha)?;
        writeln!(f, "Token pattern:      {}", self.token_pattern)?;
        write!(
            f,
            "Artifact sizes:     {} + {} bytes",
            self.extractor_bytes, self.classifier_bytes
        )
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + fmt::Display>(result: &T, args: &SpamlensArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            println!("{result}");
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &SpamlensArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
