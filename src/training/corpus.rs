//! Training corpora.
//!
//! The built-in corpus is a tiny labeled SMS sample. External corpora can be
//! loaded from JSON, JSON Lines or CSV files:
//!
//! ```json
//! [{"text": "Dinner at 8?", "label": "ham"}]
//! ```
//!
//! ```csv
//! label,message
//! spam,Claim your prize now
//! ```
//!
//! Labels are `ham`/`spam` or `0`/`1`. A `message` key is accepted in place
//! of `text`.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use log::debug;
use serde::Deserialize;

use crate::error::{Result, SpamlensError};
use crate::ml::{Label, LabeledMessage};

const BUILTIN: [(Label, &str); 20] = [
    (Label::Ham, "Hey, are you coming to the party tonight?"),
    (
        Label::Spam,
        "Congratulations! You won a free vacation. Reply WIN to claim.",
    ),
    (Label::Ham, "Can we meet tomorrow for lunch?"),
    (
        Label::Spam,
        "You\u{2019}ve been selected for a $500 gift card! Click the link now.",
    ),
    (Label::Ham, "Don\u{2019}t forget our meeting at 3 PM."),
    (
        Label::Spam,
        "Win big prizes by joining our contest. Click here now!",
    ),
    (Label::Ham, "I\u{2019}ll call you once I\u{2019}m free."),
    (
        Label::Spam,
        "Your mobile number has won $10,000! Claim immediately.",
    ),
    (Label::Ham, "Happy Birthday! Hope you have an amazing day!"),
    (Label::Spam, "Get cheap loans instantly. Apply online now."),
    (Label::Ham, "Let\u{2019}s catch up this weekend."),
    (Label::Ham, "Dinner at 8?"),
    (Label::Spam, "Exclusive offer! Get 70% off your next order."),
    (Label::Ham, "I\u{2019}ll text you the address."),
    (
        Label::Spam,
        "You\u{2019}ve won a new iPhone! Claim your reward today.",
    ),
    (Label::Ham, "How was your trip?"),
    (
        Label::Spam,
        "You\u{2019}ve been pre-approved for a credit card! Apply today.",
    ),
    (Label::Ham, "Movie night tonight?"),
    (Label::Ham, "Please call me when you\u{2019}re done."),
    (Label::Spam, "Congratulations! You\u{2019}re our lucky winner!"),
];

/// The built-in 20-message corpus (11 ham, 9 spam).
pub fn builtin_corpus() -> Vec<LabeledMessage> {
    BUILTIN
        .iter()
        .map(|&(label, text)| LabeledMessage::new(text, label))
        .collect()
}

/// On-disk corpus formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    Json,
    Jsonl,
    Csv,
}

impl CorpusFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(CorpusFormat::Json),
            Some("jsonl") | Some("ndjson") => Ok(CorpusFormat::Jsonl),
            Some("csv") => Ok(CorpusFormat::Csv),
            _ => Err(SpamlensError::corpus(format!(
                "Cannot infer corpus format of {} (expected .json, .jsonl or .csv)",
                path.display()
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Name(String),
    Code(u8),
}

impl RawLabel {
    fn into_label(self) -> Result<Label> {
        match self {
            RawLabel::Name(name) => name.parse(),
            RawLabel::Code(code) => code.to_string().parse(),
        }
    }
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(alias = "message")]
    text: String,
    label: RawLabel,
}

impl RawRecord {
    fn into_message(self) -> Result<LabeledMessage> {
        Ok(LabeledMessage::new(self.text, self.label.into_label()?))
    }
}

/// Load a corpus file, choosing the parser by extension.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledMessage>> {
    let path = path.as_ref();
    let format = CorpusFormat::from_path(path)?;
    let input = fs::read_to_string(path).map_err(|e| {
        SpamlensError::corpus(format!("Failed to read corpus {}: {e}", path.display()))
    })?;
    let messages = parse_corpus(&input, format)?;
    debug!(
        "Loaded {} messages from {} ({format:?})",
        messages.len(),
        path.display()
    );
    Ok(messages)
}

/// Parse corpus text in the given format.
pub fn parse_corpus(input: &str, format: CorpusFormat) -> Result<Vec<LabeledMessage>> {
    match format {
        CorpusFormat::Json => parse_json(input),
        CorpusFormat::Jsonl => parse_jsonl(input),
        CorpusFormat::Csv => parse_csv(input),
    }
}

fn parse_json(input: &str) -> Result<Vec<LabeledMessage>> {
    let records: Vec<RawRecord> = serde_json::from_str(input)
        .map_err(|e| SpamlensError::corpus(format!("Invalid JSON corpus: {e}")))?;
    records.into_iter().map(RawRecord::into_message).collect()
}

fn parse_jsonl(input: &str) -> Result<Vec<LabeledMessage>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            let record: RawRecord = serde_json::from_str(line).map_err(|e| {
                SpamlensError::corpus(format!("Invalid JSON on line {}: {e}", number + 1))
            })?;
            record.into_message()
        })
        .collect()
}

fn parse_csv(input: &str) -> Result<Vec<LabeledMessage>> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SpamlensError::corpus(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let label_column = column(&["label"])
        .ok_or_else(|| SpamlensError::corpus("CSV corpus has no 'label' column"))?;
    let text_column = column(&["message", "text"])
        .ok_or_else(|| SpamlensError::corpus("CSV corpus has no 'message' column"))?;

    let mut messages = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| SpamlensError::corpus(format!("Failed to read CSV record: {e}")))?;
        let field = |i: usize| {
            record.get(i).ok_or_else(|| {
                SpamlensError::corpus(format!("CSV row {} is missing column {i}", row + 2))
            })
        };
        let label: Label = field(label_column)?.parse()?;
        messages.push(LabeledMessage::new(field(text_column)?, label));
    }
    Ok(messages)
}
