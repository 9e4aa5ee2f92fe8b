//! Common types for message classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamlensError};

/// Binary message label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Legitimate message.
    Ham,
    /// Unsolicited message.
    Spam,
}

impl Label {
    /// Both labels in encoding order.
    pub const ALL: [Label; 2] = [Label::Ham, Label::Spam];

    /// Numeric encoding: ham = 0, spam = 1.
    pub fn as_index(self) -> usize {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }

    /// Human-facing verdict text.
    pub fn display_name(self) -> &'static str {
        match self {
            Label::Ham => "Safe Message",
            Label::Spam => "Spam Message",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = SpamlensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ham" | "0" => Ok(Label::Ham),
            "spam" | "1" => Ok(Label::Spam),
            other => Err(SpamlensError::corpus(format!("Unknown label: {other:?}"))),
        }
    }
}

/// A labeled training example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledMessage {
    /// Message text.
    pub text: String,
    /// Ground-truth label.
    pub label: Label,
}

impl LabeledMessage {
    pub fn new<S: Into<String>>(text: S, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    pub fn ham<S: Into<String>>(text: S) -> Self {
        Self::new(text, Label::Ham)
    }

    pub fn spam<S: Into<String>>(text: S) -> Self {
        Self::new(text, Label::Spam)
    }
}

/// Outcome of scoring one message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Decided label.
    pub label: Label,
    /// Posterior probability of the spam class, in `[0, 1]`.
    pub spam_probability: f64,
}

impl PredictionResult {
    pub fn is_spam(&self) -> bool {
        self.label == Label::Spam
    }

    /// Spam probability as a percentage rounded to two decimals.
    pub fn confidence_percent(&self) -> f64 {
        (self.spam_probability * 10_000.0).round() / 100.0
    }
}
