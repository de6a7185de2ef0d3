//! Turns free text into a [`MoodClassification`] through an LLM.

use super::models::{Language, Mood, MoodClassification, Preference};
use crate::llm::{CompletionOptions, LlmProvider};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

lazy_static! {
    /// First single-level JSON object in the reply.
    static ref JSON_OBJECT: Regex = Regex::new(r"\{[^}]+\}").unwrap();
}

const PROMPT_TEMPLATE: &str = r#"You are an emotion recognition assistant for a mood-based music app.

Your task is to:
1. Detect the **primary mood** of the user from their text input.
2. Determine whether the user wants to **stay in that mood** or be **uplifted** based on how they express themselves.
3. Always prioritize suggesting songs in **Hindi** language first (unless the user explicitly mentions English).

Return a JSON object in the following format:
{
  "mood": "happy" | "sad" | "angry" | "calm" | "anxious",
  "preference": "stay" | "uplift",
  "language": "hindi" | "english"
}

Text: "{text}""#;

pub fn build_prompt(text: &str) -> String {
    PROMPT_TEMPLATE.replace("{text}", text)
}

/// Why a reply could not be turned into a classification. Never leaves this
/// module: every variant ends in the fallback record.
#[derive(Debug, Error, PartialEq)]
pub enum ClassificationParseError {
    #[error("no JSON object in reply")]
    NoObject,
    #[error("malformed JSON object: {0}")]
    Malformed(String),
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("invalid value for '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },
}

#[derive(Deserialize)]
struct RawClassification {
    mood: Option<String>,
    preference: Option<String>,
    language: Option<String>,
}

fn parse_field<T: std::str::FromStr>(
    field: &'static str,
    value: Option<String>,
) -> Result<T, ClassificationParseError> {
    let value = value.ok_or(ClassificationParseError::MissingField(field))?;
    value
        .parse()
        .map_err(|_| ClassificationParseError::InvalidValue { field, value })
}

/// Extracts the first `{...}` object from `reply` and reads the three labels.
/// Any missing or unknown label rejects the whole object.
pub fn parse_reply(reply: &str) -> Result<MoodClassification, ClassificationParseError> {
    let object = JSON_OBJECT
        .find(reply)
        .ok_or(ClassificationParseError::NoObject)?;
    let raw: RawClassification = serde_json::from_str(object.as_str())
        .map_err(|e| ClassificationParseError::Malformed(e.to_string()))?;

    Ok(MoodClassification {
        mood: parse_field::<Mood>("mood", raw.mood)?,
        preference: parse_field::<Preference>("preference", raw.preference)?,
        language: parse_field::<Language>("language", raw.language)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationOutcome {
    Parsed,
    /// The model answered but the reply was unusable.
    Fallback,
    /// The model could not be reached.
    Unavailable,
}

impl ClassificationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationOutcome::Parsed => "parsed",
            ClassificationOutcome::Fallback => "fallback",
            ClassificationOutcome::Unavailable => "unavailable",
        }
    }
}

pub struct MoodClassifier {
    provider: Arc<dyn LlmProvider>,
    options: CompletionOptions,
}

impl MoodClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            options: CompletionOptions::deterministic(timeout),
        }
    }

    /// Never fails: anything short of a well-formed reply yields the default
    /// classification.
    pub async fn classify(&self, text: &str) -> (MoodClassification, ClassificationOutcome) {
        let reply = match self.provider.complete(&build_prompt(text), &self.options).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(provider = self.provider.name(), "Classification unavailable: {}", err);
                return (
                    MoodClassification::default(),
                    ClassificationOutcome::Unavailable,
                );
            }
        };

        match parse_reply(&reply) {
            Ok(classification) => {
                debug!(?classification, "Classified mood");
                (classification, ClassificationOutcome::Parsed)
            }
            Err(err) => {
                warn!("Unusable classification reply ({}), using fallback", err);
                (MoodClassification::default(), ClassificationOutcome::Fallback)
            }
        }
    }
}
