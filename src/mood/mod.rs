//! Mood records, classification, and the aggregation and suggestion logic
//! built on a user's mood history.

mod classifier;
mod insight;
mod models;
mod service;
mod suggestions;

pub use classifier::{
    build_prompt, parse_reply, ClassificationOutcome, ClassificationParseError, MoodClassifier,
};
pub use insight::{InsightSnapshot, MoodShare};
pub use models::{Language, Mood, MoodClassification, MoodRecord, Preference, UnknownLabel};
pub use service::{
    recommendation_query, MoodInsights, MoodService, Submission, SubmitError,
    RECOMMENDATION_LIMIT,
};
pub use suggestions::{suggestions, suggestions_for};
