//! Mood record data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// `Other` holds a stored label this server does not know, exactly as it was
/// written, so that rewriting a history never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Calm,
    Anxious,
    Energetic,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Stay,
    Uplift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Hindi,
    English,
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Calm
    }
}

impl Default for Preference {
    fn default() -> Self {
        Preference::Uplift
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Hindi
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label '{}'", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

/// Generates case-insensitive parsing and lowercase display for a label enum.
macro_rules! label_enum {
    ($ty:ty, $($variant:path => $label:literal),+ $(,)?) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($variant => $label,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($label => Ok($variant),)+
                    _ => Err(UnknownLabel(s.to_string())),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

const KNOWN_MOODS: &[Mood] = &[
    Mood::Happy,
    Mood::Sad,
    Mood::Angry,
    Mood::Calm,
    Mood::Anxious,
    Mood::Energetic,
];

impl Mood {
    pub fn as_str(&self) -> &str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Calm => "calm",
            Mood::Anxious => "anxious",
            Mood::Energetic => "energetic",
            Mood::Other(label) => label,
        }
    }

    /// Known labels match case-insensitively, anything else is kept verbatim.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| Mood::Other(label.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Mood::Other(_))
    }
}

/// Only the known labels parse. Classification must not invent moods.
impl FromStr for Mood {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        KNOWN_MOODS
            .iter()
            .find(|mood| mood.as_str() == wanted)
            .cloned()
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Mood {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Mood::from_label(&String::deserialize(deserializer)?))
    }
}

label_enum!(
    Preference,
    Preference::Stay => "stay",
    Preference::Uplift => "uplift",
);

label_enum!(
    Language,
    Language::Hindi => "hindi",
    Language::English => "english",
);

/// The three labels produced by classifying a user's text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MoodClassification {
    pub mood: Mood,
    pub preference: Preference,
    pub language: Language,
}

/// A single mood observation. The timestamp is set when the record is created
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodRecord {
    #[serde(default, deserialize_with = "lenient_mood")]
    pub mood: Mood,
    #[serde(default, deserialize_with = "lenient_label")]
    pub preference: Preference,
    #[serde(default, deserialize_with = "lenient_label")]
    pub language: Language,
    pub timestamp: DateTime<Utc>,
}

impl MoodRecord {
    pub fn new(classification: MoodClassification, timestamp: DateTime<Utc>) -> Self {
        Self {
            mood: classification.mood,
            preference: classification.preference,
            language: classification.language,
            timestamp,
        }
    }

    pub fn now(classification: MoodClassification) -> Self {
        Self::new(classification, Utc::now())
    }

    pub fn classification(&self) -> MoodClassification {
        MoodClassification {
            mood: self.mood.clone(),
            preference: self.preference,
            language: self.language,
        }
    }
}

/// A missing or non-text mood falls back to the default. Unknown text labels
/// are kept as [`Mood::Other`].
fn lenient_mood<'de, D>(deserializer: D) -> Result<Mood, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .map(Mood::from_label)
        .unwrap_or_default())
}

/// Stored records written by older clients may carry preferences or languages
/// we don't know, or none at all. Those fall back to the default label instead
/// of failing the whole history load.
fn lenient_label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}
