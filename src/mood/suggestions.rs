use super::models::Mood;

const HAPPY: &[&str] = &[
    "Keep enjoying upbeat songs to maintain your positive mood.",
    "Try sharing your happiness with friends and family.",
];

const SAD: &[&str] = &[
    "Consider listening to relaxing or uplifting music.",
    "Try journaling or talking to someone you trust.",
];

const CALM: &[&str] = &[
    "Meditative or instrumental tracks can help you stay centered.",
    "Go for nature walks to enhance your peaceful mood.",
];

const ENERGETIC: &[&str] = &[
    "High-energy playlists will keep you motivated.",
    "Consider engaging in physical activities like workouts.",
];

const BALANCE: &[&str] = &[
    "Explore different genres to balance your mood.",
    "Try focusing on mindfulness or mood-boosting activities.",
];

/// Static guidance for the dominant mood of a history.
pub fn suggestions_for(mood: &Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => HAPPY,
        Mood::Sad => SAD,
        Mood::Calm => CALM,
        Mood::Energetic => ENERGETIC,
        Mood::Angry | Mood::Anxious | Mood::Other(_) => BALANCE,
    }
}

/// No dominant mood means no history, and nothing to suggest.
pub fn suggestions(dominant: Option<&Mood>) -> Vec<String> {
    dominant
        .map(suggestions_for)
        .unwrap_or_default()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sad_gets_comforting_suggestions() {
        assert_eq!(
            suggestions_for(&Mood::Sad),
            &[
                "Consider listening to relaxing or uplifting music.",
                "Try journaling or talking to someone you trust.",
            ]
        );
    }

    #[test]
    fn labels_match_regardless_of_case() {
        assert_eq!(suggestions_for(&Mood::from_label("Happy")), HAPPY);
        assert_eq!(suggestions_for(&Mood::from_label("CALM")), CALM);
        assert_eq!(suggestions_for(&Mood::from_label("energetic")), ENERGETIC);
    }

    #[test]
    fn unknown_and_unlisted_moods_get_balance_suggestions() {
        assert_eq!(suggestions_for(&Mood::Angry), BALANCE);
        assert_eq!(suggestions_for(&Mood::Anxious), BALANCE);
        assert_eq!(suggestions_for(&Mood::from_label("bored")), BALANCE);
    }

    #[test]
    fn no_dominant_mood_means_no_suggestions() {
        assert!(suggestions(None).is_empty());
        assert_eq!(suggestions(Some(&Mood::Happy)).len(), 2);
    }
}
