use super::models::{Mood, MoodRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodShare {
    pub mood: Mood,
    pub count: usize,
    /// Share of the whole history, rounded to one decimal.
    pub percentage: f64,
}

/// Aggregated view over a mood history. Never persisted, always recomputed
/// from the full sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSnapshot {
    pub total: usize,
    /// Moods in order of first occurrence in the history.
    pub distribution: Vec<MoodShare>,
    pub dominant_mood: Option<Mood>,
    pub distinct_moods: usize,
}

impl InsightSnapshot {
    pub fn compute(history: &[MoodRecord]) -> Self {
        let mut counts: Vec<(Mood, usize)> = Vec::new();
        for record in history {
            match counts.iter_mut().find(|(mood, _)| *mood == record.mood) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.mood.clone(), 1)),
            }
        }

        let total = history.len();
        let mut dominant: Option<&(Mood, usize)> = None;
        for entry in &counts {
            // Strictly greater keeps the earliest mood on ties.
            if dominant.map_or(true, |(_, best)| entry.1 > *best) {
                dominant = Some(entry);
            }
        }
        let dominant_mood = dominant.map(|(mood, _)| mood.clone());
        let distinct_moods = counts.len();

        let distribution = counts
            .into_iter()
            .map(|(mood, count)| MoodShare {
                mood,
                count,
                percentage: percentage(count, total),
            })
            .collect();

        Self {
            total,
            distribution,
            dominant_mood,
            distinct_moods,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn count_of(&self, mood: &Mood) -> usize {
        self.distribution
            .iter()
            .find(|share| share.mood == *mood)
            .map_or(0, |share| share.count)
    }

    /// Human readable summary, e.g. "Your mood distribution is: 66.7% happy,
    /// 33.3% sad. You seem to experience 2 different moods regularly."
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No mood analysis available.".to_string();
        }
        let parts = self
            .distribution
            .iter()
            .map(|share| format!("{:.1}% {}", share.percentage, share.mood))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Your mood distribution is: {}. You seem to experience {} different moods regularly.",
            parts, self.distinct_moods
        )
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
