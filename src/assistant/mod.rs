//! Free-form helper built on the LLM: answers questions and proposes
//! activities from a user's mood insight. Failures never surface as errors,
//! they turn into canned replies.

use crate::llm::{CompletionOptions, LlmProvider};
use crate::mood::InsightSnapshot;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub const GREETING: &str = "How can I help you based on your mood insights?";
pub const NO_ANSWER: &str = "Sorry, I have no answer for that.";
pub const ASK_FAILED: &str = "Something went wrong. Please try again.";
pub const NO_SOLUTION: &str = "Sorry, I could not fetch the solution. Please try again.";
pub const SOLUTION_FAILED: &str = "Could not fetch solution. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub text: String,
    /// False when `text` is one of the canned fallback replies.
    pub answered: bool,
}

impl AssistantReply {
    fn answered(text: String) -> Self {
        Self {
            text,
            answered: true,
        }
    }

    fn canned(text: &str) -> Self {
        Self {
            text: text.to_string(),
            answered: false,
        }
    }
}

pub fn question_prompt(question: &str) -> String {
    format!(
        "Answer the following question in **short, point-wise, and very simple words** so that a beginner can easily understand:\n\n{}",
        question
    )
}

pub fn solution_prompt(snapshot: &InsightSnapshot) -> String {
    let summary = snapshot
        .distribution
        .iter()
        .map(|share| format!("{}: {}", share.mood, share.count))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Based on this user's mood insight: {}, suggest some activities, solutions, or resources to help them.",
        summary
    )
}

pub struct MoodAssistant {
    provider: Arc<dyn LlmProvider>,
    options: CompletionOptions,
}

impl MoodAssistant {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            options: CompletionOptions {
                temperature: 0.7,
                timeout,
                ..Default::default()
            },
        }
    }

    pub async fn ask(&self, question: &str) -> AssistantReply {
        match self.provider.complete(&question_prompt(question), &self.options).await {
            Ok(text) if !text.trim().is_empty() => AssistantReply::answered(text),
            Ok(_) => AssistantReply::canned(NO_ANSWER),
            Err(err) => {
                warn!("Assistant question failed: {}", err);
                AssistantReply::canned(ASK_FAILED)
            }
        }
    }

    /// `None` when there is no history to base a solution on.
    pub async fn suggest_solution(&self, snapshot: &InsightSnapshot) -> Option<AssistantReply> {
        if snapshot.is_empty() {
            return None;
        }
        let reply = match self.provider.complete(&solution_prompt(snapshot), &self.options).await {
            Ok(text) if !text.trim().is_empty() => AssistantReply::answered(text),
            Ok(_) => AssistantReply::canned(NO_SOLUTION),
            Err(err) => {
                warn!("Assistant solution failed: {}", err);
                AssistantReply::canned(SOLUTION_FAILED)
            }
        };
        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, NoOpLlmProvider};
    use crate::mood::{Mood, MoodClassification, MoodRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed text and remembers the last prompt.
    #[derive(Default)]
    struct RecordingProvider {
        reply: String,
        last_prompt: Mutex<Option<String>>,
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        fn model(&self) -> &str {
            "recording"
        }

        async fn complete(
            &self,
            prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn snapshot(moods: &[Mood]) -> InsightSnapshot {
        let history: Vec<MoodRecord> = moods
            .iter()
            .map(|mood| {
                MoodRecord::now(MoodClassification {
                    mood: mood.clone(),
                    ..Default::default()
                })
            })
            .collect();
        InsightSnapshot::compute(&history)
    }

    #[tokio::test]
    async fn ask_wraps_question_in_beginner_prompt() {
        let provider = Arc::new(RecordingProvider {
            reply: "- Breathe\n- Walk".to_string(),
            ..Default::default()
        });
        let assistant = MoodAssistant::new(provider.clone(), Duration::from_secs(1));

        let reply = assistant.ask("How do I relax?").await;
        assert_eq!(reply, AssistantReply::answered("- Breathe\n- Walk".to_string()));
        let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.starts_with("Answer the following question in **short"));
        assert!(prompt.ends_with("\n\nHow do I relax?"));
    }

    #[tokio::test]
    async fn empty_answer_gets_canned_reply() {
        let assistant = MoodAssistant::new(
            Arc::new(RecordingProvider::default()),
            Duration::from_secs(1),
        );
        assert_eq!(assistant.ask("?").await.text, NO_ANSWER);
    }

    #[tokio::test]
    async fn provider_failure_gets_canned_reply() {
        let assistant = MoodAssistant::new(Arc::new(NoOpLlmProvider), Duration::from_secs(1));
        assert_eq!(assistant.ask("hi").await, AssistantReply::canned(ASK_FAILED));

        let reply = assistant
            .suggest_solution(&snapshot(&[Mood::Sad]))
            .await
            .unwrap();
        assert_eq!(reply.text, SOLUTION_FAILED);
    }

    #[tokio::test]
    async fn solution_prompt_lists_counts() {
        let provider = Arc::new(RecordingProvider {
            reply: "Try a walk.".to_string(),
            ..Default::default()
        });
        let assistant = MoodAssistant::new(provider.clone(), Duration::from_secs(1));

        let reply = assistant
            .suggest_solution(&snapshot(&[Mood::Sad, Mood::Happy, Mood::Sad]))
            .await
            .unwrap();
        assert!(reply.answered);
        assert_eq!(
            provider.last_prompt.lock().unwrap().as_deref(),
            Some("Based on this user's mood insight: sad: 2, happy: 1, suggest some activities, solutions, or resources to help them.")
        );
    }

    #[tokio::test]
    async fn no_history_no_solution() {
        let assistant = MoodAssistant::new(Arc::new(NoOpLlmProvider), Duration::from_secs(1));
        assert!(assistant.suggest_solution(&snapshot(&[])).await.is_none());
    }
}
