use super::classifier::{ClassificationOutcome, MoodClassifier};
use super::insight::InsightSnapshot;
use super::models::{MoodClassification, MoodRecord};
use super::suggestions::suggestions;
use crate::catalog::{CatalogError, CatalogSearch, Track};
use crate::mood_history::{MoodHistoryStore, StorageError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub const RECOMMENDATION_LIMIT: usize = 5;

pub fn recommendation_query(classification: &MoodClassification) -> String {
    format!(
        "{} mood {} songs",
        classification.mood, classification.language
    )
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Nothing to classify")]
    EmptyText,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Serialize)]
pub struct Submission {
    pub record: MoodRecord,
    /// False when the record could not be persisted. The recommendations are
    /// still returned.
    pub history_saved: bool,
    pub tracks: Vec<Track>,
    #[serde(skip)]
    pub outcome: ClassificationOutcome,
}

#[derive(Debug, Serialize)]
pub struct MoodInsights {
    #[serde(flatten)]
    pub snapshot: InsightSnapshot,
    pub summary: String,
    pub suggestions: Vec<String>,
}

impl From<InsightSnapshot> for MoodInsights {
    fn from(snapshot: InsightSnapshot) -> Self {
        Self {
            summary: snapshot.summary(),
            suggestions: suggestions(snapshot.dominant_mood.as_ref()),
            snapshot,
        }
    }
}

/// Ties classification, history and recommendations together. Every call
/// names the user it acts for.
pub struct MoodService {
    classifier: MoodClassifier,
    history: Arc<dyn MoodHistoryStore>,
    catalog: Arc<dyn CatalogSearch>,
}

impl MoodService {
    pub fn new(
        classifier: MoodClassifier,
        history: Arc<dyn MoodHistoryStore>,
        catalog: Arc<dyn CatalogSearch>,
    ) -> Self {
        Self {
            classifier,
            history,
            catalog,
        }
    }

    /// Classify, then save, then search, strictly in that order. Only the
    /// catalog search can fail the submission.
    pub async fn submit_feelings(
        &self,
        user_id: usize,
        text: &str,
    ) -> Result<Submission, SubmitError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptyText);
        }

        let (classification, outcome) = self.classifier.classify(text).await;
        let record = MoodRecord::now(classification.clone());

        let history_saved = match self.history.append(user_id, record.clone()) {
            Ok(()) => true,
            Err(err) => {
                error!(user_id, "Failed to save mood record: {}", err);
                false
            }
        };

        let query = recommendation_query(&classification);
        let tracks = self
            .catalog
            .search_tracks(&query, RECOMMENDATION_LIMIT, 0)
            .await?;

        info!(
            user_id,
            mood = %classification.mood,
            outcome = outcome.as_str(),
            tracks = tracks.len(),
            "Mood submitted"
        );

        Ok(Submission {
            record,
            history_saved,
            tracks,
            outcome,
        })
    }

    pub fn history(&self, user_id: usize) -> Result<Vec<MoodRecord>, StorageError> {
        self.history.load(user_id)
    }

    pub fn delete_entry(&self, user_id: usize, index: usize) -> Result<bool, StorageError> {
        self.history.delete_at(user_id, index)
    }

    pub fn clear_history(&self, user_id: usize) -> Result<(), StorageError> {
        self.history.clear(user_id)
    }

    pub fn snapshot(&self, user_id: usize) -> Result<InsightSnapshot, StorageError> {
        Ok(InsightSnapshot::compute(&self.history.load(user_id)?))
    }

    pub fn insights(&self, user_id: usize) -> Result<MoodInsights, StorageError> {
        Ok(self.snapshot(user_id)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NoOpCatalog;
    use crate::llm::{CompletionOptions, LlmError, LlmProvider};
    use crate::mood::{Language, Mood, Preference};
    use crate::mood_history::SqliteMoodHistoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    struct CannedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            _prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct RecordingCatalog {
        queries: Mutex<Vec<(String, usize)>>,
        fail: bool,
    }

    #[async_trait]
    impl CatalogSearch for RecordingCatalog {
        async fn search_tracks(
            &self,
            query: &str,
            limit: usize,
            _offset: usize,
        ) -> Result<Vec<Track>, CatalogError> {
            self.queries.lock().unwrap().push((query.to_string(), limit));
            if self.fail {
                return Err(CatalogError::RateLimited);
            }
            Ok(vec![Track {
                id: "1".to_string(),
                name: query.to_string(),
                artists: vec!["Someone".to_string()],
                album_art: None,
                preview_url: None,
                external_url: None,
            }])
        }
    }

    /// Always fails, like a store whose backend is unreachable.
    struct BrokenStore;

    impl MoodHistoryStore for BrokenStore {
        fn load(&self, _user_id: usize) -> Result<Vec<MoodRecord>, StorageError> {
            Err(StorageError::Database(rusqlite::Error::InvalidQuery))
        }

        fn append(&self, _user_id: usize, _record: MoodRecord) -> Result<(), StorageError> {
            Err(StorageError::Database(rusqlite::Error::InvalidQuery))
        }

        fn delete_at(&self, _user_id: usize, _index: usize) -> Result<bool, StorageError> {
            Err(StorageError::Database(rusqlite::Error::InvalidQuery))
        }

        fn clear(&self, _user_id: usize) -> Result<(), StorageError> {
            Err(StorageError::Database(rusqlite::Error::InvalidQuery))
        }
    }

    fn service_with(
        reply: &'static str,
        store: Arc<dyn MoodHistoryStore>,
        catalog: Arc<dyn CatalogSearch>,
    ) -> MoodService {
        MoodService::new(
            MoodClassifier::new(Arc::new(CannedProvider(reply)), Duration::from_secs(1)),
            store,
            catalog,
        )
    }

    fn tmp_store() -> (Arc<SqliteMoodHistoryStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteMoodHistoryStore::new(dir.path().join("mood.db")).unwrap();
        (Arc::new(store), dir)
    }

    #[test]
    fn query_names_mood_and_language() {
        let classification = MoodClassification {
            mood: Mood::Sad,
            preference: Preference::Stay,
            language: Language::English,
        };
        assert_eq!(recommendation_query(&classification), "sad mood english songs");
    }

    #[tokio::test]
    async fn submission_saves_and_recommends() {
        let (store, _dir) = tmp_store();
        let catalog = Arc::new(RecordingCatalog::default());
        let service = service_with(
            r#"{"mood": "happy", "preference": "stay", "language": "english"}"#,
            store.clone(),
            catalog.clone(),
        );

        let submission = service.submit_feelings(1, "  Great day!  ").await.unwrap();
        assert_eq!(submission.record.mood, Mood::Happy);
        assert!(submission.history_saved);
        assert_eq!(submission.outcome, ClassificationOutcome::Parsed);
        assert_eq!(submission.tracks.len(), 1);
        assert_eq!(
            *catalog.queries.lock().unwrap(),
            vec![("happy mood english songs".to_string(), RECOMMENDATION_LIMIT)]
        );
        assert_eq!(store.load(1).unwrap(), vec![submission.record]);
    }

    #[tokio::test]
    async fn garbage_reply_still_saves_and_recommends() {
        let (store, _dir) = tmp_store();
        let catalog = Arc::new(RecordingCatalog::default());
        let service = service_with("I don't know", store.clone(), catalog.clone());

        let submission = service.submit_feelings(1, "hmm").await.unwrap();
        assert_eq!(submission.record.classification(), MoodClassification::default());
        assert_eq!(submission.outcome, ClassificationOutcome::Fallback);
        assert_eq!(store.load(1).unwrap().len(), 1);
        assert_eq!(catalog.queries.lock().unwrap()[0].0, "calm mood hindi songs");
    }

    #[tokio::test]
    async fn storage_failure_does_not_block_recommendations() {
        let catalog = Arc::new(RecordingCatalog::default());
        let service = service_with("{}", Arc::new(BrokenStore), catalog.clone());

        let submission = service.submit_feelings(1, "ok").await.unwrap();
        assert!(!submission.history_saved);
        assert_eq!(submission.tracks.len(), 1);
    }

    #[tokio::test]
    async fn catalog_failure_fails_submission_after_saving() {
        let (store, _dir) = tmp_store();
        let catalog = Arc::new(RecordingCatalog {
            fail: true,
            ..Default::default()
        });
        let service = service_with("{}", store.clone(), catalog);

        let result = service.submit_feelings(1, "ok").await;
        assert!(matches!(result, Err(SubmitError::Catalog(CatalogError::RateLimited))));
        assert_eq!(store.load(1).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let (store, _dir) = tmp_store();
        let service = service_with("{}", store.clone(), Arc::new(NoOpCatalog));
        assert!(matches!(
            service.submit_feelings(1, "   ").await,
            Err(SubmitError::EmptyText)
        ));
        assert!(store.load(1).unwrap().is_empty());
    }

    #[tokio::test]
    async fn insights_follow_history() {
        let (store, _dir) = tmp_store();
        let service = service_with(
            r#"{"mood": "sad", "preference": "uplift", "language": "hindi"}"#,
            store,
            Arc::new(NoOpCatalog),
        );

        let empty = service.insights(1).unwrap();
        assert_eq!(empty.summary, "No mood analysis available.");
        assert!(empty.suggestions.is_empty());

        service.submit_feelings(1, "down").await.unwrap();
        let insights = service.insights(1).unwrap();
        assert_eq!(insights.snapshot.dominant_mood, Some(Mood::Sad));
        assert_eq!(
            insights.suggestions,
            vec![
                "Consider listening to relaxing or uplifting music.",
                "Try journaling or talking to someone you trust.",
            ]
        );

        assert!(service.delete_entry(1, 0).unwrap());
        assert!(service.history(1).unwrap().is_empty());
    }

    #[test]
    fn unknown_dominant_mood_gets_balance_suggestions() {
        let (store, _dir) = tmp_store();
        let bored = MoodClassification {
            mood: Mood::Other("bored".to_string()),
            ..Default::default()
        };
        store.append(1, MoodRecord::now(bored.clone())).unwrap();
        store.append(1, MoodRecord::now(bored)).unwrap();
        let service = service_with("{}", store, Arc::new(NoOpCatalog));

        let insights = service.insights(1).unwrap();
        assert_eq!(insights.snapshot.count_of(&Mood::Calm), 0);
        assert_eq!(
            insights.summary,
            "Your mood distribution is: 100.0% bored. You seem to experience 1 different moods regularly."
        );
        assert_eq!(
            insights.suggestions,
            vec![
                "Explore different genres to balance your mood.",
                "Try focusing on mindfulness or mood-boosting activities.",
            ]
        );
    }
}
