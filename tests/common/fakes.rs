//! Stand-ins for the text generation service and the music catalog

use super::constants::*;
use async_trait::async_trait;
use moodify_server::catalog::{CatalogError, CatalogSearch, Track};
use moodify_server::llm::{CompletionOptions, LlmError, LlmProvider};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Answers chatbot and solution prompts with fixed texts and everything else
/// with the configured classification reply.
pub struct FakeLlm {
    classification_reply: Mutex<String>,
    unavailable: AtomicBool,
}

impl FakeLlm {
    pub fn new(classification_reply: &str) -> Self {
        Self {
            classification_reply: Mutex::new(classification_reply.to_string()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_classification_reply(&self, reply: &str) {
        *self.classification_reply.lock().unwrap() = reply.to_string();
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(
        &self,
        prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LlmError::Connection("fake model is down".to_string()));
        }
        if prompt.starts_with("Answer the following question") {
            return Ok(CHAT_ANSWER.to_string());
        }
        if prompt.starts_with("Based on this user's mood insight") {
            return Ok(SOLUTION_ANSWER.to_string());
        }
        Ok(self.classification_reply.lock().unwrap().clone())
    }
}

/// Holds [`FAKE_CATALOG_SIZE`] tracks for every query and records what was
/// asked.
#[derive(Default)]
pub struct FakeCatalog {
    pub requests: Mutex<Vec<(String, usize, usize)>>,
    failing: AtomicBool,
}

impl FakeCatalog {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<(String, usize, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSearch for FakeCatalog {
    async fn search_tracks(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        self.requests
            .lock()
            .unwrap()
            .push((query.to_string(), limit, offset));
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Upstream("fake catalog is down".to_string()));
        }

        let end = (offset + limit).min(FAKE_CATALOG_SIZE);
        Ok((offset..end)
            .map(|i| Track {
                id: format!("track-{}", i),
                name: format!("{} #{}", query, i),
                artists: vec!["Fake Artist".to_string()],
                album_art: None,
                preview_url: None,
                external_url: Some(format!("https://example.com/track/{}", i)),
            })
            .collect())
    }
}
