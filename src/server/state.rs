use axum::extract::FromRef;

use crate::assistant::MoodAssistant;
use crate::catalog::{CatalogSearch, SearchHistory};
use crate::mood::MoodService;
use crate::user::UserManager;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::ServerConfig;

pub type GuardedUserManager = Arc<Mutex<UserManager>>;
pub type GuardedMoodService = Arc<MoodService>;
pub type GuardedAssistant = Arc<MoodAssistant>;
pub type GuardedCatalog = Arc<dyn CatalogSearch>;
pub type GuardedSearchHistory = Arc<SearchHistory>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub user_manager: GuardedUserManager,
    pub mood_service: GuardedMoodService,
    pub assistant: GuardedAssistant,
    pub catalog: GuardedCatalog,
    pub search_history: GuardedSearchHistory,
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedMoodService {
    fn from_ref(input: &ServerState) -> Self {
        input.mood_service.clone()
    }
}

impl FromRef<ServerState> for GuardedAssistant {
    fn from_ref(input: &ServerState) -> Self {
        input.assistant.clone()
    }
}

impl FromRef<ServerState> for GuardedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for GuardedSearchHistory {
    fn from_ref(input: &ServerState) -> Self {
        input.search_history.clone()
    }
}
