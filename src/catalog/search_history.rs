use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

const MAX_ENTRIES: usize = 5;

/// Recent free-text searches per user, most recent first, without
/// duplicates. Kept in memory only.
#[derive(Default)]
pub struct SearchHistory {
    entries: Mutex<HashMap<usize, VecDeque<String>>>,
}

impl SearchHistory {
    pub fn record(&self, user_id: usize, query: &str) {
        let mut entries = self.entries.lock().unwrap();
        let queries = entries.entry(user_id).or_default();
        queries.retain(|q| q != query);
        queries.push_front(query.to_string());
        queries.truncate(MAX_ENTRIES);
    }

    pub fn recent(&self, user_id: usize) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|queries| queries.iter().cloned().collect())
            .unwrap_or_default()
    }
}
