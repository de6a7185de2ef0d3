use super::store::{MoodHistoryStore, StorageError};
use crate::mood::MoodRecord;
use crate::sqlite_column;
use crate::sqlite_persistence::{open_versioned_db, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// One row per user, the whole history stored as a JSON array.
const MOOD_HISTORY_TABLE_V_0: Table = Table {
    name: "mood_history",
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("history", &SqlType::Text, non_null = true),
        sqlite_column!(
            "updated",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
};

const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[MOOD_HISTORY_TABLE_V_0],
    migration: None,
}];

#[derive(Clone)]
pub struct SqliteMoodHistoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMoodHistoryStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path, VERSIONED_SCHEMAS)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn read(conn: &Connection, user_id: usize) -> Result<Option<Vec<MoodRecord>>, StorageError> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT history FROM mood_history WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write(conn: &Connection, user_id: usize, history: &[MoodRecord]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(history)?;
        conn.execute(
            &format!(
                "INSERT INTO mood_history (user_id, history, updated) VALUES (?1, ?2, {ts}) \
                 ON CONFLICT(user_id) DO UPDATE SET history = excluded.history, updated = {ts}",
                ts = DEFAULT_TIMESTAMP
            ),
            params![user_id, raw],
        )?;
        debug!(user_id, records = history.len(), "Wrote mood history");
        Ok(())
    }
}

impl MoodHistoryStore for SqliteMoodHistoryStore {
    fn load(&self, user_id: usize) -> Result<Vec<MoodRecord>, StorageError> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::read(&conn, user_id)?.unwrap_or_default())
    }

    fn append(&self, user_id: usize, record: MoodRecord) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();
        let history = match Self::read(&conn, user_id)? {
            Some(mut history) => {
                history.push(record);
                history
            }
            None => vec![record],
        };
        Self::write(&conn, user_id, &history)
    }

    fn delete_at(&self, user_id: usize, index: usize) -> Result<bool, StorageError> {
        let conn = self.conn.lock().unwrap();
        let mut history = Self::read(&conn, user_id)?.unwrap_or_default();
        if index >= history.len() {
            return Ok(false);
        }
        history.remove(index);
        Self::write(&conn, user_id, &history)?;
        Ok(true)
    }

    fn clear(&self, user_id: usize) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();
        Self::write(&conn, user_id, &[])
    }
}
