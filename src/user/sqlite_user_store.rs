use crate::sqlite_column;
use crate::sqlite_persistence::{
    open_versioned_db, ForeignKey, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use crate::user::*;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::{
    path::Path,
    str::FromStr,
    sync::{Arc, Mutex},
    time::{Duration, SystemTime},
};
use tracing::debug;

/// V 0
const USER_TABLE_V_0: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!("username", &SqlType::Text, non_null = true),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_user_email", "email")],
};
const USER_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: "user",
    foreign_column: "id",
};
const USER_PASSWORD_CREDENTIALS_V_0: Table = Table {
    name: "user_password_credentials",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            is_unique = true,
            foreign_key = Some(&USER_FOREIGN_KEY)
        ),
        sqlite_column!("salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    indices: &[],
};
const AUTH_TOKEN_TABLE_V_0: Table = Table {
    name: "auth_token",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FOREIGN_KEY)
        ),
        sqlite_column!("value", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    indices: &[("idx_auth_token_value", "value")],
};

const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        USER_TABLE_V_0,
        USER_PASSWORD_CREDENTIALS_V_0,
        AUTH_TOKEN_TABLE_V_0,
    ],
    migration: None,
}];

#[derive(Clone)]
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path, VERSIONED_SCHEMAS)?;
        Ok(SqliteUserStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn system_time_from_column_result(value: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(value as u64)
}

fn system_time_to_column(value: SystemTime) -> i64 {
    value
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn now_column() -> i64 {
    system_time_to_column(SystemTime::now())
}

impl UserStore for SqliteUserStore {
    fn create_user(&self, username: &str, email: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user (username, email) VALUES (?1, ?2)",
            params![username, email],
        )
        .with_context(|| format!("Failed to create user with email {}", email))?;
        let user_id = conn.last_insert_rowid() as usize;
        debug!("Created user {} ({})", user_id, email);
        Ok(user_id)
    }

    fn get_user(&self, user_id: usize) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let user = conn
            .query_row(
                "SELECT id, username, email, created FROM user WHERE id = ?1",
                params![user_id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                        created: system_time_from_column_result(row.get(3)?),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn get_user_id_by_email(&self, email: &str) -> Result<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        let user_id = conn
            .query_row(
                "SELECT id FROM user WHERE email = ?1",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        Ok(user_id)
    }
}

impl UserAuthTokenStore for SqliteUserStore {
    fn get_user_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let conn = self.conn.lock().unwrap();
        let token = conn
            .query_row(
                "SELECT user_id, value, created, last_used FROM auth_token WHERE value = ?1",
                params![value.0],
                |row| {
                    Ok(AuthToken {
                        user_id: row.get(0)?,
                        value: AuthTokenValue(row.get(1)?),
                        created: system_time_from_column_result(row.get(2)?),
                        last_used: row
                            .get::<usize, Option<i64>>(3)?
                            .map(system_time_from_column_result),
                    })
                },
            )
            .optional()?;
        Ok(token)
    }

    fn delete_user_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let token = match self.get_user_auth_token(value)? {
            Some(token) => token,
            None => return Ok(None),
        };
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM auth_token WHERE value = ?1",
            params![token.value.0],
        )?;
        Ok(Some(token))
    }

    fn update_user_auth_token_last_used_timestamp(&self, value: &AuthTokenValue) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE auth_token SET last_used = ?1 WHERE value = ?2",
            params![now_column(), value.0],
        )?;
        Ok(())
    }

    fn add_user_auth_token(&self, token: &AuthToken) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO auth_token (user_id, value, created) VALUES (?1, ?2, ?3)",
            params![
                token.user_id,
                token.value.0,
                system_time_to_column(token.created)
            ],
        )?;
        Ok(())
    }
}

impl UserAuthCredentialsStore for SqliteUserStore {
    fn get_password_credentials(
        &self,
        user_id: usize,
    ) -> Result<Option<UsernamePasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT user_id, salt, hash, hasher, created, last_used \
                 FROM user_password_credentials WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<usize, usize>(0)?,
                        row.get::<usize, String>(1)?,
                        row.get::<usize, String>(2)?,
                        row.get::<usize, String>(3)?,
                        row.get::<usize, i64>(4)?,
                        row.get::<usize, Option<i64>>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((user_id, salt, hash, hasher, created, last_used)) = row else {
            return Ok(None);
        };
        Ok(Some(UsernamePasswordCredentials {
            user_id,
            salt,
            hash,
            hasher: MoodifyHasher::from_str(&hasher)?,
            created: system_time_from_column_result(created),
            last_used: last_used.map(system_time_from_column_result),
        }))
    }

    fn set_password_credentials(&self, credentials: &UsernamePasswordCredentials) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user_password_credentials (user_id, salt, hash, hasher, created) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(user_id) DO UPDATE SET \
             salt = excluded.salt, hash = excluded.hash, hasher = excluded.hasher, \
             created = excluded.created, last_used = NULL",
            params![
                credentials.user_id,
                credentials.salt,
                credentials.hash,
                credentials.hasher.to_string(),
                system_time_to_column(credentials.created),
            ],
        )?;
        Ok(())
    }

    fn update_password_last_used_timestamp(&self, user_id: usize) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE user_password_credentials SET last_used = ?1 WHERE user_id = ?2",
            params![now_column(), user_id],
        )?;
        Ok(())
    }
}
