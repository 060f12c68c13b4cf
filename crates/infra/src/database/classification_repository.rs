//! SQLite implementation of the classification store.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use paceline_core::goals::ports::ClassificationStore;
use paceline_domain::{PacelineError, ProductivityLevel, Result};
use rusqlite::params;

use super::manager::DbManager;
use super::join_error;
use crate::errors::InfraError;

/// SQLite implementation of [`ClassificationStore`].
///
/// App-level productivity overrides take precedence over the category
/// default; apps with neither are neutral.
pub struct SqliteClassificationStore {
    db: Arc<DbManager>,
}

impl SqliteClassificationStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn optional<T>(result: rusqlite::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(other) => Err(InfraError::from(other).into()),
    }
}

#[async_trait]
impl ClassificationStore for SqliteClassificationStore {
    async fn productivity_level_of(&self, app_id: &str) -> Result<ProductivityLevel> {
        let db = self.db.clone();
        let app_id = app_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let level: Option<Option<String>> = optional(conn.query_row(
                "SELECT COALESCE(a.productivity_override, c.productivity_level) FROM apps a \
                 LEFT JOIN categories c ON a.category_id = c.id \
                 WHERE a.id = ?1",
                params![app_id],
                |row| row.get::<_, Option<String>>(0),
            ))?;

            match level.flatten() {
                Some(raw) => ProductivityLevel::from_str(&raw).map_err(|_| {
                    PacelineError::Database(format!(
                        "unknown productivity level '{raw}' for app {app_id}"
                    ))
                }),
                None => Ok(ProductivityLevel::default()),
            }
        })
        .await
        .map_err(join_error)?
    }

    async fn category_of(&self, app_id: &str) -> Result<Option<String>> {
        let db = self.db.clone();
        let app_id = app_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                "SELECT c.name FROM apps a \
                 JOIN categories c ON a.category_id = c.id \
                 WHERE a.id = ?1",
                params![app_id],
                |row| row.get::<_, String>(0),
            ))
        })
        .await
        .map_err(join_error)?
    }

    async fn resolve_app_id(&self, reference: &str) -> Result<Option<String>> {
        let db = self.db.clone();
        let reference = reference.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            if let Some(id) = optional(conn.query_row(
                "SELECT id FROM apps WHERE id = ?1",
                params![reference],
                |row| row.get::<_, String>(0),
            ))? {
                return Ok(Some(id));
            }

            // Compatibility path for goals saved against display names.
            optional(conn.query_row(
                "SELECT id FROM apps WHERE display_name = ?1 LIMIT 1",
                params![reference],
                |row| row.get::<_, String>(0),
            ))
        })
        .await
        .map_err(join_error)?
    }
}
