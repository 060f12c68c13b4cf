//! SQLite implementation of the session store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paceline_core::goals::ports::SessionStore;
use paceline_domain::{Result, UsageSession};
use rusqlite::params;

use super::manager::DbManager;
use super::join_error;
use crate::errors::InfraError;

/// SQLite implementation of [`SessionStore`].
pub struct SqliteSessionStore {
    db: Arc<DbManager>,
}

impl SqliteSessionStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn sessions_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageSession>> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT app_id, start_time, end_time, duration_ms FROM usage_sessions \
                     WHERE start_time BETWEEN ?1 AND ?2 \
                       AND end_time IS NOT NULL AND duration_ms > 0 \
                     ORDER BY start_time",
                )
                .map_err(InfraError::from)?;

            let rows = stmt
                .query_map(params![start.timestamp_millis(), end.timestamp_millis()], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;

            let sessions = rows
                .into_iter()
                .filter_map(|(app_id, start_time, end_time, duration_ms)| {
                    let start_time = DateTime::from_timestamp_millis(start_time)?;
                    let end_time = match end_time {
                        Some(ms) => Some(DateTime::from_timestamp_millis(ms)?),
                        None => None,
                    };
                    Some(UsageSession { app_id, start_time, end_time, duration_ms })
                })
                .collect();

            Ok(sessions)
        })
        .await
        .map_err(join_error)?
    }
}
