//! SQLite implementation of the progress store.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use paceline_core::goals::ports::ProgressStore;
use paceline_domain::{GoalProgress, GoalStatus, PacelineError, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};

use super::manager::DbManager;
use super::join_error;
use crate::errors::InfraError;

/// SQLite implementation of [`ProgressStore`].
///
/// Records are keyed by `(goal_id, period_end)` with period ends stored as
/// ISO dates, so lexicographic ordering matches chronological ordering.
pub struct SqliteProgressStore {
    db: Arc<DbManager>,
}

impl SqliteProgressStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn parse_period_end(raw: &str) -> Result<NaiveDate> {
    raw.parse::<NaiveDate>()
        .map_err(|e| PacelineError::Database(format!("malformed period_end '{raw}': {e}")))
}

fn parse_status(raw: &str) -> Result<GoalStatus> {
    GoalStatus::from_str(raw)
}

#[async_trait]
impl ProgressStore for SqliteProgressStore {
    async fn upsert_progress(&self, record: &GoalProgress, force: bool) -> Result<bool> {
        let db = self.db.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let sql = if force {
                "INSERT INTO goal_progress \
                 (goal_id, period_end, current_value, target_value, status, achieved_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
                 ON CONFLICT (goal_id, period_end) DO UPDATE SET \
                 current_value = excluded.current_value, \
                 target_value = excluded.target_value, \
                 status = excluded.status, \
                 achieved_at = excluded.achieved_at"
            } else {
                "INSERT INTO goal_progress \
                 (goal_id, period_end, current_value, target_value, status, achieved_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
                 ON CONFLICT (goal_id, period_end) DO NOTHING"
            };

            let changed = conn
                .execute(
                    sql,
                    params![
                        record.goal_id,
                        record.period_end.to_string(),
                        record.current_value,
                        record.target_value,
                        record.status.as_str(),
                        record.achieved_at.map(|t| t.timestamp()),
                    ],
                )
                .map_err(InfraError::from)?;

            Ok(changed > 0)
        })
        .await
        .map_err(join_error)?
    }

    async fn find_progress(
        &self,
        goal_id: i64,
        period_end: NaiveDate,
    ) -> Result<Option<GoalProgress>> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let row = conn
                .query_row(
                    "SELECT current_value, target_value, status, achieved_at \
                     FROM goal_progress WHERE goal_id = ?1 AND period_end = ?2",
                    params![goal_id, period_end.to_string()],
                    |row| {
                        Ok((
                            row.get::<_, f64>(0)?,
                            row.get::<_, f64>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, Option<i64>>(3)?,
                        ))
                    },
                )
                .map(Some)
                .or_else(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(PacelineError::from(InfraError::from(other))),
                })?;

            row.map(|(current_value, target_value, status, achieved_at)| {
                Ok(GoalProgress {
                    goal_id,
                    period_end,
                    current_value,
                    target_value,
                    status: parse_status(&status)?,
                    achieved_at: achieved_at.and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
                })
            })
            .transpose()
        })
        .await
        .map_err(join_error)?
    }

    async fn statuses_for_period_end(
        &self,
        goal_ids: &[i64],
        period_end: NaiveDate,
    ) -> Result<HashMap<i64, GoalStatus>> {
        if goal_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let db = self.db.clone();
        let goal_ids = goal_ids.to_vec();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let placeholders = vec!["?"; goal_ids.len()].join(", ");
            let sql = format!(
                "SELECT goal_id, status FROM goal_progress \
                 WHERE goal_id IN ({placeholders}) AND period_end = ?"
            );

            let mut values: Vec<Value> = goal_ids.iter().map(|id| Value::from(*id)).collect();
            values.push(Value::from(period_end.to_string()));

            let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
            let rows = stmt
                .query_map(params_from_iter(values), |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;

            rows.into_iter()
                .map(|(goal_id, status)| Ok((goal_id, parse_status(&status)?)))
                .collect()
        })
        .await
        .map_err(join_error)?
    }

    async fn latest_period_end(&self) -> Result<Option<NaiveDate>> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let latest: Option<String> = conn
                .query_row("SELECT MAX(period_end) FROM goal_progress", [], |row| row.get(0))
                .map_err(InfraError::from)?;

            latest.as_deref().map(parse_period_end).transpose()
        })
        .await
        .map_err(join_error)?
    }

    async fn delete_orphaned(&self) -> Result<usize> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let removed = conn
                .execute(
                    "DELETE FROM goal_progress \
                     WHERE goal_id NOT IN (SELECT id FROM goals)",
                    [],
                )
                .map_err(InfraError::from)?;
            Ok(removed)
        })
        .await
        .map_err(join_error)?
    }
}
