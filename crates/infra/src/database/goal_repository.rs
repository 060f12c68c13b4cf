//! SQLite implementation of the goal store.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paceline_core::goals::ports::GoalStore;
use paceline_domain::{
    Frequency, Goal, GoalDraft, GoalType, PacelineError, ReferenceKind, Result, TargetType,
    TargetUnit,
};
use rusqlite::params;

use super::manager::DbManager;
use super::join_error;
use crate::errors::InfraError;

const GOAL_COLUMNS: &str = "id, name, description, icon, goal_type, target_value, target_unit, \
     target_type, reference_kind, reference_id, min_session_duration, frequency, active_days, \
     is_active, created_at, updated_at, deleted_at";

/// SQLite implementation of [`GoalStore`].
pub struct SqliteGoalStore {
    db: Arc<DbManager>,
}

impl SqliteGoalStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

/// Raw row image, converted into the domain type after the query completes.
struct GoalRow {
    id: i64,
    name: String,
    description: Option<String>,
    icon: Option<String>,
    goal_type: String,
    target_value: f64,
    target_unit: String,
    target_type: String,
    reference_kind: Option<String>,
    reference_id: Option<String>,
    min_session_duration: Option<i64>,
    frequency: String,
    active_days: Option<String>,
    is_active: bool,
    created_at: i64,
    updated_at: Option<i64>,
    deleted_at: Option<i64>,
}

impl GoalRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            icon: row.get(3)?,
            goal_type: row.get(4)?,
            target_value: row.get(5)?,
            target_unit: row.get(6)?,
            target_type: row.get(7)?,
            reference_kind: row.get(8)?,
            reference_id: row.get(9)?,
            min_session_duration: row.get(10)?,
            frequency: row.get(11)?,
            active_days: row.get(12)?,
            is_active: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
            deleted_at: row.get(16)?,
        })
    }

    fn into_goal(self) -> Result<Goal> {
        let active_days = match self.active_days.as_deref() {
            Some(json) => Some(serde_json::from_str::<Vec<u8>>(json).map_err(|e| {
                PacelineError::Database(format!("malformed active_days for goal {}: {e}", self.id))
            })?),
            None => None,
        };
        let reference_kind =
            self.reference_kind.as_deref().map(ReferenceKind::from_str).transpose()?;

        Ok(Goal {
            id: self.id,
            name: self.name,
            description: self.description,
            icon: self.icon,
            goal_type: GoalType::from_str(&self.goal_type)?,
            target_value: self.target_value,
            target_unit: TargetUnit::from_str(&self.target_unit)?,
            target_type: TargetType::from_str(&self.target_type)?,
            reference_kind,
            reference_id: self.reference_id,
            min_session_duration: self.min_session_duration,
            frequency: Frequency::from_str(&self.frequency)?,
            active_days,
            is_active: self.is_active,
            created_at: timestamp(self.created_at, self.id)?,
            updated_at: self.updated_at.map(|t| timestamp(t, self.id)).transpose()?,
            deleted_at: self.deleted_at.map(|t| timestamp(t, self.id)).transpose()?,
        })
    }
}

fn timestamp(secs: i64, goal_id: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        PacelineError::Database(format!("timestamp out of range for goal {goal_id}: {secs}"))
    })
}

fn active_days_json(draft: &GoalDraft) -> Result<Option<String>> {
    draft
        .active_days
        .as_ref()
        .map(|days| {
            serde_json::to_string(days).map_err(|e| PacelineError::Internal(e.to_string()))
        })
        .transpose()
}

#[async_trait]
impl GoalStore for SqliteGoalStore {
    async fn insert_goal(&self, draft: &GoalDraft) -> Result<Goal> {
        let db = self.db.clone();
        let draft = draft.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let active_days = active_days_json(&draft)?;

            conn.execute(
                "INSERT INTO goals (name, description, icon, goal_type, target_value, \
                 target_unit, target_type, reference_kind, reference_id, min_session_duration, \
                 frequency, active_days, is_active, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 1, ?13)",
                params![
                    draft.name,
                    draft.description,
                    draft.icon,
                    draft.goal_type.as_str(),
                    draft.target_value,
                    draft.target_unit.as_str(),
                    draft.target_type.as_str(),
                    draft.reference_kind.map(|k| k.as_str()),
                    draft.reference_id,
                    draft.min_session_duration,
                    draft.frequency.as_str(),
                    active_days,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(InfraError::from)?;

            let id = conn.last_insert_rowid();
            let row = conn
                .query_row(
                    &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"),
                    params![id],
                    GoalRow::from_row,
                )
                .map_err(InfraError::from)?;
            row.into_goal()
        })
        .await
        .map_err(join_error)?
    }

    async fn update_goal(&self, id: i64, draft: &GoalDraft) -> Result<()> {
        let db = self.db.clone();
        let draft = draft.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let active_days = active_days_json(&draft)?;

            let changed = conn
                .execute(
                    "UPDATE goals SET name = ?2, description = ?3, icon = ?4, goal_type = ?5, \
                     target_value = ?6, target_unit = ?7, target_type = ?8, reference_kind = ?9, \
                     reference_id = ?10, min_session_duration = ?11, frequency = ?12, \
                     active_days = ?13, updated_at = ?14 \
                     WHERE id = ?1 AND deleted_at IS NULL",
                    params![
                        id,
                        draft.name,
                        draft.description,
                        draft.icon,
                        draft.goal_type.as_str(),
                        draft.target_value,
                        draft.target_unit.as_str(),
                        draft.target_type.as_str(),
                        draft.reference_kind.map(|k| k.as_str()),
                        draft.reference_id,
                        draft.min_session_duration,
                        draft.frequency.as_str(),
                        active_days,
                        Utc::now().timestamp(),
                    ],
                )
                .map_err(InfraError::from)?;

            if changed == 0 {
                return Err(PacelineError::NotFound(format!("goal not found: {id}")));
            }
            Ok(())
        })
        .await
        .map_err(join_error)?
    }

    async fn soft_delete_goal(&self, id: i64) -> Result<()> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE goals SET is_active = 0, deleted_at = ?2 \
                     WHERE id = ?1 AND deleted_at IS NULL",
                    params![id, Utc::now().timestamp()],
                )
                .map_err(InfraError::from)?;

            if changed == 0 {
                return Err(PacelineError::NotFound(format!("goal not found: {id}")));
            }
            Ok(())
        })
        .await
        .map_err(join_error)?
    }

    async fn get_goal(&self, id: i64) -> Result<Goal> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let row = conn
                .query_row(
                    &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"),
                    params![id],
                    GoalRow::from_row,
                )
                .map_err(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => {
                        PacelineError::NotFound(format!("goal not found: {id}"))
                    }
                    other => InfraError::from(other).into(),
                })?;
            row.into_goal()
        })
        .await
        .map_err(join_error)?
    }

    async fn list_active_goals(&self) -> Result<Vec<Goal>> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {GOAL_COLUMNS} FROM goals \
                     WHERE is_active = 1 AND deleted_at IS NULL ORDER BY id"
                ))
                .map_err(InfraError::from)?;

            let rows = stmt
                .query_map([], GoalRow::from_row)
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;

            rows.into_iter().map(GoalRow::into_goal).collect()
        })
        .await
        .map_err(join_error)?
    }
}
