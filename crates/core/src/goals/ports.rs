//! Port interfaces for the goal engine.
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use paceline_domain::{
    Goal, GoalDraft, GoalProgress, GoalStatus, ProductivityLevel, Result, UsageSession,
};

/// Trait for persisting goal definitions.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Insert a new goal and return the stored row.
    async fn insert_goal(&self, draft: &GoalDraft) -> Result<Goal>;

    /// Replace the mutable fields of an existing goal.
    ///
    /// Returns not-found when no goal with this id exists.
    async fn update_goal(&self, id: i64, draft: &GoalDraft) -> Result<()>;

    /// Soft-delete a goal: clear `is_active` and stamp `deleted_at`.
    /// Historical progress rows are left in place.
    async fn soft_delete_goal(&self, id: i64) -> Result<()>;

    /// Fetch a goal by id.
    async fn get_goal(&self, id: i64) -> Result<Goal>;

    /// All goals that have not been soft-deleted.
    async fn list_active_goals(&self) -> Result<Vec<Goal>>;
}

/// Trait for persisting per-period progress snapshots.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Conditionally write a progress record keyed by
    /// `(goal_id, period_end)`.
    ///
    /// With `force` false an existing record is left untouched; with
    /// `force` true it is overwritten. Returns whether a write happened.
    async fn upsert_progress(&self, record: &GoalProgress, force: bool) -> Result<bool>;

    /// Fetch the record for one goal and period, if any.
    async fn find_progress(
        &self,
        goal_id: i64,
        period_end: NaiveDate,
    ) -> Result<Option<GoalProgress>>;

    /// Statuses persisted for the given goals at one period end. Goals
    /// without a record are absent from the map.
    async fn statuses_for_period_end(
        &self,
        goal_ids: &[i64],
        period_end: NaiveDate,
    ) -> Result<HashMap<i64, GoalStatus>>;

    /// The most recent persisted period end across all goals.
    async fn latest_period_end(&self) -> Result<Option<NaiveDate>>;

    /// Remove progress rows whose parent goal no longer exists. Returns the
    /// number of rows removed.
    async fn delete_orphaned(&self) -> Result<usize>;
}

/// Trait for reading recorded usage sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Sessions whose start time falls within `[start, end]`. The store
    /// only returns completed sessions with a positive duration.
    async fn sessions_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageSession>>;
}

/// Trait for resolving app classification metadata.
#[async_trait]
pub trait ClassificationStore: Send + Sync {
    /// Productivity level for an app, with the app-level override taking
    /// precedence over the category default. Unclassified apps are neutral.
    async fn productivity_level_of(&self, app_id: &str) -> Result<ProductivityLevel>;

    /// Category the app belongs to, if any.
    async fn category_of(&self, app_id: &str) -> Result<Option<String>>;

    /// Resolve a goal reference to an app id. Tries the reference as an id
    /// first, then falls back to a display-name lookup (compatibility path
    /// for goals saved against app names).
    async fn resolve_app_id(&self, reference: &str) -> Result<Option<String>>;
}
