//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core ports, enabling deterministic
//! unit tests without database dependencies.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use paceline_core::goals::ports::{ClassificationStore, GoalStore, ProgressStore, SessionStore};
use paceline_domain::{
    Goal, GoalDraft, GoalProgress, GoalStatus, PacelineError, ProductivityLevel,
    Result as DomainResult, UsageSession,
};

/// In-memory mock for `GoalStore`.
#[derive(Default)]
pub struct MockGoalStore {
    goals: Mutex<Vec<Goal>>,
    next_id: AtomicI64,
}

impl MockGoalStore {
    pub fn new(goals: Vec<Goal>) -> Self {
        let next_id = goals.iter().map(|g| g.id).max().unwrap_or(0) + 1;
        Self { goals: Mutex::new(goals), next_id: AtomicI64::new(next_id) }
    }

    pub fn all(&self) -> Vec<Goal> {
        self.goals.lock().unwrap().clone()
    }
}

#[async_trait]
impl GoalStore for MockGoalStore {
    async fn insert_goal(&self, draft: &GoalDraft) -> DomainResult<Goal> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let goal = Goal {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            icon: draft.icon.clone(),
            goal_type: draft.goal_type,
            target_value: draft.target_value,
            target_unit: draft.target_unit,
            target_type: draft.target_type,
            reference_kind: draft.reference_kind,
            reference_id: draft.reference_id.clone(),
            min_session_duration: draft.min_session_duration,
            frequency: draft.frequency,
            active_days: draft.active_days.clone(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };
        self.goals.lock().unwrap().push(goal.clone());
        Ok(goal)
    }

    async fn update_goal(&self, id: i64, draft: &GoalDraft) -> DomainResult<()> {
        let mut goals = self.goals.lock().unwrap();
        let goal = goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| PacelineError::NotFound(format!("goal not found: {id}")))?;
        goal.name = draft.name.clone();
        goal.description = draft.description.clone();
        goal.icon = draft.icon.clone();
        goal.goal_type = draft.goal_type;
        goal.target_value = draft.target_value;
        goal.target_unit = draft.target_unit;
        goal.target_type = draft.target_type;
        goal.reference_kind = draft.reference_kind;
        goal.reference_id = draft.reference_id.clone();
        goal.min_session_duration = draft.min_session_duration;
        goal.frequency = draft.frequency;
        goal.active_days = draft.active_days.clone();
        goal.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn soft_delete_goal(&self, id: i64) -> DomainResult<()> {
        let mut goals = self.goals.lock().unwrap();
        let goal = goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| PacelineError::NotFound(format!("goal not found: {id}")))?;
        goal.is_active = false;
        goal.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn get_goal(&self, id: i64) -> DomainResult<Goal> {
        self.goals
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| PacelineError::NotFound(format!("goal not found: {id}")))
    }

    async fn list_active_goals(&self) -> DomainResult<Vec<Goal>> {
        Ok(self.goals.lock().unwrap().iter().filter(|g| g.is_active).cloned().collect())
    }
}

/// In-memory mock for `ProgressStore`, keyed like the real table.
#[derive(Default)]
pub struct MockProgressStore {
    records: Mutex<HashMap<(i64, NaiveDate), GoalProgress>>,
}

impl MockProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pre-existing record, bypassing the conditional-write rules.
    pub fn seed(&self, record: GoalProgress) {
        self.records.lock().unwrap().insert((record.goal_id, record.period_end), record);
    }

    pub fn get(&self, goal_id: i64, period_end: NaiveDate) -> Option<GoalProgress> {
        self.records.lock().unwrap().get(&(goal_id, period_end)).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProgressStore for MockProgressStore {
    async fn upsert_progress(&self, record: &GoalProgress, force: bool) -> DomainResult<bool> {
        let mut records = self.records.lock().unwrap();
        let key = (record.goal_id, record.period_end);
        if records.contains_key(&key) && !force {
            return Ok(false);
        }
        records.insert(key, record.clone());
        Ok(true)
    }

    async fn find_progress(
        &self,
        goal_id: i64,
        period_end: NaiveDate,
    ) -> DomainResult<Option<GoalProgress>> {
        Ok(self.records.lock().unwrap().get(&(goal_id, period_end)).cloned())
    }

    async fn statuses_for_period_end(
        &self,
        goal_ids: &[i64],
        period_end: NaiveDate,
    ) -> DomainResult<HashMap<i64, GoalStatus>> {
        let records = self.records.lock().unwrap();
        Ok(goal_ids
            .iter()
            .filter_map(|id| records.get(&(*id, period_end)).map(|r| (*id, r.status)))
            .collect())
    }

    async fn latest_period_end(&self) -> DomainResult<Option<NaiveDate>> {
        Ok(self.records.lock().unwrap().keys().map(|(_, date)| *date).max())
    }

    async fn delete_orphaned(&self) -> DomainResult<usize> {
        // Mocks have no parent table; nothing is ever orphaned.
        Ok(0)
    }
}

/// In-memory mock for `SessionStore`.
#[derive(Default)]
pub struct MockSessionStore {
    sessions: Mutex<Vec<UsageSession>>,
}

impl MockSessionStore {
    pub fn new(sessions: Vec<UsageSession>) -> Self {
        Self { sessions: Mutex::new(sessions) }
    }

    /// Record an additional session after construction.
    pub fn push(&self, session: UsageSession) {
        self.sessions.lock().unwrap().push(session);
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn sessions_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<UsageSession>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_countable() && s.start_time >= start && s.start_time <= end)
            .cloned()
            .collect())
    }
}

/// In-memory mock for `ClassificationStore`.
#[derive(Default)]
pub struct MockClassificationStore {
    levels: HashMap<String, ProductivityLevel>,
    categories: HashMap<String, String>,
    app_ids: HashSet<String>,
    display_names: HashMap<String, String>,
}

impl MockClassificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, app_id: &str, level: ProductivityLevel) -> Self {
        self.app_ids.insert(app_id.to_string());
        self.levels.insert(app_id.to_string(), level);
        self
    }

    pub fn with_category(mut self, app_id: &str, category: &str) -> Self {
        self.app_ids.insert(app_id.to_string());
        self.categories.insert(app_id.to_string(), category.to_string());
        self
    }

    /// Register a display name so the fallback lookup can resolve it.
    pub fn with_display_name(mut self, name: &str, app_id: &str) -> Self {
        self.display_names.insert(name.to_string(), app_id.to_string());
        self
    }
}

#[async_trait]
impl ClassificationStore for MockClassificationStore {
    async fn productivity_level_of(&self, app_id: &str) -> DomainResult<ProductivityLevel> {
        Ok(self.levels.get(app_id).copied().unwrap_or_default())
    }

    async fn category_of(&self, app_id: &str) -> DomainResult<Option<String>> {
        Ok(self.categories.get(app_id).cloned())
    }

    async fn resolve_app_id(&self, reference: &str) -> DomainResult<Option<String>> {
        if self.app_ids.contains(reference) {
            return Ok(Some(reference.to_string()));
        }
        Ok(self.display_names.get(reference).cloned())
    }
}
