//! Progress calculation: aggregates usage sessions over a goal's period
//! into a value in the goal's target unit.
//!
//! Read-only and total: empty history yields 0, never an error.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use paceline_domain::{
    Goal, GoalType, ProductivityLevel, Result, TargetUnit, UsageSession,
};
use tracing::warn;

use super::period::{local_period_bounds, period_for_goal};
use super::ports::{ClassificationStore, SessionStore};

/// Aggregates session data into goal progress values.
///
/// Holds the read-only session and classification ports; all methods are
/// side-effect free.
pub struct ProgressCalculator {
    sessions: Arc<dyn SessionStore>,
    classification: Arc<dyn ClassificationStore>,
}

impl ProgressCalculator {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        classification: Arc<dyn ClassificationStore>,
    ) -> Self {
        Self { sessions, classification }
    }

    /// Current progress value for `goal` over the period containing `date`,
    /// expressed in the goal's target unit.
    pub async fn current_value(&self, goal: &Goal, date: NaiveDate) -> Result<f64> {
        let period = period_for_goal(goal, date);
        let (start, end) = local_period_bounds(period);

        let sessions: Vec<UsageSession> = self
            .sessions
            .sessions_in_range(start, end)
            .await?
            .into_iter()
            .filter(UsageSession::is_countable)
            .collect();

        match goal.goal_type {
            GoalType::ProductivityScore => self.productivity_score(&sessions).await,
            GoalType::ProductivityTime => self.productivity_time(goal, &sessions).await,
            GoalType::WorkSessions => Ok(work_session_count(goal, &sessions)),
            GoalType::App => self.app_time(goal, &sessions).await,
            GoalType::Category => self.category_time(goal, &sessions).await,
        }
    }

    /// Productivity score 0-100: weighted share of productive (100) and
    /// neutral (50) time over all recorded time in the period.
    async fn productivity_score(&self, sessions: &[UsageSession]) -> Result<f64> {
        let levels = self.levels_by_app(sessions).await?;

        let mut productive: i64 = 0;
        let mut neutral: i64 = 0;
        let mut total: i64 = 0;
        for session in sessions {
            total += session.duration_ms;
            match levels.get(&session.app_id).copied().unwrap_or_default() {
                ProductivityLevel::Productive => productive += session.duration_ms,
                ProductivityLevel::Neutral => neutral += session.duration_ms,
                ProductivityLevel::Unproductive => {}
            }
        }

        if total == 0 {
            return Ok(0.0);
        }
        Ok(((productive as f64 * 100.0 + neutral as f64 * 50.0) / total as f64).round())
    }

    /// Time spent at the productivity level named by the goal's reference.
    async fn productivity_time(&self, goal: &Goal, sessions: &[UsageSession]) -> Result<f64> {
        let Some(reference) = goal.reference_id.as_deref() else {
            return Ok(0.0);
        };
        let target_level: ProductivityLevel = match reference.parse() {
            Ok(level) => level,
            Err(_) => {
                warn!(goal_id = goal.id, reference, "goal references an unknown productivity level");
                return Ok(0.0);
            }
        };

        let levels = self.levels_by_app(sessions).await?;
        let total_ms: i64 = sessions
            .iter()
            .filter(|s| levels.get(&s.app_id).copied().unwrap_or_default() == target_level)
            .map(|s| s.duration_ms)
            .sum();

        Ok(convert_duration(total_ms, goal.target_unit))
    }

    /// Time spent in the specific app the goal references.
    async fn app_time(&self, goal: &Goal, sessions: &[UsageSession]) -> Result<f64> {
        let Some(reference) = goal.reference_id.as_deref() else {
            return Ok(0.0);
        };
        let Some(app_id) = self.classification.resolve_app_id(reference).await? else {
            warn!(goal_id = goal.id, reference, "goal references an unknown app");
            return Ok(0.0);
        };

        let total_ms: i64 =
            sessions.iter().filter(|s| s.app_id == app_id).map(|s| s.duration_ms).sum();
        Ok(convert_duration(total_ms, goal.target_unit))
    }

    /// Time spent in apps belonging to the referenced category.
    async fn category_time(&self, goal: &Goal, sessions: &[UsageSession]) -> Result<f64> {
        let Some(reference) = goal.reference_id.as_deref() else {
            return Ok(0.0);
        };

        let mut categories: HashMap<String, Option<String>> = HashMap::new();
        let mut total_ms: i64 = 0;
        for session in sessions {
            let category = match categories.get(&session.app_id) {
                Some(cached) => cached.clone(),
                None => {
                    let looked_up = self.classification.category_of(&session.app_id).await?;
                    categories.insert(session.app_id.clone(), looked_up.clone());
                    looked_up
                }
            };
            if category.as_deref() == Some(reference) {
                total_ms += session.duration_ms;
            }
        }

        Ok(convert_duration(total_ms, goal.target_unit))
    }

    /// Productivity level per distinct app, one lookup each.
    async fn levels_by_app(
        &self,
        sessions: &[UsageSession],
    ) -> Result<HashMap<String, ProductivityLevel>> {
        let mut levels = HashMap::new();
        for session in sessions {
            if !levels.contains_key(&session.app_id) {
                let level = self.classification.productivity_level_of(&session.app_id).await?;
                levels.insert(session.app_id.clone(), level);
            }
        }
        Ok(levels)
    }
}

/// Count of sessions meeting the goal's qualifying-duration threshold.
fn work_session_count(goal: &Goal, sessions: &[UsageSession]) -> f64 {
    let min_ms = goal.min_session_minutes() * 60_000;
    sessions.iter().filter(|s| s.duration_ms >= min_ms).count() as f64
}

/// Convert milliseconds to the goal's target unit: hours rounded to two
/// decimals, everything else whole minutes.
fn convert_duration(total_ms: i64, unit: TargetUnit) -> f64 {
    match unit {
        TargetUnit::Hours => (total_ms as f64 / 3_600_000.0 * 100.0).round() / 100.0,
        _ => (total_ms as f64 / 60_000.0).round(),
    }
}
