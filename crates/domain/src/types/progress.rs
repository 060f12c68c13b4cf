//! Persisted progress records and the evaluated views built from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{PacelineError, Result};
use crate::types::goal::{Goal, Period};

/// Achievement status of a goal for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Target reached (minimum) or respected (maximum).
    Achieved,
    /// Close to the target boundary.
    Warning,
    /// Some activity recorded, target not yet reached.
    InProgress,
    /// No qualifying activity at all.
    Pending,
    /// Maximum target exceeded.
    Failed,
    /// Display-only: the goal is off-schedule on the viewed date.
    Inactive,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Achieved => "achieved",
            Self::Warning => "warning",
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Inactive => "inactive",
        }
    }

    pub fn is_achieved(&self) -> bool {
        matches!(self, Self::Achieved)
    }
}

impl FromStr for GoalStatus {
    type Err = PacelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "achieved" => Ok(Self::Achieved),
            "warning" => Ok(Self::Warning),
            "in_progress" => Ok(Self::InProgress),
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            "inactive" => Ok(Self::Inactive),
            other => Err(PacelineError::InvalidInput(format!("unknown goal status: {other}"))),
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted progress snapshot, keyed uniquely by `(goal_id, period_end)`.
///
/// `target_value` is frozen at save time so history stays meaningful when
/// the goal is edited later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: i64,
    pub period_end: NaiveDate,
    pub current_value: f64,
    pub target_value: f64,
    pub status: GoalStatus,
    pub achieved_at: Option<DateTime<Utc>>,
}

/// An evaluated goal as presented to the dashboard for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSnapshot {
    pub goal: Goal,
    pub current_value: f64,
    pub status: GoalStatus,
    /// Display percentage, capped at 150.
    pub progress_percentage: u32,
    pub period: Period,
}

/// Aggregate stats for one viewed date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayStats {
    pub active_goals: usize,
    pub achieved: usize,
    /// Consecutive days (ending at the viewed date) with every due goal
    /// achieved.
    pub day_streak: u32,
    pub success_rate: u8,
}

/// The full goals view for one date: due goals with progress, off-schedule
/// goals, and day-level stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsForDate {
    pub goals: Vec<GoalSnapshot>,
    pub inactive_goals: Vec<GoalSnapshot>,
    pub stats: DayStats,
    pub is_today: bool,
}

/// Outcome of a save-progress batch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SaveSummary {
    pub saved: usize,
    pub skipped: usize,
}

/// Outcome of a startup backfill run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BackfillSummary {
    /// Distinct dates the backfill attempted to save.
    pub dates_processed: usize,
    /// Goal-period records written across all dates.
    pub records_saved: usize,
    /// Orphaned progress rows removed afterwards.
    pub orphans_removed: usize,
}
