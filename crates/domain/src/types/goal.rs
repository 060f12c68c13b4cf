//! Goal definitions and the evaluation periods they are measured over.
//!
//! A [`Goal`] is a durable, user-authored target over usage data. The enums
//! here carry `as_str`/`FromStr` pairs because their snake_case text forms
//! are what the record store persists.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{PacelineError, Result};

/// Default qualifying-session threshold for work-session goals, in minutes.
pub const DEFAULT_MIN_SESSION_MINUTES: i64 = 25;

/// What a goal measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Overall productivity score (0-100) for the period.
    ProductivityScore,
    /// Time spent at a specific productivity level.
    ProductivityTime,
    /// Count of sessions meeting the minimum duration threshold.
    WorkSessions,
    /// Time spent in one specific application.
    App,
    /// Time spent in applications belonging to one category.
    Category,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductivityScore => "productivity_score",
            Self::ProductivityTime => "productivity_time",
            Self::WorkSessions => "work_sessions",
            Self::App => "app",
            Self::Category => "category",
        }
    }
}

impl FromStr for GoalType {
    type Err = PacelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "productivity_score" => Ok(Self::ProductivityScore),
            "productivity_time" => Ok(Self::ProductivityTime),
            "work_sessions" => Ok(Self::WorkSessions),
            "app" => Ok(Self::App),
            "category" => Ok(Self::Category),
            other => Err(PacelineError::InvalidInput(format!("unknown goal type: {other}"))),
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit the target value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetUnit {
    Score,
    Minutes,
    Hours,
    Sessions,
}

impl TargetUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Sessions => "sessions",
        }
    }
}

impl FromStr for TargetUnit {
    type Err = PacelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "score" => Ok(Self::Score),
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "sessions" => Ok(Self::Sessions),
            other => Err(PacelineError::InvalidInput(format!("unknown target unit: {other}"))),
        }
    }
}

/// Whether the target is a floor or a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// Reach or exceed the target.
    Minimum,
    /// Stay at or under the target.
    Maximum,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
        }
    }
}

impl FromStr for TargetType {
    type Err = PacelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minimum" => Ok(Self::Minimum),
            "maximum" => Ok(Self::Maximum),
            other => Err(PacelineError::InvalidInput(format!("unknown target type: {other}"))),
        }
    }
}

/// How often the goal is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for Frequency {
    type Err = PacelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(PacelineError::InvalidInput(format!("unknown frequency: {other}"))),
        }
    }
}

/// Kind of entity a goal's `reference_id` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// `reference_id` is an application identifier.
    App,
    /// `reference_id` is a category name.
    Category,
    /// `reference_id` is a productivity level.
    Productivity,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Category => "category",
            Self::Productivity => "productivity",
        }
    }
}

impl FromStr for ReferenceKind {
    type Err = PacelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "app" => Ok(Self::App),
            "category" => Ok(Self::Category),
            "productivity" => Ok(Self::Productivity),
            other => Err(PacelineError::InvalidInput(format!("unknown reference kind: {other}"))),
        }
    }
}

/// The date range a goal is evaluated over.
///
/// `end` doubles as the persistence key for the period's progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A durable goal definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub goal_type: GoalType,
    /// Target value, always positive.
    pub target_value: f64,
    pub target_unit: TargetUnit,
    pub target_type: TargetType,
    pub reference_kind: Option<ReferenceKind>,
    /// App id, category name, or productivity level, depending on type.
    pub reference_id: Option<String>,
    /// Qualifying-session threshold in minutes (work-session goals only).
    pub min_session_duration: Option<i64>,
    pub frequency: Frequency,
    /// Weekday indices (0 = Sunday .. 6 = Saturday) the goal is due on.
    /// `None` means every day. Only meaningful for daily goals.
    pub active_days: Option<Vec<u8>>,
    /// Soft-delete flag; inactive goals are never evaluated.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Goal {
    /// Local calendar date the goal was created on. No progress may be
    /// evaluated before this date.
    pub fn created_date(&self) -> NaiveDate {
        self.created_at.with_timezone(&Local).date_naive()
    }

    /// True when the goal already existed on the given local date.
    pub fn existed_on(&self, date: NaiveDate) -> bool {
        self.created_date() <= date
    }

    /// Qualifying-session threshold in minutes, defaulted when unset.
    pub fn min_session_minutes(&self) -> i64 {
        self.min_session_duration.unwrap_or(DEFAULT_MIN_SESSION_MINUTES)
    }

    /// True when the weekday of `date` is one of the goal's active days.
    /// Goals without an `active_days` restriction are active every day.
    pub fn is_active_on_weekday(&self, date: NaiveDate) -> bool {
        match &self.active_days {
            Some(days) => {
                let weekday = date.weekday().num_days_from_sunday() as u8;
                days.contains(&weekday)
            }
            None => true,
        }
    }
}

/// The mutable subset of a goal used by create and update operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDraft {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub goal_type: GoalType,
    pub target_value: f64,
    pub target_unit: TargetUnit,
    pub target_type: TargetType,
    pub reference_kind: Option<ReferenceKind>,
    pub reference_id: Option<String>,
    pub min_session_duration: Option<i64>,
    pub frequency: Frequency,
    pub active_days: Option<Vec<u8>>,
}

impl GoalDraft {
    /// Validate user-supplied fields before the draft reaches the store.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PacelineError::InvalidInput("goal name must not be empty".into()));
        }
        if !(self.target_value > 0.0) {
            return Err(PacelineError::InvalidInput(format!(
                "target value must be positive, got {}",
                self.target_value
            )));
        }
        if let Some(minutes) = self.min_session_duration {
            if minutes <= 0 {
                return Err(PacelineError::InvalidInput(format!(
                    "minimum session duration must be positive, got {minutes}"
                )));
            }
        }
        if let Some(days) = &self.active_days {
            if days.is_empty() {
                return Err(PacelineError::InvalidInput(
                    "active days must not be empty when set".into(),
                ));
            }
            if let Some(bad) = days.iter().find(|d| **d > 6) {
                return Err(PacelineError::InvalidInput(format!(
                    "weekday index out of range 0-6: {bad}"
                )));
            }
        }
        Ok(())
    }
}
