//! Shared test support: in-memory ports and domain builders.

pub mod repositories;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use paceline_domain::{
    Frequency, Goal, GoalType, ProductivityLevel, ReferenceKind, TargetType, TargetUnit,
    UsageSession,
};

/// A UTC instant that falls at midday, local time, on the given date.
/// Midday keeps the local calendar date stable across DST shifts.
pub fn local_noon(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_hms_opt(12, 0, 0).unwrap();
    match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

/// A completed session for `app` starting at the given local hour of `date`.
pub fn session_on(app: &str, date: NaiveDate, hour: u32, minutes: i64) -> UsageSession {
    let naive = date.and_hms_opt(hour, 0, 0).unwrap();
    let start = match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    };
    let duration_ms = minutes * 60_000;
    UsageSession {
        app_id: app.to_string(),
        start_time: start,
        end_time: Some(start + chrono::Duration::milliseconds(duration_ms)),
        duration_ms,
    }
}

/// Fluent builder for goals with sensible defaults.
pub struct GoalBuilder {
    goal: Goal,
}

impl GoalBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            goal: Goal {
                id,
                name: format!("goal-{id}"),
                description: None,
                icon: None,
                goal_type: GoalType::WorkSessions,
                target_value: 3.0,
                target_unit: TargetUnit::Sessions,
                target_type: TargetType::Minimum,
                reference_kind: None,
                reference_id: None,
                min_session_duration: Some(25),
                frequency: Frequency::Daily,
                active_days: None,
                is_active: true,
                // Far enough in the past that fixed-date tests never hit
                // the creation bound by accident.
                created_at: local_noon(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
                updated_at: None,
                deleted_at: None,
            },
        }
    }

    pub fn goal_type(mut self, goal_type: GoalType) -> Self {
        self.goal.goal_type = goal_type;
        self
    }

    pub fn target(mut self, value: f64, unit: TargetUnit, target_type: TargetType) -> Self {
        self.goal.target_value = value;
        self.goal.target_unit = unit;
        self.goal.target_type = target_type;
        self
    }

    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.goal.frequency = frequency;
        self
    }

    pub fn reference(mut self, kind: ReferenceKind, id: &str) -> Self {
        self.goal.reference_kind = Some(kind);
        self.goal.reference_id = Some(id.to_string());
        self
    }

    pub fn min_session(mut self, minutes: i64) -> Self {
        self.goal.min_session_duration = Some(minutes);
        self
    }

    pub fn active_days(mut self, days: Vec<u8>) -> Self {
        self.goal.active_days = Some(days);
        self
    }

    /// Anchor the goal's creation to a specific local calendar date.
    pub fn created_on(mut self, date: NaiveDate) -> Self {
        self.goal.created_at = local_noon(date);
        self
    }

    pub fn build(self) -> Goal {
        self.goal
    }
}

/// Convenience: a productivity-time goal counting productive minutes.
pub fn productive_minutes_goal(id: i64, target_minutes: f64) -> GoalBuilder {
    GoalBuilder::new(id)
        .goal_type(GoalType::ProductivityTime)
        .target(target_minutes, TargetUnit::Minutes, TargetType::Minimum)
        .reference(ReferenceKind::Productivity, ProductivityLevel::Productive.as_str())
}
