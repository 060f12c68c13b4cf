//! Streak computation: consecutive days on which every due goal was
//! achieved.
//!
//! One backward walk with per-day due-set filtering handles all goal
//! frequencies; weekly and monthly goals only enter the due set on their
//! period-end days.

use chrono::NaiveDate;
use paceline_domain::{Goal, Result};
use tracing::debug;

use super::calculator::ProgressCalculator;
use super::ports::ProgressStore;
use super::schedule::is_due;
use super::status::evaluate_status;

/// Upper bound on the backward walk.
const MAX_STREAK_DAYS: u32 = 365;

/// Number of consecutive days, walking backward from `reference`
/// inclusive, on which every due goal was achieved.
///
/// Days with no due goals pass through and still count. The reference day
/// is evaluated live when it is `today` (the day is not yet closed); all
/// earlier days read persisted progress, and a due goal without a record
/// counts as not achieved. The walk stops at the earliest goal's creation
/// date or after [`MAX_STREAK_DAYS`].
pub async fn consecutive_achieved_days(
    goals: &[Goal],
    calculator: &ProgressCalculator,
    progress: &dyn ProgressStore,
    reference: NaiveDate,
    today: NaiveDate,
) -> Result<u32> {
    if goals.is_empty() {
        return Ok(0);
    }
    let earliest_created = goals.iter().map(Goal::created_date).min();

    let mut streak = 0u32;
    let mut day = reference;

    while streak < MAX_STREAK_DAYS {
        if earliest_created.map_or(true, |earliest| day < earliest) {
            break;
        }

        let due: Vec<&Goal> = goals.iter().filter(|g| is_due(g, day)).collect();

        if !due.is_empty() && !all_achieved(&due, calculator, progress, day, today).await? {
            debug!(%day, due = due.len(), "streak ends");
            break;
        }

        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    Ok(streak)
}

async fn all_achieved(
    due: &[&Goal],
    calculator: &ProgressCalculator,
    progress: &dyn ProgressStore,
    day: NaiveDate,
    today: NaiveDate,
) -> Result<bool> {
    if day == today {
        // The day is still open; evaluate live instead of reading storage.
        for goal in due {
            let value = calculator.current_value(goal, day).await?;
            let status = evaluate_status(value, goal.target_value, goal.target_type);
            if !status.is_achieved() {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    // Due goals are evaluated at their period end, so `day` is the
    // persistence key for every goal in the due set.
    let ids: Vec<i64> = due.iter().map(|g| g.id).collect();
    let statuses = progress.statuses_for_period_end(&ids, day).await?;
    Ok(due.iter().all(|goal| statuses.get(&goal.id).is_some_and(|s| s.is_achieved())))
}
