//! Active-day filter: decides whether a goal is due on a calendar date.
//!
//! The same predicate governs live status display, streak evaluation, and
//! progress persistence, so weekly and monthly goals are never
//! double-counted mid-period.

use chrono::NaiveDate;
use paceline_domain::{Frequency, Goal};

use super::period::period_for_goal;

/// True when `goal` is due for evaluation on `date`.
///
/// Daily goals are due every day their weekday restriction allows; weekly
/// goals only on their period's Sunday; monthly goals only on the last
/// calendar day of the month. Nothing is ever due before the goal's local
/// creation date.
pub fn is_due(goal: &Goal, date: NaiveDate) -> bool {
    if !goal.existed_on(date) {
        return false;
    }
    match goal.frequency {
        Frequency::Daily => goal.is_active_on_weekday(date),
        Frequency::Weekly | Frequency::Monthly => period_for_goal(goal, date).end == date,
    }
}
