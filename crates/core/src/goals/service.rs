//! Goal service - the facade consumed by the UI and export layers.
//!
//! Ties the pure evaluation functions to the persistence ports: CRUD,
//! the goals-for-date view, progress persistence with backfill, streaks,
//! and insights. Date-relative operations have `*_as_of` variants taking an
//! explicit `today` so tests stay deterministic; the public wrappers supply
//! the local calendar date.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{Days, Local, NaiveDate, Utc};
use paceline_domain::{
    BackfillSummary, DayStats, Frequency, Goal, GoalDraft, GoalInsights, GoalProgress,
    GoalSnapshot, GoalStatus, GoalTemplate, GoalsForDate, DailySuccessRate, HeatmapCell, Period,
    Result, SaveSummary, TemplateCustomizations,
};
use tracing::{debug, error, info, warn};

use super::calculator::ProgressCalculator;
use super::period::period_for_goal;
use super::ports::{ClassificationStore, GoalStore, ProgressStore, SessionStore};
use super::status::{evaluate_status, progress_percentage};
use super::streak::consecutive_achieved_days;
use super::templates;

/// Facade over the goal engine.
pub struct GoalService {
    goals: Arc<dyn GoalStore>,
    progress: Arc<dyn ProgressStore>,
    calculator: ProgressCalculator,
}

impl GoalService {
    pub fn new(
        goals: Arc<dyn GoalStore>,
        progress: Arc<dyn ProgressStore>,
        sessions: Arc<dyn SessionStore>,
        classification: Arc<dyn ClassificationStore>,
    ) -> Self {
        Self { goals, progress, calculator: ProgressCalculator::new(sessions, classification) }
    }

    /* ------------------------------ CRUD ------------------------------ */

    /// Create a goal from a validated draft.
    pub async fn create_goal(&self, draft: &GoalDraft) -> Result<Goal> {
        draft.validate()?;
        let goal = self.goals.insert_goal(draft).await?;
        info!(goal_id = goal.id, name = %goal.name, "goal created");
        Ok(goal)
    }

    /// Create a goal from a built-in template with optional customizations.
    pub async fn create_goal_from_template(
        &self,
        template_id: &str,
        customizations: &TemplateCustomizations,
    ) -> Result<Goal> {
        let draft = templates::draft_from_template(template_id, customizations)?;
        draft.validate()?;
        let goal = self.goals.insert_goal(&draft).await?;
        info!(goal_id = goal.id, template_id, "goal created from template");
        Ok(goal)
    }

    /// Replace the mutable fields of an existing goal.
    pub async fn update_goal(&self, id: i64, draft: &GoalDraft) -> Result<()> {
        draft.validate()?;
        self.goals.update_goal(id, draft).await
    }

    /// Soft-delete a goal; its historical progress stays valid.
    pub async fn delete_goal(&self, id: i64) -> Result<()> {
        self.goals.soft_delete_goal(id).await?;
        info!(goal_id = id, "goal soft-deleted");
        Ok(())
    }

    /// Fetch a goal by id.
    pub async fn get_goal(&self, id: i64) -> Result<Goal> {
        self.goals.get_goal(id).await
    }

    /// All available goal templates.
    pub fn templates(&self) -> Vec<GoalTemplate> {
        templates::all_templates()
    }

    /// Templates grouped by catalog category.
    pub fn templates_by_category(&self) -> BTreeMap<String, Vec<GoalTemplate>> {
        templates::templates_by_category()
    }

    /* --------------------------- evaluation --------------------------- */

    /// Evaluate one goal for one date, choosing between live calculation
    /// and persisted history.
    ///
    /// Live evaluation applies when the date is today or falls inside a
    /// weekly/monthly period that has not closed yet; in the latter case
    /// progress is computed up to today. Past periods read the persisted
    /// record; a past period without one yields `None`.
    pub async fn evaluate_goal(
        &self,
        goal: &Goal,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Option<GoalSnapshot>> {
        if !goal.existed_on(date) {
            return Ok(None);
        }

        let period = period_for_goal(goal, date);
        let is_current_period = date >= period.start && period.end >= today;
        let is_live_date = date == today || (is_current_period && date < today);

        if is_live_date {
            let calculate_up_to = match goal.frequency {
                Frequency::Weekly | Frequency::Monthly if is_current_period => today,
                _ => date,
            };
            let current_value = self.calculator.current_value(goal, calculate_up_to).await?;
            let status = evaluate_status(current_value, goal.target_value, goal.target_type);
            return Ok(Some(snapshot(goal, current_value, status, period)));
        }

        match self.progress.find_progress(goal.id, period.end).await? {
            Some(record) => {
                Ok(Some(snapshot(goal, record.current_value, record.status, period)))
            }
            None => Ok(None),
        }
    }

    /// The goals view for one date: due goals with progress, off-schedule
    /// goals marked inactive, plus day stats.
    pub async fn goals_for_date(&self, date: NaiveDate) -> Result<GoalsForDate> {
        self.goals_for_date_as_of(date, local_today()).await
    }

    pub async fn goals_for_date_as_of(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<GoalsForDate> {
        let all_goals = self.goals.list_active_goals().await?;

        let mut goals = Vec::new();
        let mut inactive_goals = Vec::new();
        for goal in &all_goals {
            if !goal.existed_on(date) {
                continue;
            }
            let on_schedule = match goal.frequency {
                Frequency::Daily => goal.is_active_on_weekday(date),
                Frequency::Weekly | Frequency::Monthly => true,
            };
            if !on_schedule {
                inactive_goals.push(GoalSnapshot {
                    goal: goal.clone(),
                    current_value: 0.0,
                    status: GoalStatus::Inactive,
                    progress_percentage: 0,
                    period: Period { start: date, end: date },
                });
                continue;
            }
            if let Some(snap) = self.evaluate_goal(goal, date, today).await? {
                goals.push(snap);
            }
        }

        let achieved = goals.iter().filter(|g| g.status.is_achieved()).count();
        let active_goals = goals.len();
        let success_rate = if active_goals > 0 {
            ((achieved as f64 / active_goals as f64) * 100.0).round() as u8
        } else {
            0
        };
        let day_streak = consecutive_achieved_days(
            &all_goals,
            &self.calculator,
            self.progress.as_ref(),
            date,
            today,
        )
        .await?;

        Ok(GoalsForDate {
            goals,
            inactive_goals,
            stats: DayStats { active_goals, achieved, day_streak, success_rate },
            is_today: date == today,
        })
    }

    /// Streak of consecutive fully-achieved days ending at `date`.
    pub async fn streak_for_date(&self, date: NaiveDate) -> Result<u32> {
        self.streak_for_date_as_of(date, local_today()).await
    }

    pub async fn streak_for_date_as_of(&self, date: NaiveDate, today: NaiveDate) -> Result<u32> {
        let goals = self.goals.list_active_goals().await?;
        consecutive_achieved_days(&goals, &self.calculator, self.progress.as_ref(), date, today)
            .await
    }

    /* -------------------------- persistence --------------------------- */

    /// Compute and persist progress for every goal whose period ends on
    /// `date`.
    ///
    /// Without `force` an existing record for the same `(goal, period)` key
    /// is left untouched. Goals with no activity at all (`pending`) are
    /// never persisted. A failure on one goal is logged and the batch
    /// continues.
    pub async fn save_progress_for_date(&self, date: NaiveDate, force: bool) -> Result<SaveSummary> {
        let goals = self.goals.list_active_goals().await?;
        let mut summary = SaveSummary::default();

        for goal in &goals {
            match self.save_goal_progress(goal, date, force).await {
                Ok(true) => summary.saved += 1,
                Ok(false) => summary.skipped += 1,
                Err(err) => {
                    error!(goal_id = goal.id, %date, error = %err, "failed to save goal progress, continuing batch");
                    summary.skipped += 1;
                }
            }
        }

        debug!(%date, saved = summary.saved, skipped = summary.skipped, "progress save finished");
        Ok(summary)
    }

    async fn save_goal_progress(&self, goal: &Goal, date: NaiveDate, force: bool) -> Result<bool> {
        if !goal.existed_on(date) {
            return Ok(false);
        }
        if goal.frequency == Frequency::Daily && !goal.is_active_on_weekday(date) {
            return Ok(false);
        }

        let period = period_for_goal(goal, date);
        // Weekly and monthly goals wait for their period end; saving
        // mid-period would freeze an incomplete value under the period key.
        if goal.frequency != Frequency::Daily && date != period.end {
            return Ok(false);
        }

        if !force && self.progress.find_progress(goal.id, period.end).await?.is_some() {
            return Ok(false);
        }

        let current_value = self.calculator.current_value(goal, date).await?;
        let status = evaluate_status(current_value, goal.target_value, goal.target_type);

        // Empty periods are not persisted.
        if status == GoalStatus::Pending {
            return Ok(false);
        }

        let record = GoalProgress {
            goal_id: goal.id,
            period_end: period.end,
            current_value,
            target_value: goal.target_value,
            status,
            achieved_at: status.is_achieved().then(Utc::now),
        };
        self.progress.upsert_progress(&record, force).await
    }

    /// Fill in progress records missed while the application was not
    /// running, then drop orphaned records.
    ///
    /// Safe to run concurrently with the midnight rollover: saves are
    /// keyed by `(goal, period end)` and non-forced writes never overwrite.
    pub async fn backfill_missing_progress(&self) -> Result<BackfillSummary> {
        self.backfill_missing_progress_as_of(local_today()).await
    }

    pub async fn backfill_missing_progress_as_of(
        &self,
        today: NaiveDate,
    ) -> Result<BackfillSummary> {
        let Some(yesterday) = today.pred_opt() else {
            return Ok(BackfillSummary::default());
        };

        let dates = match self.progress.latest_period_end().await? {
            None => {
                info!("no previous progress found, saving yesterday only");
                BTreeSet::from([yesterday])
            }
            Some(last_saved) if last_saved >= yesterday => {
                debug!(%last_saved, "progress is up to date, no backfill needed");
                BTreeSet::new()
            }
            Some(last_saved) => {
                let goals = self.goals.list_active_goals().await?;
                self.dates_to_backfill(&goals, last_saved, yesterday)
            }
        };

        let mut summary =
            BackfillSummary { dates_processed: dates.len(), ..BackfillSummary::default() };
        for date in &dates {
            debug!(%date, "backfilling progress");
            let saved = self.save_progress_for_date(*date, false).await?;
            summary.records_saved += saved.saved;
        }

        match self.progress.delete_orphaned().await {
            Ok(removed) => summary.orphans_removed = removed,
            Err(err) => warn!(error = %err, "orphaned progress cleanup failed"),
        }

        info!(
            dates = summary.dates_processed,
            records = summary.records_saved,
            orphans = summary.orphans_removed,
            "backfill complete"
        );
        Ok(summary)
    }

    /// Dates in `(last_saved, yesterday]` that need a save pass: every day
    /// when daily goals exist, plus completed weekly/monthly period ends.
    fn dates_to_backfill(
        &self,
        goals: &[Goal],
        last_saved: NaiveDate,
        yesterday: NaiveDate,
    ) -> BTreeSet<NaiveDate> {
        let has_daily = goals.iter().any(|g| g.frequency == Frequency::Daily);
        let has_weekly = goals.iter().any(|g| g.frequency == Frequency::Weekly);
        let has_monthly = goals.iter().any(|g| g.frequency == Frequency::Monthly);

        let mut dates = BTreeSet::new();
        for date in last_saved.iter_days().skip(1).take_while(|d| *d <= yesterday) {
            if has_daily
                || (has_weekly && super::period::resolve_period(Frequency::Weekly, date).end == date)
                || (has_monthly && super::period::is_last_day_of_month(date))
            {
                dates.insert(date);
            }
        }
        dates
    }

    /* ---------------------------- insights ---------------------------- */

    /// Success-rate time series and calendar heatmap for the last `days`
    /// days, today included.
    pub async fn insights(&self, days: u32) -> Result<GoalInsights> {
        self.insights_as_of(days, local_today()).await
    }

    pub async fn insights_as_of(&self, days: u32, today: NaiveDate) -> Result<GoalInsights> {
        let all_goals = self.goals.list_active_goals().await?;
        let mut insights = GoalInsights::default();

        for offset in (0..days).rev() {
            let Some(date) = today.checked_sub_days(Days::new(u64::from(offset))) else {
                continue;
            };

            let existing: Vec<&Goal> =
                all_goals.iter().filter(|g| g.existed_on(date)).collect();
            if existing.is_empty() {
                // No goals existed yet: no data, not a 0% day.
                insights.daily_success_rate.push(DailySuccessRate {
                    date,
                    success_rate: None,
                    achieved: 0,
                    total: 0,
                });
                insights.calendar_heatmap.push(HeatmapCell {
                    date,
                    level: 0,
                    success_rate: None,
                    achieved: 0,
                    total: 0,
                });
                continue;
            }

            let due_daily: Vec<&Goal> = existing
                .iter()
                .copied()
                .filter(|g| g.frequency == Frequency::Daily && g.is_active_on_weekday(date))
                .collect();
            let total = due_daily.len();

            let achieved = if date == today {
                let mut achieved = 0;
                for goal in &due_daily {
                    let value = self.calculator.current_value(goal, date).await?;
                    let status = evaluate_status(value, goal.target_value, goal.target_type);
                    if status.is_achieved() {
                        achieved += 1;
                    }
                }
                achieved
            } else if total > 0 {
                let ids: Vec<i64> = due_daily.iter().map(|g| g.id).collect();
                let statuses = self.progress.statuses_for_period_end(&ids, date).await?;
                statuses.values().filter(|s| s.is_achieved()).count()
            } else {
                0
            };

            let success_rate = if total > 0 {
                ((achieved as f64 / total as f64) * 100.0).round() as u8
            } else {
                0
            };

            insights.daily_success_rate.push(DailySuccessRate {
                date,
                success_rate: Some(success_rate),
                achieved,
                total,
            });
            insights.calendar_heatmap.push(HeatmapCell {
                date,
                level: heatmap_level(total, success_rate),
                success_rate: Some(success_rate),
                achieved,
                total,
            });
        }

        Ok(insights)
    }
}

fn snapshot(goal: &Goal, current_value: f64, status: GoalStatus, period: Period) -> GoalSnapshot {
    GoalSnapshot {
        goal: goal.clone(),
        current_value,
        status,
        progress_percentage: progress_percentage(current_value, goal.target_value),
        period,
    }
}

/// Heatmap intensity: 0 = no data, then bands of 25% up to 5 = 100%.
fn heatmap_level(total: usize, success_rate: u8) -> u8 {
    if total == 0 {
        return 0;
    }
    match success_rate {
        0..=24 => 1,
        25..=49 => 2,
        50..=74 => 3,
        75..=99 => 4,
        _ => 5,
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::heatmap_level;

    #[test]
    fn heatmap_bands() {
        assert_eq!(heatmap_level(0, 0), 0);
        assert_eq!(heatmap_level(3, 0), 1);
        assert_eq!(heatmap_level(3, 24), 1);
        assert_eq!(heatmap_level(3, 25), 2);
        assert_eq!(heatmap_level(3, 50), 3);
        assert_eq!(heatmap_level(3, 75), 4);
        assert_eq!(heatmap_level(3, 99), 4);
        assert_eq!(heatmap_level(3, 100), 5);
    }
}
