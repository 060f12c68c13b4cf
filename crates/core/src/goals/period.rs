//! Period resolution: maps a goal frequency and a reference date to the
//! calendar window the goal is evaluated over.
//!
//! All functions here are total; every date resolves to exactly one period.

use chrono::{DateTime, Datelike, Local, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};
use paceline_domain::{Frequency, Goal, Period};

/// Resolve the evaluation period containing `date`.
///
/// Daily periods are the date itself; weekly periods run Monday through
/// Sunday; monthly periods cover the full calendar month. The period end
/// is also the persistence key for that period's progress record.
pub fn resolve_period(frequency: Frequency, date: NaiveDate) -> Period {
    match frequency {
        Frequency::Daily => Period { start: date, end: date },
        Frequency::Weekly => {
            let offset = i64::from(date.weekday().num_days_from_monday());
            let start = date - chrono::Duration::days(offset);
            Period { start, end: start + chrono::Duration::days(6) }
        }
        Frequency::Monthly => {
            let start = date.with_day(1).unwrap_or(date);
            let end = start
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(date);
            Period { start, end }
        }
    }
}

/// Period for a specific goal.
pub fn period_for_goal(goal: &Goal, date: NaiveDate) -> Period {
    resolve_period(goal.frequency, date)
}

/// True when `date` is the last calendar day of its month.
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// UTC instants bounding a local-date period: local midnight at the start
/// of `start` through the last millisecond of `end`.
pub fn local_period_bounds(period: Period) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = period.start.and_time(chrono::NaiveTime::MIN);
    let end = period
        .end
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| period.end.and_time(chrono::NaiveTime::MIN));
    (local_to_utc(start), local_to_utc(end))
}

fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // DST fold: take the earlier instant.
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        // DST gap: the wall-clock time never existed, shift an hour forward.
        LocalResult::None => match Local.from_local_datetime(&(naive + chrono::Duration::hours(1)))
        {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => Utc.from_utc_datetime(&naive),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_period_is_the_date_itself() {
        let d = date(2026, 8, 19);
        assert_eq!(resolve_period(Frequency::Daily, d), Period { start: d, end: d });
    }

    #[test]
    fn weekly_period_runs_monday_to_sunday() {
        // 2026-08-19 is a Wednesday.
        let period = resolve_period(Frequency::Weekly, date(2026, 8, 19));
        assert_eq!(period.start, date(2026, 8, 17));
        assert_eq!(period.end, date(2026, 8, 23));

        // A Sunday belongs to the week it ends.
        let period = resolve_period(Frequency::Weekly, date(2026, 8, 23));
        assert_eq!(period.start, date(2026, 8, 17));
        assert_eq!(period.end, date(2026, 8, 23));

        // A Monday starts its own week.
        let period = resolve_period(Frequency::Weekly, date(2026, 8, 24));
        assert_eq!(period.start, date(2026, 8, 24));
        assert_eq!(period.end, date(2026, 8, 30));
    }

    #[test]
    fn monthly_period_covers_the_calendar_month() {
        let period = resolve_period(Frequency::Monthly, date(2026, 2, 14));
        assert_eq!(period.start, date(2026, 2, 1));
        assert_eq!(period.end, date(2026, 2, 28));

        // Leap year February.
        let period = resolve_period(Frequency::Monthly, date(2028, 2, 2));
        assert_eq!(period.end, date(2028, 2, 29));

        // Year boundary.
        let period = resolve_period(Frequency::Monthly, date(2026, 12, 31));
        assert_eq!(period.start, date(2026, 12, 1));
        assert_eq!(period.end, date(2026, 12, 31));
    }

    #[test]
    fn last_day_of_month_detection() {
        assert!(is_last_day_of_month(date(2026, 8, 31)));
        assert!(is_last_day_of_month(date(2026, 2, 28)));
        assert!(!is_last_day_of_month(date(2026, 2, 27)));
        assert!(is_last_day_of_month(date(2026, 12, 31)));
    }

    #[test]
    fn period_bounds_cover_the_whole_window() {
        let period = resolve_period(Frequency::Daily, date(2026, 8, 19));
        let (start, end) = local_period_bounds(period);
        assert!(start < end);
        // A full day minus one millisecond.
        assert_eq!((end - start).num_milliseconds(), 24 * 3_600_000 - 1);
    }
}
