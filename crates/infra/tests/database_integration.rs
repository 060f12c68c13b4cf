//! Integration tests for the SQLite stores against a real database file.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use paceline_core::goals::ports::{ClassificationStore, GoalStore, ProgressStore, SessionStore};
use paceline_core::GoalService;
use paceline_domain::{
    Frequency, GoalDraft, GoalProgress, GoalStatus, GoalType, PacelineError, ProductivityLevel,
    ReferenceKind, TargetType, TargetUnit,
};
use paceline_infra::{
    DbManager, SqliteClassificationStore, SqliteGoalStore, SqliteProgressStore, SqliteSessionStore,
};
use tempfile::TempDir;

fn open_db() -> (TempDir, Arc<DbManager>) {
    let temp_dir = TempDir::new().expect("temp dir created");
    let db_path = temp_dir.path().join("paceline.db");
    let manager = DbManager::new(&db_path, 4).expect("manager created");
    manager.run_migrations().expect("migrations run");
    (temp_dir, Arc::new(manager))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn focus_draft() -> GoalDraft {
    GoalDraft {
        name: "Focus time".into(),
        description: Some("Productive minutes per day".into()),
        icon: Some("⏱️".into()),
        goal_type: GoalType::ProductivityTime,
        target_value: 120.0,
        target_unit: TargetUnit::Minutes,
        target_type: TargetType::Minimum,
        reference_kind: Some(ReferenceKind::Productivity),
        reference_id: Some("productive".into()),
        min_session_duration: None,
        frequency: Frequency::Daily,
        active_days: Some(vec![1, 2, 3, 4, 5]),
    }
}

fn progress_record(goal_id: i64, period_end: NaiveDate, current_value: f64) -> GoalProgress {
    GoalProgress {
        goal_id,
        period_end,
        current_value,
        target_value: 120.0,
        status: GoalStatus::Achieved,
        achieved_at: Some(Utc::now()),
    }
}

#[tokio::test]
async fn goal_rows_round_trip_through_the_store() {
    let (_dir, db) = open_db();
    let store = SqliteGoalStore::new(db);

    let inserted = store.insert_goal(&focus_draft()).await.expect("insert succeeds");
    assert!(inserted.id > 0);
    assert!(inserted.is_active);

    let fetched = store.get_goal(inserted.id).await.expect("fetch succeeds");
    assert_eq!(fetched.name, "Focus time");
    assert_eq!(fetched.goal_type, GoalType::ProductivityTime);
    assert_eq!(fetched.target_unit, TargetUnit::Minutes);
    assert_eq!(fetched.reference_kind, Some(ReferenceKind::Productivity));
    assert_eq!(fetched.active_days, Some(vec![1, 2, 3, 4, 5]));
    assert_eq!(fetched.created_at.timestamp(), inserted.created_at.timestamp());
}

#[tokio::test]
async fn updating_and_soft_deleting_goals() {
    let (_dir, db) = open_db();
    let store = SqliteGoalStore::new(db);

    let goal = store.insert_goal(&focus_draft()).await.expect("insert succeeds");

    let mut draft = focus_draft();
    draft.target_value = 90.0;
    draft.active_days = None;
    store.update_goal(goal.id, &draft).await.expect("update succeeds");

    let updated = store.get_goal(goal.id).await.expect("fetch succeeds");
    assert_eq!(updated.target_value, 90.0);
    assert_eq!(updated.active_days, None);
    assert!(updated.updated_at.is_some());

    store.soft_delete_goal(goal.id).await.expect("delete succeeds");
    let active = store.list_active_goals().await.expect("list succeeds");
    assert!(active.is_empty());

    // The row survives for historical reads.
    let deleted = store.get_goal(goal.id).await.expect("row still present");
    assert!(!deleted.is_active);
    assert!(deleted.deleted_at.is_some());

    // But further writes are rejected.
    let err = store.update_goal(goal.id, &draft).await.expect_err("update rejected");
    assert!(matches!(err, PacelineError::NotFound(_)));
}

#[tokio::test]
async fn missing_goal_is_not_found() {
    let (_dir, db) = open_db();
    let store = SqliteGoalStore::new(db);

    let err = store.get_goal(42).await.expect_err("must fail");
    assert!(matches!(err, PacelineError::NotFound(_)));
}

#[tokio::test]
async fn progress_upsert_respects_the_force_flag() {
    let (_dir, db) = open_db();
    let goals = SqliteGoalStore::new(db.clone());
    let progress = SqliteProgressStore::new(db);

    let goal = goals.insert_goal(&focus_draft()).await.expect("insert succeeds");
    let day = date(2026, 8, 19);

    let wrote = progress
        .upsert_progress(&progress_record(goal.id, day, 150.0), false)
        .await
        .expect("first write");
    assert!(wrote);

    // A second conditional write is a no-op.
    let wrote = progress
        .upsert_progress(&progress_record(goal.id, day, 10.0), false)
        .await
        .expect("second write");
    assert!(!wrote);
    let stored = progress.find_progress(goal.id, day).await.expect("find").expect("present");
    assert_eq!(stored.current_value, 150.0);

    // Force overwrites.
    let wrote = progress
        .upsert_progress(&progress_record(goal.id, day, 10.0), true)
        .await
        .expect("forced write");
    assert!(wrote);
    let stored = progress.find_progress(goal.id, day).await.expect("find").expect("present");
    assert_eq!(stored.current_value, 10.0);
}

#[tokio::test]
async fn status_lookups_and_latest_period_end() {
    let (_dir, db) = open_db();
    let goals = SqliteGoalStore::new(db.clone());
    let progress = SqliteProgressStore::new(db);

    let g1 = goals.insert_goal(&focus_draft()).await.expect("insert g1");
    let g2 = goals.insert_goal(&focus_draft()).await.expect("insert g2");

    let earlier = date(2026, 8, 18);
    let later = date(2026, 8, 19);
    progress.upsert_progress(&progress_record(g1.id, earlier, 130.0), false).await.expect("write");
    progress.upsert_progress(&progress_record(g1.id, later, 125.0), false).await.expect("write");
    let mut missed = progress_record(g2.id, later, 40.0);
    missed.status = GoalStatus::InProgress;
    progress.upsert_progress(&missed, false).await.expect("write");

    let statuses = progress
        .statuses_for_period_end(&[g1.id, g2.id, 999], later)
        .await
        .expect("statuses fetched");
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[&g1.id], GoalStatus::Achieved);
    assert_eq!(statuses[&g2.id], GoalStatus::InProgress);

    let latest = progress.latest_period_end().await.expect("latest fetched");
    assert_eq!(latest, Some(later));
}

#[tokio::test]
async fn orphaned_progress_rows_are_reaped() {
    let (_dir, db) = open_db();
    let goals = SqliteGoalStore::new(db.clone());
    let progress = SqliteProgressStore::new(db.clone());

    let goal = goals.insert_goal(&focus_draft()).await.expect("insert succeeds");
    let day = date(2026, 8, 19);
    progress.upsert_progress(&progress_record(goal.id, day, 130.0), false).await.expect("write");
    progress.upsert_progress(&progress_record(777, day, 60.0), false).await.expect("write");

    let removed = progress.delete_orphaned().await.expect("cleanup runs");
    assert_eq!(removed, 1);
    assert!(progress.find_progress(goal.id, day).await.expect("find").is_some());
    assert!(progress.find_progress(777, day).await.expect("find").is_none());
}

#[tokio::test]
async fn session_queries_skip_open_and_empty_sessions() {
    let (_dir, db) = open_db();

    let base = Utc.with_ymd_and_hms(2026, 8, 19, 9, 0, 0).unwrap();
    {
        let conn = db.get_connection().expect("connection");
        let insert = |offset_min: i64, end: Option<i64>, duration_ms: i64| {
            let start = (base + chrono::Duration::minutes(offset_min)).timestamp_millis();
            conn.execute(
                "INSERT INTO usage_sessions (app_id, start_time, end_time, duration_ms) \
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params!["code", start, end.map(|m| start + m), duration_ms],
            )
            .expect("insert session");
        };
        insert(0, Some(1_800_000), 1_800_000); // completed, 30 min
        insert(60, None, 0); // still open
        insert(120, Some(0), 0); // zero duration
        insert(24 * 60, Some(600_000), 600_000); // next day
    }

    let sessions = SqliteSessionStore::new(db)
        .sessions_in_range(base, base + chrono::Duration::hours(12))
        .await
        .expect("query succeeds");

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].app_id, "code");
    assert_eq!(sessions[0].duration_ms, 1_800_000);
}

#[tokio::test]
async fn classification_override_beats_category_default() {
    let (_dir, db) = open_db();
    {
        let conn = db.get_connection().expect("connection");
        conn.execute_batch(
            "INSERT INTO categories (id, name, productivity_level) VALUES
                 ('dev', 'Development', 'productive'),
                 ('social', 'Social Media', 'unproductive');
             INSERT INTO apps (id, display_name, category_id, productivity_override) VALUES
                 ('code', 'Visual Studio Code', 'dev', NULL),
                 ('slack', 'Slack', 'social', 'neutral'),
                 ('misc', 'Misc Tool', NULL, NULL);",
        )
        .expect("seed data");
    }
    let store = SqliteClassificationStore::new(db);

    assert_eq!(
        store.productivity_level_of("code").await.expect("level"),
        ProductivityLevel::Productive
    );
    // The per-app override wins over the category default.
    assert_eq!(
        store.productivity_level_of("slack").await.expect("level"),
        ProductivityLevel::Neutral
    );
    assert_eq!(
        store.productivity_level_of("misc").await.expect("level"),
        ProductivityLevel::Neutral
    );
    assert_eq!(
        store.productivity_level_of("unknown").await.expect("level"),
        ProductivityLevel::Neutral
    );

    assert_eq!(store.category_of("code").await.expect("category").as_deref(), Some("Development"));
    assert_eq!(store.category_of("misc").await.expect("category"), None);

    assert_eq!(store.resolve_app_id("code").await.expect("resolve").as_deref(), Some("code"));
    assert_eq!(
        store.resolve_app_id("Visual Studio Code").await.expect("resolve").as_deref(),
        Some("code")
    );
    assert_eq!(store.resolve_app_id("nope").await.expect("resolve"), None);
}

#[tokio::test]
async fn service_end_to_end_against_sqlite() {
    let (_dir, db) = open_db();
    {
        let conn = db.get_connection().expect("connection");
        conn.execute_batch(
            "INSERT INTO categories (id, name, productivity_level) VALUES
                 ('dev', 'Development', 'productive');
             INSERT INTO apps (id, display_name, category_id, productivity_override) VALUES
                 ('code', 'Visual Studio Code', 'dev', NULL);",
        )
        .expect("seed data");
    }

    let service = GoalService::new(
        Arc::new(SqliteGoalStore::new(db.clone())),
        Arc::new(SqliteProgressStore::new(db.clone())),
        Arc::new(SqliteSessionStore::new(db.clone())),
        Arc::new(SqliteClassificationStore::new(db.clone())),
    );

    let mut draft = focus_draft();
    draft.active_days = None;
    draft.target_value = 20.0;
    let goal = service.create_goal(&draft).await.expect("goal created");

    // 30 productive minutes today. Midday keeps the session inside the
    // local day no matter when the test runs.
    let today = chrono::Local::now().date_naive();
    let noon = today.and_hms_opt(12, 0, 0).unwrap();
    let start = match chrono::Local.from_local_datetime(&noon).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&noon),
    };
    {
        let conn = db.get_connection().expect("connection");
        conn.execute(
            "INSERT INTO usage_sessions (app_id, start_time, end_time, duration_ms) \
             VALUES ('code', ?1, ?2, 1800000)",
            rusqlite::params![
                start.timestamp_millis(),
                (start + chrono::Duration::minutes(30)).timestamp_millis()
            ],
        )
        .expect("insert session");
    }

    let view = service.goals_for_date(today).await.expect("view built");
    assert_eq!(view.goals.len(), 1);
    assert_eq!(view.goals[0].goal.id, goal.id);
    assert_eq!(view.goals[0].status, GoalStatus::Achieved);

    let summary = service.save_progress_for_date(today, false).await.expect("saved");
    assert_eq!(summary.saved, 1);

    let record = SqliteProgressStore::new(db)
        .find_progress(goal.id, today)
        .await
        .expect("find")
        .expect("record persisted");
    assert_eq!(record.status, GoalStatus::Achieved);
    assert_eq!(record.current_value, 30.0);
}
