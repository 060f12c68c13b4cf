//! Usage session records supplied by the window-polling recorder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded stretch of time in one application.
///
/// Sessions are read-only to the goal engine; only completed sessions with a
/// positive duration are counted toward progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSession {
    pub app_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: i64,
}

impl UsageSession {
    /// True when the session has ended and accumulated measurable time.
    pub fn is_countable(&self) -> bool {
        self.end_time.is_some() && self.duration_ms > 0
    }

    /// Session length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.duration_ms / 60_000
    }
}
