//! Time-series insight types for the goals dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Success rate for one calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailySuccessRate {
    pub date: NaiveDate,
    /// `None` when no goals existed yet on this date; distinct from 0%.
    pub success_rate: Option<u8>,
    pub achieved: usize,
    pub total: usize,
}

/// Calendar heatmap cell. `level` is 0 (no data) through 5 (100% success).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub level: u8,
    pub success_rate: Option<u8>,
    pub achieved: usize,
    pub total: usize,
}

/// Insights over the last N days, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalInsights {
    pub daily_success_rate: Vec<DailySuccessRate>,
    pub calendar_heatmap: Vec<HeatmapCell>,
}
