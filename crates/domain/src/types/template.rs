//! Built-in goal template types.

use serde::{Deserialize, Serialize};

use crate::types::goal::{Frequency, GoalType, ReferenceKind, TargetType, TargetUnit};

/// A pre-defined goal definition users can instantiate directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalTemplate {
    /// Stable template identifier, e.g. `daily-deep-work-3`.
    pub id: String,
    /// Catalog grouping, e.g. `Deep Work`.
    pub category: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub goal_type: GoalType,
    pub target_value: f64,
    pub target_unit: TargetUnit,
    pub target_type: TargetType,
    pub reference_kind: Option<ReferenceKind>,
    pub reference_id: Option<String>,
    pub min_session_duration: Option<i64>,
    pub frequency: Frequency,
}

/// Optional field overrides applied when instantiating a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCustomizations {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub target_value: Option<f64>,
    pub reference_id: Option<String>,
    pub min_session_duration: Option<i64>,
    pub frequency: Option<Frequency>,
    pub active_days: Option<Vec<u8>>,
}
