//! Built-in goal templates.
//!
//! Templates are complete goal definitions users can instantiate with a few
//! customizations instead of filling the whole form.

use std::collections::BTreeMap;

use paceline_domain::{
    Frequency, GoalDraft, GoalTemplate, GoalType, PacelineError, ReferenceKind, Result,
    TargetType, TargetUnit, TemplateCustomizations,
};

struct TemplateSpec {
    id: &'static str,
    category: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    goal_type: GoalType,
    target_value: f64,
    target_unit: TargetUnit,
    target_type: TargetType,
    reference_id: Option<&'static str>,
    min_session_duration: Option<i64>,
    frequency: Frequency,
}

const CATALOG: &[TemplateSpec] = &[
    TemplateSpec {
        id: "daily-productivity-70",
        category: "Productivity",
        name: "Daily Productivity Target",
        description: "Achieve a productivity score of 70 or higher each day",
        icon: "🎯",
        goal_type: GoalType::ProductivityScore,
        target_value: 70.0,
        target_unit: TargetUnit::Score,
        target_type: TargetType::Minimum,
        reference_id: None,
        min_session_duration: None,
        frequency: Frequency::Daily,
    },
    TemplateSpec {
        id: "weekly-productivity-75",
        category: "Productivity",
        name: "Weekly Productivity Goal",
        description: "Maintain an average productivity score of 75 for the week",
        icon: "📊",
        goal_type: GoalType::ProductivityScore,
        target_value: 75.0,
        target_unit: TargetUnit::Score,
        target_type: TargetType::Minimum,
        reference_id: None,
        min_session_duration: None,
        frequency: Frequency::Weekly,
    },
    TemplateSpec {
        id: "monthly-productivity-80",
        category: "Productivity",
        name: "Monthly Excellence",
        description: "Maintain an average productivity score of 80 for the month",
        icon: "🏆",
        goal_type: GoalType::ProductivityScore,
        target_value: 80.0,
        target_unit: TargetUnit::Score,
        target_type: TargetType::Minimum,
        reference_id: None,
        min_session_duration: None,
        frequency: Frequency::Monthly,
    },
    TemplateSpec {
        id: "daily-focus-4h",
        category: "Focus",
        name: "Daily Focus Time",
        description: "Spend at least 4 hours on productive tasks each day",
        icon: "⏱️",
        goal_type: GoalType::ProductivityTime,
        target_value: 240.0,
        target_unit: TargetUnit::Minutes,
        target_type: TargetType::Minimum,
        reference_id: Some("productive"),
        min_session_duration: None,
        frequency: Frequency::Daily,
    },
    TemplateSpec {
        id: "daily-limit-distractions-2h",
        category: "Focus",
        name: "Limit Distractions",
        description: "Keep unproductive time under 2 hours per day",
        icon: "🚫",
        goal_type: GoalType::ProductivityTime,
        target_value: 120.0,
        target_unit: TargetUnit::Minutes,
        target_type: TargetType::Maximum,
        reference_id: Some("unproductive"),
        min_session_duration: None,
        frequency: Frequency::Daily,
    },
    TemplateSpec {
        id: "weekly-focus-20h",
        category: "Focus",
        name: "Weekly Focus Target",
        description: "Accumulate at least 20 hours of focused work this week",
        icon: "🎯",
        goal_type: GoalType::ProductivityTime,
        target_value: 1200.0,
        target_unit: TargetUnit::Minutes,
        target_type: TargetType::Minimum,
        reference_id: Some("productive"),
        min_session_duration: None,
        frequency: Frequency::Weekly,
    },
    TemplateSpec {
        id: "monthly-focus-80h",
        category: "Focus",
        name: "Monthly Focus Marathon",
        description: "Achieve 80 hours of focused work this month",
        icon: "🎖️",
        goal_type: GoalType::ProductivityTime,
        target_value: 4800.0,
        target_unit: TargetUnit::Minutes,
        target_type: TargetType::Minimum,
        reference_id: Some("productive"),
        min_session_duration: None,
        frequency: Frequency::Monthly,
    },
    TemplateSpec {
        id: "daily-deep-work-3",
        category: "Deep Work",
        name: "Daily Deep Work Sessions",
        description: "Complete 3 deep work sessions (25+ minutes) each day",
        icon: "🧠",
        goal_type: GoalType::WorkSessions,
        target_value: 3.0,
        target_unit: TargetUnit::Sessions,
        target_type: TargetType::Minimum,
        reference_id: None,
        min_session_duration: Some(25),
        frequency: Frequency::Daily,
    },
    TemplateSpec {
        id: "weekly-deep-work-15",
        category: "Deep Work",
        name: "Weekly Deep Work Goal",
        description: "Complete 15 deep work sessions throughout the week",
        icon: "💪",
        goal_type: GoalType::WorkSessions,
        target_value: 15.0,
        target_unit: TargetUnit::Sessions,
        target_type: TargetType::Minimum,
        reference_id: None,
        min_session_duration: Some(25),
        frequency: Frequency::Weekly,
    },
    TemplateSpec {
        id: "daily-no-zero-days",
        category: "Habits",
        name: "No Zero Days",
        description: "Log at least 30 minutes of productive time every single day",
        icon: "✅",
        goal_type: GoalType::ProductivityTime,
        target_value: 30.0,
        target_unit: TargetUnit::Minutes,
        target_type: TargetType::Minimum,
        reference_id: Some("productive"),
        min_session_duration: None,
        frequency: Frequency::Daily,
    },
    TemplateSpec {
        id: "daily-zero-distractions",
        category: "Challenges",
        name: "Zero Distraction Day",
        description: "Keep unproductive time under 30 minutes for the day",
        icon: "🛡️",
        goal_type: GoalType::ProductivityTime,
        target_value: 30.0,
        target_unit: TargetUnit::Minutes,
        target_type: TargetType::Maximum,
        reference_id: Some("unproductive"),
        min_session_duration: None,
        frequency: Frequency::Daily,
    },
    TemplateSpec {
        id: "daily-deep-work-5",
        category: "Challenges",
        name: "Deep Work Marathon",
        description: "Complete 5 deep work sessions (25+ min) in one day",
        icon: "🚀",
        goal_type: GoalType::WorkSessions,
        target_value: 5.0,
        target_unit: TargetUnit::Sessions,
        target_type: TargetType::Minimum,
        reference_id: None,
        min_session_duration: Some(25),
        frequency: Frequency::Daily,
    },
];

fn materialize(spec: &TemplateSpec) -> GoalTemplate {
    let reference_kind = match spec.goal_type {
        GoalType::ProductivityTime => Some(ReferenceKind::Productivity),
        GoalType::App => Some(ReferenceKind::App),
        GoalType::Category => Some(ReferenceKind::Category),
        GoalType::ProductivityScore | GoalType::WorkSessions => None,
    };
    GoalTemplate {
        id: spec.id.to_string(),
        category: spec.category.to_string(),
        name: spec.name.to_string(),
        description: spec.description.to_string(),
        icon: spec.icon.to_string(),
        goal_type: spec.goal_type,
        target_value: spec.target_value,
        target_unit: spec.target_unit,
        target_type: spec.target_type,
        reference_kind,
        reference_id: spec.reference_id.map(str::to_string),
        min_session_duration: spec.min_session_duration,
        frequency: spec.frequency,
    }
}

/// All available templates.
pub fn all_templates() -> Vec<GoalTemplate> {
    CATALOG.iter().map(materialize).collect()
}

/// Templates grouped by catalog category, alphabetically.
pub fn templates_by_category() -> BTreeMap<String, Vec<GoalTemplate>> {
    let mut grouped: BTreeMap<String, Vec<GoalTemplate>> = BTreeMap::new();
    for template in all_templates() {
        grouped.entry(template.category.clone()).or_default().push(template);
    }
    grouped
}

/// Build a goal draft from a template, applying customizations over the
/// template defaults.
pub fn draft_from_template(
    template_id: &str,
    customizations: &TemplateCustomizations,
) -> Result<GoalDraft> {
    let template = CATALOG
        .iter()
        .find(|t| t.id == template_id)
        .map(materialize)
        .ok_or_else(|| PacelineError::NotFound(format!("template not found: {template_id}")))?;

    Ok(GoalDraft {
        name: customizations.name.clone().unwrap_or(template.name),
        description: Some(customizations.description.clone().unwrap_or(template.description)),
        icon: Some(customizations.icon.clone().unwrap_or(template.icon)),
        goal_type: template.goal_type,
        target_value: customizations.target_value.unwrap_or(template.target_value),
        target_unit: template.target_unit,
        target_type: template.target_type,
        reference_kind: template.reference_kind,
        reference_id: customizations.reference_id.clone().or(template.reference_id),
        min_session_duration: customizations
            .min_session_duration
            .or(template.min_session_duration),
        frequency: customizations.frequency.unwrap_or(template.frequency),
        active_days: customizations.active_days.clone(),
    })
}
