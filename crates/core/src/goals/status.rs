//! Status evaluation: turns a current value and a target into an
//! achievement status.

use paceline_domain::{GoalStatus, TargetType};

/// Evaluate the status of a value against a target.
///
/// For minimum targets the status degrades from `achieved` through
/// `warning` (≥ 80% of target) and `in_progress` (any activity) to
/// `pending` (none). For maximum targets exceeding the target is `failed`;
/// the 90-100% band reports `warning` before the general `achieved` arm so
/// the UI can flag "close to over-limit".
pub fn evaluate_status(current_value: f64, target_value: f64, target_type: TargetType) -> GoalStatus {
    let percentage = if target_value > 0.0 { current_value / target_value * 100.0 } else { 0.0 };

    match target_type {
        TargetType::Minimum => {
            if current_value >= target_value {
                GoalStatus::Achieved
            } else if percentage >= 80.0 {
                GoalStatus::Warning
            } else if current_value > 0.0 {
                GoalStatus::InProgress
            } else {
                GoalStatus::Pending
            }
        }
        TargetType::Maximum => {
            if current_value > target_value {
                GoalStatus::Failed
            } else if percentage >= 90.0 {
                GoalStatus::Warning
            } else {
                // At or under the target, zero included.
                GoalStatus::Achieved
            }
        }
    }
}

/// Display percentage of target reached, capped at 150.
pub fn progress_percentage(current_value: f64, target_value: f64) -> u32 {
    if target_value <= 0.0 {
        return 0;
    }
    let percentage = (current_value / target_value * 100.0).round();
    (percentage.max(0.0) as u32).min(150)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_target_status_is_monotonic() {
        let target = 100.0;
        assert_eq!(evaluate_status(0.0, target, TargetType::Minimum), GoalStatus::Pending);
        assert_eq!(evaluate_status(10.0, target, TargetType::Minimum), GoalStatus::InProgress);
        assert_eq!(evaluate_status(79.9, target, TargetType::Minimum), GoalStatus::InProgress);
        assert_eq!(evaluate_status(80.0, target, TargetType::Minimum), GoalStatus::Warning);
        assert_eq!(evaluate_status(99.9, target, TargetType::Minimum), GoalStatus::Warning);
        assert_eq!(evaluate_status(100.0, target, TargetType::Minimum), GoalStatus::Achieved);
        assert_eq!(evaluate_status(140.0, target, TargetType::Minimum), GoalStatus::Achieved);
    }

    #[test]
    fn maximum_target_boundaries() {
        let target = 60.0;
        assert_eq!(evaluate_status(0.0, target, TargetType::Maximum), GoalStatus::Achieved);
        assert_eq!(evaluate_status(30.0, target, TargetType::Maximum), GoalStatus::Achieved);
        assert_eq!(evaluate_status(60.0, target, TargetType::Maximum), GoalStatus::Warning);
        assert_eq!(evaluate_status(61.0, target, TargetType::Maximum), GoalStatus::Failed);
    }

    #[test]
    fn maximum_warning_band_sits_just_under_the_limit() {
        // 90-100% of a maximum target reports warning, not achieved.
        assert_eq!(evaluate_status(54.0, 60.0, TargetType::Maximum), GoalStatus::Warning);
        assert_eq!(evaluate_status(53.9, 60.0, TargetType::Maximum), GoalStatus::Achieved);
    }

    #[test]
    fn display_percentage_is_capped() {
        assert_eq!(progress_percentage(50.0, 100.0), 50);
        assert_eq!(progress_percentage(100.0, 100.0), 100);
        assert_eq!(progress_percentage(200.0, 100.0), 150);
        assert_eq!(progress_percentage(1.4, 100.0), 1);
        assert_eq!(progress_percentage(0.0, 100.0), 0);
    }
}
