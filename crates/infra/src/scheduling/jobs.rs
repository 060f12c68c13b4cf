//! Concrete rollover job wired to the goal service.

use std::sync::Arc;

use async_trait::async_trait;
use paceline_core::GoalService;
use tracing::info;

use super::rollover_scheduler::RolloverJob;
use crate::errors::InfraError;

/// Nightly job that closes out finished goal periods.
///
/// Backfilling instead of saving a single day makes the job resilient to
/// missed runs: any gap since the last persisted period end is covered.
pub struct ProgressRolloverJob {
    service: Arc<GoalService>,
}

impl ProgressRolloverJob {
    pub fn new(service: Arc<GoalService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RolloverJob for ProgressRolloverJob {
    async fn run(&self) -> Result<(), InfraError> {
        let summary = self.service.backfill_missing_progress().await?;
        info!(
            dates_processed = summary.dates_processed,
            records_saved = summary.records_saved,
            orphans_removed = summary.orphans_removed,
            "progress rollover complete"
        );
        Ok(())
    }
}
