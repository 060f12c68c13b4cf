//! Cron-based scheduling for the nightly progress rollover.

mod error;
mod jobs;
mod rollover_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use jobs::ProgressRolloverJob;
pub use rollover_scheduler::{RolloverJob, RolloverScheduler, RolloverSchedulerConfig};
