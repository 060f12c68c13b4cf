//! SQLite-backed implementations of the core store ports.

mod classification_repository;
mod goal_repository;
mod manager;
mod progress_repository;
mod session_repository;

pub use classification_repository::SqliteClassificationStore;
pub use goal_repository::SqliteGoalStore;
pub use manager::{DbConnection, DbManager};
pub use progress_repository::SqliteProgressStore;
pub use session_repository::SqliteSessionStore;

use paceline_domain::PacelineError;

/// Map a blocking-task join failure into the domain error.
pub(crate) fn join_error(err: tokio::task::JoinError) -> PacelineError {
    PacelineError::Internal(format!("blocking task join failed: {err}"))
}
