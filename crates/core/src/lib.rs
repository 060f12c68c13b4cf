//! # Paceline Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The goal evaluation engine (periods, progress, status, streaks)
//! - Port/adapter interfaces (traits) for the session, classification,
//!   and record stores
//! - The `GoalService` facade consumed by the UI and export layers
//!
//! ## Architecture Principles
//! - Only depends on `paceline-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod goals;

// Re-export specific items to avoid ambiguity
pub use goals::calculator::ProgressCalculator;
pub use goals::period::{local_period_bounds, period_for_goal, resolve_period};
pub use goals::ports::{ClassificationStore, GoalStore, ProgressStore, SessionStore};
pub use goals::schedule::is_due;
pub use goals::status::{evaluate_status, progress_percentage};
pub use goals::GoalService;
