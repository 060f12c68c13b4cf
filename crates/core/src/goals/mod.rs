//! Goal progress and streak evaluation engine.
//!
//! Dependency order, leaves first: [`period`] resolves evaluation windows,
//! [`calculator`] aggregates session data over a window, [`status`] turns a
//! value and target into a status, [`schedule`] decides which goals are due
//! on a date, [`streak`] walks dates backward over all of the above, and
//! [`service`] ties everything to the persistence ports.

pub mod calculator;
pub mod period;
pub mod ports;
pub mod schedule;
pub mod service;
pub mod status;
pub mod streak;
pub mod templates;

pub use service::GoalService;
