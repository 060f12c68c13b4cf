//! # Paceline Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite-backed stores for goals, progress, sessions and classification
//! - The nightly rollover scheduler
//!
//! ## Architecture
//! - Implements traits defined in `paceline-core`
//! - Depends on `paceline-domain` and `paceline-core`
//! - Contains all "impure" code (I/O, clocks, cron)

pub mod database;
pub mod errors;
pub mod scheduling;

pub use database::{
    DbManager, SqliteClassificationStore, SqliteGoalStore, SqliteProgressStore, SqliteSessionStore,
};
pub use errors::InfraError;
