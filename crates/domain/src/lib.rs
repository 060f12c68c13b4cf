//! # Paceline Domain
//!
//! Business domain types and models for the goal engine.
//!
//! This crate contains:
//! - Goal, progress, session, and classification types
//! - Insight/report types consumed by the dashboard layer
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Paceline crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
