//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Paceline
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PacelineError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Paceline operations
pub type Result<T> = std::result::Result<T, PacelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_serialize_with_a_stable_tag() {
        let err = PacelineError::NotFound("goal not found: 7".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "NotFound");
        assert_eq!(json["message"], "goal not found: 7");
    }

    #[test]
    fn display_includes_the_detail() {
        let err = PacelineError::InvalidInput("bad weekday".into());
        assert_eq!(err.to_string(), "Invalid input: bad weekday");
    }
}
