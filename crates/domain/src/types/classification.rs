//! Productivity classification types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{PacelineError, Result};

/// Productivity level attached to an app, either directly (override) or
/// inherited from its category. Apps without any classification default to
/// [`ProductivityLevel::Neutral`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductivityLevel {
    Productive,
    #[default]
    Neutral,
    Unproductive,
}

impl ProductivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Productive => "productive",
            Self::Neutral => "neutral",
            Self::Unproductive => "unproductive",
        }
    }
}

impl FromStr for ProductivityLevel {
    type Err = PacelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "productive" => Ok(Self::Productive),
            "neutral" => Ok(Self::Neutral),
            "unproductive" => Ok(Self::Unproductive),
            other => {
                Err(PacelineError::InvalidInput(format!("unknown productivity level: {other}")))
            }
        }
    }
}

impl fmt::Display for ProductivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
