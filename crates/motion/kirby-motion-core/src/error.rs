//! Error types for the motion controller.
//!
//! Motion logic itself is total: dropped triggers and missing clips are not
//! errors. These variants only cover configuration coming from the host.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionError {
    /// Configuration JSON could not be parsed
    #[error("Config parse error: {reason}")]
    ConfigParse { reason: String },

    /// A configuration value is outside its accepted range
    #[error("Invalid parameter {field} = {value}: {reason}")]
    InvalidParameter {
        field: String,
        value: f32,
        reason: String,
    },

    /// Generic motion error
    #[error("Motion error: {message}")]
    Generic { message: String },
}

impl MotionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    pub(crate) fn invalid(field: &str, value: f32, reason: &str) -> Self {
        Self::InvalidParameter {
            field: field.to_string(),
            value,
            reason: reason.to_string(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ConfigParse { .. } => "serialization",
            Self::InvalidParameter { .. } => "validation",
            Self::Generic { .. } => "generic",
        }
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse {
            reason: err.to_string(),
        }
    }
}
