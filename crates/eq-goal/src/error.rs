// error.rs - Error types for goal tracking and persistence.
//
// Every failure is reported to the caller as a discrete variant. None of the
// operations that return these errors leave the tracker partially mutated.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, recording, or persisting goals.
#[derive(Debug, Error)]
pub enum GoalError {
    /// Bad construction parameters for a goal.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// No goal exists at the requested index.
    #[error("goal index {index} is out of range ({len} goal(s) tracked)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A persisted score or goal line could not be parsed.
    #[error("malformed goal data at line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// A persisted goal line carried a tag we don't know.
    #[error("unknown goal variant {tag:?} at line {line}")]
    UnknownVariant { line: usize, tag: String },

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize an event record.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The config file exists but is not valid TOML for our schema.
    #[error("invalid config at {path}: {source}")]
    ConfigError {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A notification dispatch failed (non-fatal).
    #[error("notification error: {0}")]
    NotificationError(String),
}

impl GoalError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        GoalError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        GoalError::Format {
            line,
            reason: reason.into(),
        }
    }
}
