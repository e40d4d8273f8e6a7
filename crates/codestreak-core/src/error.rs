//! Core error types for codestreak-core.
//!
//! This module defines the error hierarchy using thiserror. Persistence
//! failures, configuration problems, command validation, and notification
//! delivery each get their own enum so callers can match on the class of
//! failure without string inspection.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for codestreak-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Activity-store persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Command validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Notification delivery errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Activity-store persistence errors.
///
/// A missing or unreadable data file at load time is deliberately NOT an
/// error: `JsonStore::load` substitutes an empty store (first-run
/// semantics). These variants cover failures on the write path, where data
/// loss would otherwise be silent.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to serialize the store document
    #[error("Failed to serialize activity store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write the store document
    #[error("Failed to write activity store to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to replace the store document with the freshly written one
    #[error("Failed to replace activity store at {path}: {source}")]
    ReplaceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is absent
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    /// Failed to load the settings file
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save the settings file
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to access the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Command validation errors.
///
/// Each variant maps to a user-facing denial: the operation aborts and no
/// state is mutated.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Goal must be a positive number of problems
    #[error("Goal must be greater than zero")]
    ZeroGoal,

    /// Adjustment of zero is a no-op and almost certainly a typo
    #[error("Adjustment amount must not be zero")]
    ZeroAdjustment,

    /// Command requires admin privileges
    #[error("You need admin privileges to use this command")]
    NotAdmin,

    /// Invalid value for a command argument
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Notification delivery errors.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// No usable channel or webhook for the group
    #[error("No delivery channel configured for group '{group}'")]
    NoChannel { group: String },

    /// The endpoint rejected the notification
    #[error("Delivery rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Transport-level failure
    #[error("Delivery transport failure: {0}")]
    Transport(String),

    /// Roster enumeration failure
    #[error("Failed to enumerate roster: {0}")]
    Roster(String),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Transport(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
