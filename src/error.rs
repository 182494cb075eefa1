// src/error.rs

use thiserror::Error;

/// Core error types for Galley
#[derive(Error, Debug)]
pub enum Error {
    /// A required metadata field was absent (or blank) at render time
    #[error("Missing metadata field: {0}")]
    MissingField(String),

    /// The recipe version does not parse as a semver version
    #[error("Invalid version '{value}': {source}")]
    InvalidVersion {
        value: String,
        source: semver::Error,
    },

    /// A run requirement constraint does not parse as a semver requirement
    #[error("Invalid constraint '{constraint}' for dependency '{name}': {source}")]
    InvalidConstraint {
        name: String,
        constraint: String,
        source: semver::Error,
    },

    /// A dependency name appears more than once within a set
    #[error("Duplicate dependency: {0}")]
    DuplicateDependency(String),

    /// A declared verification command is blank
    #[error("Verification command is empty")]
    EmptyCommand,

    /// Staged environment directory does not exist
    #[error("Staged environment not found at path: {0}")]
    StagedEnvNotFound(String),

    /// A verification command exited non-zero (127 = command not found)
    #[error("Verification failed: '{command}' exited with code {exit_code}")]
    VerificationFailed { command: String, exit_code: i32 },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using Galley's Error type
pub type Result<T> = std::result::Result<T, Error>;
