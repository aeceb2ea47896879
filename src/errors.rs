//! Error types for the calnotes application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur during note management operations.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the calnotes application.
#[derive(Error, Debug)]
pub enum NotesError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: i64 },

    /// Note field failed validation (empty title/content, out-of-range values).
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// Invalid selector or value format (category, priority, sort key, time, date).
    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    /// Import payload could not be parsed as a note collection.
    #[error("Import failed: {message}")]
    ImportFailed { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },

    #[error("{message}")]
    EditorError { message: String },
}
