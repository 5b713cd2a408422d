//! Error types for sched.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in sched-core operations.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not parse server payload: {0}")]
    Payload(String),

    #[error("Invalid timestamp '{value}': expected {expected}")]
    InvalidTimestamp { value: String, expected: &'static str },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("No event is open")]
    NoEventOpen,

    #[error("No event at position {0}")]
    EventNotFound(usize),

    #[error("The new-event form is not open")]
    FormClosed,

    #[error("'{file}' is not an accepted {kind} file (accepted: {accepted})")]
    UnsupportedFile {
        file: String,
        kind: &'static str,
        accepted: String,
    },

    #[error("Not a file: {0}")]
    NotAFile(PathBuf),

    #[error("No {0} file selected")]
    NoFileSelected(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sched-core operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
