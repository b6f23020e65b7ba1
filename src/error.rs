//! Error types for form validation, task submission and configuration.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a form cannot be turned into a task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyName,

    /// The due date field is empty.
    #[error("due date is required")]
    MissingDueDate,

    /// The due date is neither `yyyy-mm-dd` nor `mm/dd/yyyy`.
    #[error("invalid due date '{0}', expected yyyy-mm-dd or mm/dd/yyyy")]
    InvalidDueDate(String),
}

/// Reasons a submission leaves the task list unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("task '{name}' due {due_date} already exists")]
    Duplicate { name: String, due_date: NaiveDate },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown colour '{0}'")]
    Color(String),

    #[error("invalid date format '{0}'")]
    DateFormat(String),
}
