//! Error types
//!
//! Two kinds of failure reach the user:
//! - `FetchError`: anything that went wrong talking to the remote store
//! - `ValidationError`: a required field was left empty
//!
//! `RowError` reports misuse of the per-row edit state machine and never
//! leaves the controller.

use std::fmt;

use thiserror::Error;

use crate::rows::RowId;

/// Remote store operation that produced a `FetchError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list contacts",
            Operation::Create => "create contact",
            Operation::Update => "update contact",
            Operation::Remove => "delete contact",
        };
        f.write_str(name)
    }
}

/// A failed round trip to the remote store
///
/// Transport failures, non-success statuses and undecodable bodies all
/// collapse into this one kind. `operation` and `details` only feed the
/// diagnostic log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to {operation}: {details}")]
pub struct FetchError {
    pub operation: Operation,
    pub details: String,
}

impl FetchError {
    pub fn new(operation: Operation, details: impl Into<String>) -> Self {
        Self {
            operation,
            details: details.into(),
        }
    }

    /// Wrap a reqwest error
    pub fn from_reqwest(operation: Operation, error: reqwest::Error) -> Self {
        Self::new(operation, error.to_string())
    }
}

/// A required field was empty after trimming
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter both name and phone number")]
    MissingFields { name: bool, phone: bool },
}

/// Misuse of the row edit state machine
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    #[error("No row with id {0}")]
    UnknownRow(RowId),

    #[error("Row {0} is already being edited")]
    AlreadyEditing(RowId),

    #[error("Row {0} is not being edited")]
    NotEditing(RowId),
}
