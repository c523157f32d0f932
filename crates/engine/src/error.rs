//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when one or more input fields are malformed or out
//!   of range. Every offending field is reported, not only the first one.
//! - [`KeyNotFound`] thrown when a budget entry is not found.
//! - [`InvalidSettings`] thrown when the engine is configured with values it
//!   cannot work with.
//! - [`Export`] thrown when a CSV payload cannot be rendered.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidSettings`]: EngineError::InvalidSettings
//!  [`Export`]: EngineError::Export
use std::fmt;

use thiserror::Error;

/// A single rejected input field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIssue {
    /// Wire name of the field (camelCase, as sent by the client).
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Engine custom errors.
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("Invalid fields: {}", join_fields(.0))]
    Validation(Vec<FieldIssue>),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Export failed: {0}")]
    Export(String),
}

impl EngineError {
    /// Field names carried by a [`EngineError::Validation`], empty otherwise.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::Validation(issues) => issues.iter().map(|i| i.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_fields(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
