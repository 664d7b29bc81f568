use serde::{Deserialize, Serialize};

use crate::types::Span;

/// Errors from caller-facing conversions.
///
/// Formatting itself never fails; problems with the input are reported as
/// [`Diagnostic`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Unknown text variant '{0}' (expected body1, body2 or caption)")]
    UnknownVariant(String),
}

/// A diagnostic message produced while formatting or checking text.
///
/// Diagnostics are non-fatal: the formatter always produces a best-effort
/// result even when diagnostics are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    /// `true` for the diagnostic raised when the input was not text at all.
    pub fn is_invalid_input(&self) -> bool {
        self.code.as_deref() == Some(INVALID_INPUT)
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Code of the diagnostic raised for non-string input.
pub const INVALID_INPUT: &str = "F001";
