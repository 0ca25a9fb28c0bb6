//! Error types for an extraction run.
//!
//! Every failure is terminal for the run. Each error kind is a standalone
//! struct carrying the information needed by:
//! - Display: a one-line message (used when errors travel through `anyhow`)
//! - Report: the CLI's cargo-style diagnostic with location and hint

use std::io;

use enum_dispatch::enum_dispatch;
use thiserror::Error;

// ============================================================
// Error Kind
// ============================================================

/// Identifier for each error kind, shown as `error[<kind>]` by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    DuplicateTemplate,
    ParseFailure,
    InvalidMessage,
    IoFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::MalformedInput => write!(f, "malformed-input"),
            ErrorKind::DuplicateTemplate => write!(f, "duplicate-template"),
            ErrorKind::ParseFailure => write!(f, "parse-failure"),
            ErrorKind::InvalidMessage => write!(f, "invalid-message"),
            ErrorKind::IoFailure => write!(f, "io-failure"),
        }
    }
}

// ============================================================
// Error Types
// ============================================================

/// File does not start with a namespace declaration (or is empty).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}: {reason}")]
pub struct MalformedInputError {
    pub file: String,
    pub reason: String,
}

/// Two templates resolve to the same `namespace.name`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}: template '{name}' is already defined in {first_file}")]
pub struct DuplicateTemplateError {
    /// Qualified template name.
    pub name: String,
    /// File that tried to register the template again.
    pub file: String,
    /// File holding the registration that was kept.
    pub first_file: String,
}

/// Template source could not be tokenized or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}:{col}: {message}")]
pub struct ParseError {
    pub file: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub col: usize,
    pub message: String,
    /// The offending source line, for snippet display.
    pub source_line: String,
}

/// A message that cannot be represented in the catalog, or whose id could
/// not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}: invalid message in template '{template}': {reason}")]
pub struct InvalidMessageError {
    pub template: String,
    pub file: String,
    pub line: usize,
    pub reason: String,
}

/// Reading, walking or writing files failed.
#[derive(Debug, Error)]
#[error("{path}: {source}")]
pub struct IoFailureError {
    pub path: String,
    pub source: io::Error,
}

impl IoFailureError {
    pub fn new(path: impl Into<String>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Failure reported by the message algorithms (id computation, validation).
///
/// Carries no location; the passes attach one when converting it into
/// an [`InvalidMessageError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct MessageError {
    pub reason: String,
}

impl MessageError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ============================================================
// Error Enum
// ============================================================

/// Any error that aborts an extraction run.
#[enum_dispatch(Report)]
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    MalformedInput(MalformedInputError),
    #[error(transparent)]
    DuplicateTemplate(DuplicateTemplateError),
    #[error(transparent)]
    ParseFailure(ParseError),
    #[error(transparent)]
    InvalidMessage(InvalidMessageError),
    #[error(transparent)]
    IoFailure(IoFailureError),
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Exact position with the source line for snippet display.
    Source {
        file: &'a str,
        line: usize,
        col: usize,
        source_line: &'a str,
    },
    /// Line-level position without source text.
    Line { file: &'a str, line: usize },
    /// File-level only.
    File { path: &'a str },
}

/// Trait for errors that can be reported to the CLI.
///
/// Uses `enum_dispatch` for zero-cost dispatch on the `ExtractError` enum.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message, without location.
    fn message(&self) -> String;

    fn kind(&self) -> ErrorKind;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }

    /// Optional hint for fixing the error.
    fn hint(&self) -> Option<&str> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for MalformedInputError {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File { path: &self.file }
    }

    fn message(&self) -> String {
        self.reason.clone()
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedInput
    }

    fn hint(&self) -> Option<&str> {
        Some("start the file with a {namespace ...} declaration")
    }
}

impl Report for DuplicateTemplateError {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File { path: &self.file }
    }

    fn message(&self) -> String {
        format!("template '{}' is defined more than once", self.name)
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::DuplicateTemplate
    }

    fn details(&self) -> Option<String> {
        Some(format!("first defined in {}", self.first_file))
    }
}

impl Report for ParseError {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source {
            file: &self.file,
            line: self.line,
            col: self.col,
            source_line: &self.source_line,
        }
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::ParseFailure
    }
}

impl Report for InvalidMessageError {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Line {
            file: &self.file,
            line: self.line,
        }
    }

    fn message(&self) -> String {
        self.reason.clone()
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidMessage
    }

    fn details(&self) -> Option<String> {
        Some(format!("in template '{}'", self.template))
    }
}

impl Report for IoFailureError {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File { path: &self.path }
    }

    fn message(&self) -> String {
        self.source.to_string()
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::IoFailure
    }
}
