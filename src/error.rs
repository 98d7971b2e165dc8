//! Typed errors for loading, layout validation and table parsing.

use std::path::PathBuf;

/// Fatal failures while loading an event source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open event source {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read header of {}: source is empty", path.display())]
    MissingHeader { path: PathBuf },
}

/// Rejected field layout or delimiter configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("{what} must be exactly one character, got {value:?}")]
    NotOneChar { what: &'static str, value: String },

    #[error("{0:?} cannot be used as a field delimiter")]
    ReservedDelimiter(char),

    #[error("field index {index} is used for both {first} and {second}")]
    SharedIndex {
        index: usize,
        first: &'static str,
        second: &'static str,
    },
}

/// Why a single record was skipped. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("empty timestamp")]
    MissingTimestamp,

    #[error("invalid date: {0}")]
    InvalidTimestamp(String),

    #[error("invalid kind_id: {0}")]
    InvalidCategory(String),

    #[error("invalid run id: {0}")]
    InvalidRunId(String),

    #[error("expected at least {expected} fields, got {got}")]
    TooFewFields { expected: usize, got: usize },
}

/// Malformed table artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("line {line}: expected {expected} fields, got {got}")]
    Ragged {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: count {value:?} for {from} -> {to} is not a non-negative integer")]
    BadCount {
        line: usize,
        from: String,
        to: String,
        value: String,
    },
}
