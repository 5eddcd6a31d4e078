//! Error types for Warden.
//!
//! Defines the closed error enum used throughout the crate. Every failure a
//! caller can observe maps to exactly one variant, so callers can distinguish
//! "your SQL was rejected" from "the database is unreachable" without string
//! matching.

use thiserror::Error;

use crate::classify::StatementKind;

/// Main error type for Warden operations.
#[derive(Error, Debug)]
pub enum WardenError {
    /// Input that could not be classified: empty, comment-only, or unparseable.
    #[error("Malformed SQL: {0}")]
    Malformed(String),

    /// A parsed statement whose kind is not a read-only SELECT.
    #[error("Forbidden {kind} statement: {message}")]
    Forbidden {
        kind: StatementKind,
        message: String,
    },

    /// More than one statement in a single input. Batches are rejected even
    /// when every member is a SELECT.
    #[error("Multiple statements not allowed (found {count})")]
    MultipleStatements { count: usize },

    /// Database-level failure while running a permitted query.
    #[error("Execution error: {0}")]
    Execution(String),

    /// The guard's own deadline elapsed before the query finished.
    #[error("Query timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Query vector length does not match the index's embedding dimension.
    #[error("Embedding dimension mismatch: index holds {expected}-dimensional vectors, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WardenError {
    /// Creates a malformed-input error with the given message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Creates a forbidden-statement error for the given kind.
    pub fn forbidden(kind: StatementKind, msg: impl Into<String>) -> Self {
        Self::Forbidden {
            kind,
            message: msg.into(),
        }
    }

    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true for errors raised by validation, before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_) | Self::Forbidden { .. } | Self::MultipleStatements { .. }
        )
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "Malformed SQL",
            Self::Forbidden { .. } => "Forbidden Statement",
            Self::MultipleStatements { .. } => "Multiple Statements",
            Self::Execution(_) => "Execution Error",
            Self::Timeout { .. } => "Timeout",
            Self::DimensionMismatch { .. } => "Dimension Mismatch",
            Self::Connection(_) => "Connection Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using WardenError.
pub type Result<T> = std::result::Result<T, WardenError>;
