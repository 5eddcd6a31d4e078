//! SQL statement classification module.
//!
//! Parses raw SQL text and classifies it by statement kind so that the
//! execution layer only ever sees single, read-only SELECT statements.

mod parser;

pub use parser::{classify_sql, SqlClassifier};

use std::fmt;

/// The kind of SQL statement detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// A read-only SELECT, including `WITH ... SELECT` with read-only CTEs.
    Select,
    Insert,
    Update,
    Delete,
    /// Schema or privilege changes (CREATE, DROP, ALTER, TRUNCATE, GRANT, ...).
    Ddl,
    /// Any other statement kind (CALL, SET, COPY, transaction control, ...).
    Other,
    /// More than one statement in a single input.
    Multi,
}

impl StatementKind {
    /// Returns true if statements of this kind may be executed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Select)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Ddl => write!(f, "DDL"),
            Self::Other => write!(f, "unrecognized"),
            Self::Multi => write!(f, "multi-statement"),
        }
    }
}

/// A classified, normalized SQL statement.
///
/// Only produced for accepted input: the normalized text is guaranteed to be
/// a single read-only SELECT with comments stripped and whitespace canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    raw: String,
    kind: StatementKind,
    normalized: String,
}

impl SqlStatement {
    pub(crate) fn new(raw: impl Into<String>, kind: StatementKind, normalized: String) -> Self {
        Self {
            raw: raw.into(),
            kind,
            normalized,
        }
    }

    /// The original text as supplied by the caller.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The classified statement kind.
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// The normalized single-statement text that will be executed.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized)
    }
}
