//! Error taxonomy shared by the comparison and cleanup engines.
//!
//! Parsing problems are not fatal: they are collected as [`MalformedLine`]
//! values next to whatever could be parsed. Everything else aborts only the
//! single operation that raised it.

use std::path::PathBuf;

use serde::Serialize;

use crate::cleanup::validate::Violation;

pub type Result<T> = std::result::Result<T, Error>;

/// One input line that could not be classified or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedLine {
    /// 1-based line number in the source text
    pub line: usize,
    pub raw: String,
    pub reason: &'static str,
}

impl std::fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.reason, self.raw)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{what} unavailable: {reason}")]
    SourceUnavailable { what: String, reason: String },

    #[error("malformed {0}")]
    MalformedLine(MalformedLine),

    #[error("unknown setting '{0}'")]
    UnknownKey(String),

    #[error("invalid value {value:?} for {key}: {violation}")]
    ValidationFailed {
        key: String,
        value: String,
        violation: Violation,
    },

    #[error("page {index} out of range ({pages} page(s) available)")]
    OutOfRange { index: i64, pages: usize },

    #[error("cannot write {key}: expected exactly one active assignment, found {found}")]
    WriteConflict { key: String, found: usize },

    #[error("snapshot {0} not found")]
    UnknownSnapshot(u32),

    #[error("invalid settings file {}: {reason}", .path.display())]
    Settings { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn io(what: impl Into<String>, err: std::io::Error) -> Self {
        Error::SourceUnavailable {
            what: what.into(),
            reason: err.to_string(),
        }
    }
}
