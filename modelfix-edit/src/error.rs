//! Error types for modelfix-edit.
//!
//! Nothing here escapes the applier: every error is folded into a
//! per-record [`Outcome`] so one bad record never stops the batch.

use modelfix_types::apply::Outcome;
use thiserror::Error;

/// Why a target path was refused before any filesystem access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsafePathError {
    #[error("empty target path")]
    Empty,

    #[error("absolute target path: {0}")]
    Absolute(String),

    #[error("drive-qualified target path: {0}")]
    DrivePrefix(String),

    #[error("target path escapes the repository: {0}")]
    Traversal(String),
}

/// A failed mutation of one record.
#[derive(Debug, Error)]
pub enum MutateError {
    #[error(transparent)]
    UnsafePath(#[from] UnsafePathError),

    /// The change inserts into an existing file and there is none.
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("cannot apply diff to missing file: {path}")]
    DiffTargetMissing { path: String },

    #[error("diff body has no separator line")]
    NoSeparator,

    #[error("diff body has an empty before-section")]
    EmptyBefore,

    /// The before-section is not present verbatim in the current content.
    #[error("before-text not found in {path}")]
    BeforeTextMissing { path: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MutateError {
    /// The outcome recorded for this failure.
    pub fn outcome(&self) -> Outcome {
        match self {
            MutateError::UnsafePath(_) => Outcome::SkippedUnsafe,
            MutateError::NotFound { .. } => Outcome::NotFound,
            MutateError::DiffTargetMissing { .. }
            | MutateError::NoSeparator
            | MutateError::EmptyBefore
            | MutateError::BeforeTextMissing { .. }
            | MutateError::Io(_) => Outcome::ParseFailed,
        }
    }
}
