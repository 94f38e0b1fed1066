//! Error taxonomy for the note index engine.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Errors produced by storage, allocation, repository and query operations.
#[derive(Debug, Error)]
pub enum NoteError {
    /// Bad input, such as an empty title or a filename with path separators.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced note or file does not exist.
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Filesystem failure while reading, writing, listing or removing.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `save` was requested while no note is open in the session.
    #[error("No note is open")]
    NoOpenNote,

    /// The note was deleted but rewriting its backlinks did not finish.
    #[error(
        "Deleted {deleted} but backlink cleanup failed for {count} file(s)",
        count = .failed.len()
    )]
    PartialFailure {
        deleted: String,
        cleaned: Vec<String>,
        failed: Vec<CleanupFailure>,
    },

    /// The creation timestamp could not be rendered.
    #[error("Timestamp formatting error: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl NoteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        NoteError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by the caller's input rather than the store.
    ///
    /// ```
    /// use zettel::NoteError;
    ///
    /// assert!(NoteError::NoOpenNote.is_user_error());
    /// assert!(NoteError::NotFound("3_x.md".into()).is_user_error());
    /// ```
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            NoteError::Validation(_) | NoteError::NotFound(_) | NoteError::NoOpenNote
        )
    }
}

/// One file that backlink cleanup could not rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupFailure {
    /// Filename of the note that still references the deleted ID.
    pub filename: String,
    /// Rendered cause of the failure.
    pub reason: String,
}
