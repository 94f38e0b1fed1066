//! The "currently open note" context that front-ends work through.
//!
//! A front-end opens a note, lets the user edit it, and saves or deletes it.
//! Saving or deleting while nothing is open is an error rather than a no-op.

use crate::error::{NoteError, Result};
use crate::models::{NoteId, id_from_filename};
use crate::repository::{DeleteReport, NoteRepository};
use crate::storage::NoteStorage;

/// The note a session currently has open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenNote {
    pub id: NoteId,
    pub filename: String,
}

/// Editing session over a repository.
///
/// # Examples
///
/// ```
/// use zettel::{MemoryStorage, NoteError, NoteRepository, NoteSession};
///
/// # fn main() -> zettel::Result<()> {
/// let repo = NoteRepository::new(MemoryStorage::new())?;
/// let note = repo.create("Inbox")?;
///
/// let mut session = NoteSession::new(&repo);
/// assert!(matches!(session.save("text"), Err(NoteError::NoOpenNote)));
///
/// session.open(note.filename())?;
/// session.save("text")?;
/// assert_eq!(repo.read(note.filename())?, "text");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NoteSession<'a, S: NoteStorage> {
    repo: &'a NoteRepository<S>,
    current: Option<OpenNote>,
}

impl<'a, S: NoteStorage> NoteSession<'a, S> {
    /// Creates a session with no note open.
    pub fn new(repo: &'a NoteRepository<S>) -> Self {
        Self {
            repo,
            current: None,
        }
    }

    /// Opens a note by filename and returns its content.
    ///
    /// The previously open note stays open if this fails.
    pub fn open(&mut self, filename: &str) -> Result<String> {
        let id = id_from_filename(filename).ok_or_else(|| {
            NoteError::Validation(format!("Not a note filename: {filename}"))
        })?;
        let content = self.repo.read(filename)?;
        self.current = Some(OpenNote {
            id,
            filename: filename.to_string(),
        });
        Ok(content)
    }

    /// Opens the note with the given ID and returns its content.
    pub fn open_id(&mut self, id: NoteId) -> Result<String> {
        let filename = self.repo.find_by_id(id)?;
        self.open(&filename)
    }

    /// Returns the open note, if any.
    pub fn current(&self) -> Option<&OpenNote> {
        self.current.as_ref()
    }

    /// Writes `content` over the open note.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::NoOpenNote`] when no note is open.
    pub fn save(&self, content: &str) -> Result<()> {
        let open = self.current.as_ref().ok_or(NoteError::NoOpenNote)?;
        self.repo.save(&open.filename, content)
    }

    /// Deletes the open note with backlink cleanup and closes it.
    ///
    /// The session is closed whenever the file itself was removed, including
    /// when cleanup only partially succeeded.
    pub fn delete_current(&mut self) -> Result<DeleteReport> {
        let open = self.current.as_ref().ok_or(NoteError::NoOpenNote)?;
        let result = self.repo.delete(open.id, &open.filename);
        if matches!(result, Ok(_) | Err(NoteError::PartialFailure { .. })) {
            self.current = None;
        }
        result
    }

    /// Closes the open note without touching the store.
    pub fn close(&mut self) {
        self.current = None;
    }
}
