use std::cmp::Ordering;
use std::path::PathBuf;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::allocator;
use crate::error::{CleanupFailure, NoteError, Result};
use crate::models::{Note, NoteBuilder, NoteId, generate_filename, id_from_filename};
use crate::storage::{FsStorage, NoteStorage};

/// Repository providing note management operations over a flat file store.
///
/// NoteRepository owns a storage backend and composes it with the ID
/// allocator. It is UI-independent: the CLI and any other front-end reach
/// notes only through these methods and the query engine.
///
/// # Examples
///
/// ```
/// use zettel::{MemoryStorage, NoteRepository};
///
/// # fn main() -> zettel::Result<()> {
/// let repo = NoteRepository::new(MemoryStorage::new())?;
/// let note = repo.create("First thoughts")?;
/// assert_eq!(note.filename(), "1_First_thoughts.md");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NoteRepository<S = FsStorage> {
    storage: S,
}

/// Outcome of a delete whose backlink cleanup finished on every file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    /// Filename of the removed note.
    pub deleted: String,
    /// Notes whose `[[id]]` tokens were replaced, in filename order.
    pub rewritten: Vec<String>,
}

impl NoteRepository<FsStorage> {
    /// Opens (and creates if needed) a directory-backed store.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(FsStorage::new(dir))
    }
}

impl<S: NoteStorage> NoteRepository<S> {
    /// Creates a repository over the given storage, ensuring the store exists.
    pub fn new(storage: S) -> Result<Self> {
        storage.ensure_store_exists()?;
        Ok(Self { storage })
    }

    /// Returns a reference to the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Creates a new note with a templated body.
    ///
    /// Allocates the next ID, derives the filename from the title and writes
    /// a body holding the title heading, the ID, the creation time and a short
    /// reminder of the link and tag syntax.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Validation`] if the title is empty or whitespace-only.
    pub fn create(&self, title: &str) -> Result<Note> {
        if title.trim().is_empty() {
            return Err(NoteError::Validation(
                "Note title cannot be empty".to_string(),
            ));
        }

        let id = allocator::next_id(&self.storage)?;
        let filename = generate_filename(id, title);
        let created_at = OffsetDateTime::now_utc();
        let content = render_template(title, id, &created_at.format(&Rfc3339)?);

        self.storage.write_note(&filename, &content)?;
        tracing::debug!(%id, %filename, "created note");

        Ok(NoteBuilder::new()
            .id(id)
            .title(title)
            .filename(filename)
            .content(content)
            .created_at(created_at)
            .build())
    }

    /// Reads a note's content.
    pub fn read(&self, filename: &str) -> Result<String> {
        self.storage.read_note(filename)
    }

    /// Overwrites the entire content of an existing note.
    ///
    /// Only [`create`](Self::create) brings new notes into the store.
    ///
    /// # Errors
    ///
    /// - [`NoteError::Validation`] if the filename carries no note ID.
    /// - [`NoteError::NotFound`] if no note with this filename exists.
    /// - The storage error if the write fails.
    pub fn save(&self, filename: &str, content: &str) -> Result<()> {
        if id_from_filename(filename).is_none() {
            return Err(NoteError::Validation(format!(
                "Not a note filename: {filename}"
            )));
        }
        if !self.storage.note_exists(filename)? {
            return Err(NoteError::NotFound(filename.to_string()));
        }
        self.storage.write_note(filename, content)?;
        tracing::debug!(%filename, bytes = content.len(), "saved note");
        Ok(())
    }

    /// Deletes a note, then rewrites every other note that links to it.
    ///
    /// Each `[[id]]` in the remaining notes becomes `(deleted note id)`.
    /// Cleanup is best effort: a failure on one file does not stop the others,
    /// and files already rewritten stay rewritten.
    ///
    /// # Errors
    ///
    /// - [`NoteError::Validation`] if `filename` does not start with `id`.
    /// - [`NoteError::NotFound`] if the note does not exist; nothing is changed.
    /// - [`NoteError::PartialFailure`] if the note was removed but some
    ///   referencing notes could not be rewritten.
    pub fn delete(&self, id: NoteId, filename: &str) -> Result<DeleteReport> {
        if id_from_filename(filename) != Some(id) {
            return Err(NoteError::Validation(format!(
                "Filename {filename} does not belong to note {id}"
            )));
        }

        self.storage.delete_note(filename)?;

        let token = id.link_token();
        let placeholder = id.deleted_placeholder();
        let mut cleaned = Vec::new();
        let mut failed = Vec::new();

        let mut others = match self.storage.list_note_files() {
            Ok(files) => files,
            Err(e) => {
                failed.push(CleanupFailure {
                    filename: "(note listing)".to_string(),
                    reason: e.to_string(),
                });
                Vec::new()
            }
        };
        others.sort();

        for other in others.iter().filter(|f| f.as_str() != filename) {
            let content = match self.storage.read_note(other) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(filename = %other, error = %e, "cannot read note during backlink cleanup");
                    failed.push(CleanupFailure {
                        filename: other.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !content.contains(&token) {
                continue;
            }

            match self
                .storage
                .write_note(other, &content.replace(&token, &placeholder))
            {
                Ok(()) => cleaned.push(other.clone()),
                Err(e) => {
                    tracing::warn!(filename = %other, error = %e, "cannot rewrite backlink");
                    failed.push(CleanupFailure {
                        filename: other.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            %id,
            %filename,
            rewritten = cleaned.len(),
            failed = failed.len(),
            "deleted note"
        );

        if failed.is_empty() {
            Ok(DeleteReport {
                deleted: filename.to_string(),
                rewritten: cleaned,
            })
        } else {
            Err(NoteError::PartialFailure {
                deleted: filename.to_string(),
                cleaned,
                failed,
            })
        }
    }

    /// Lists note filenames in ascending numeric ID order.
    ///
    /// Files whose prefix is not a number come last, by filename.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut files = self.storage.list_note_files()?;
        sort_by_id(&mut files);
        Ok(files)
    }

    /// Resolves the filename of the note with the given ID.
    pub fn find_by_id(&self, id: NoteId) -> Result<String> {
        self.storage
            .list_note_files()?
            .into_iter()
            .filter(|f| id_from_filename(f) == Some(id))
            .min()
            .ok_or_else(|| NoteError::NotFound(format!("note {id}")))
    }
}

/// Sorts filenames by numeric ID; unnumbered files go last, by name.
pub(crate) fn sort_by_id(files: &mut [String]) {
    files.sort_by(|a, b| match (id_from_filename(a), id_from_filename(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    });
}

fn render_template(title: &str, id: NoteId, created: &str) -> String {
    format!(
        "# {title}\n\n\
         ID: {id}\n\
         Created: {created}\n\n\
         Links: Use [[note_id]] to reference another note.\n\
         Tags: Add with #example\n"
    )
}
