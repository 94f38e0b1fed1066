//! Note ID allocation.
//!
//! IDs are derived from the filenames already in the store: the next ID is
//! one past the largest numeric prefix. Deleted IDs leave gaps that are never
//! filled, so an ID is never handed out twice.

use crate::error::{NoteError, Result};
use crate::models::{NoteId, id_from_filename};
use crate::storage::NoteStorage;

/// Returns the next unused note ID for the given store.
pub fn next_id<S: NoteStorage + ?Sized>(storage: &S) -> Result<NoteId> {
    let files = storage.list_note_files()?;
    next_id_from(files.iter().map(String::as_str))
}

/// Computes the next ID from a set of filenames.
///
/// Filenames without a numeric prefix are skipped. Returns `1` when no
/// filename carries one.
///
/// # Examples
///
/// ```
/// use zettel::allocator::next_id_from;
/// use zettel::NoteId;
///
/// let next = next_id_from(["1_a.md", "2_b.md", "5_e.md", "readme.md"]).unwrap();
/// assert_eq!(next, NoteId::new(6));
///
/// assert_eq!(next_id_from(Vec::<&str>::new()).unwrap(), NoteId::new(1));
/// ```
pub fn next_id_from<'a, I>(filenames: I) -> Result<NoteId>
where
    I: IntoIterator<Item = &'a str>,
{
    match filenames.into_iter().filter_map(id_from_filename).max() {
        Some(max) => max
            .checked_next()
            .ok_or_else(|| NoteError::Validation(format!("No note ID available after {max}"))),
        None => Ok(NoteId::new(1)),
    }
}
