//! Read-only queries over the note set.
//!
//! Results are filenames in ascending numeric ID order, except backlinks,
//! which come back sorted by filename.

use std::collections::BTreeSet;

use crate::error::{NoteError, Result};
use crate::indexer::{LinkIndexer, Scan, links_in};
use crate::models::NoteId;
use crate::repository::NoteRepository;
use crate::storage::NoteStorage;

/// Answers list, search, tag and backlink queries.
///
/// # Examples
///
/// ```
/// use zettel::{MemoryStorage, NoteRepository, QueryEngine};
///
/// # fn main() -> zettel::Result<()> {
/// let repo = NoteRepository::new(MemoryStorage::new())?;
/// let note = repo.create("Zettelkasten basics")?;
/// repo.save(note.filename(), "all about #method")?;
///
/// let query = QueryEngine::new(&repo);
/// assert_eq!(query.search("ZETTEL")?.items, vec![note.filename().to_string()]);
/// assert_eq!(query.filter_by_tag("method")?.items.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueryEngine<'a, S: NoteStorage> {
    repo: &'a NoteRepository<S>,
    indexer: LinkIndexer<'a, S>,
}

impl<'a, S: NoteStorage> QueryEngine<'a, S> {
    pub fn new(repo: &'a NoteRepository<S>) -> Self {
        Self {
            repo,
            indexer: LinkIndexer::new(repo),
        }
    }

    /// Every note filename, by numeric ID.
    pub fn list_all(&self) -> Result<Vec<String>> {
        self.repo.list()
    }

    /// Notes whose filename or content contains `keyword`, ignoring case.
    ///
    /// A blank keyword returns every note. Notes that cannot be read are left
    /// out of the results and listed in [`Scan::skipped`].
    pub fn search(&self, keyword: &str) -> Result<Scan<Vec<String>>> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Ok(Scan {
                items: self.list_all()?,
                skipped: Vec::new(),
            });
        }

        self.matching(|filename, content| {
            filename.to_lowercase().contains(&keyword) || content.to_lowercase().contains(&keyword)
        })
    }

    /// Notes whose content contains the tag, `#` included, as a literal substring.
    ///
    /// A tag given without its leading `#` has one added.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Validation`] for an empty tag.
    pub fn filter_by_tag(&self, tag: &str) -> Result<Scan<Vec<String>>> {
        let tag = tag.trim();
        if tag.trim_start_matches('#').is_empty() {
            return Err(NoteError::Validation("Tag cannot be empty".to_string()));
        }
        let tag = if tag.starts_with('#') {
            tag.to_string()
        } else {
            format!("#{tag}")
        };

        self.matching(|_, content| content.contains(&tag))
    }

    /// Notes linking to `id` through an exact `[[id]]` token.
    pub fn find_backlinks(&self, id: NoteId) -> Result<Scan<Vec<String>>> {
        self.indexer.find_backlinks(id)
    }

    /// Every distinct tag in the store.
    pub fn extract_tags(&self) -> Result<Scan<BTreeSet<String>>> {
        self.indexer.extract_tags()
    }

    /// IDs this note links to, ascending. Targets that no longer exist are kept.
    pub fn links_from(&self, filename: &str) -> Result<Vec<NoteId>> {
        Ok(links_in(&self.repo.read(filename)?))
    }

    fn matching<F>(&self, mut predicate: F) -> Result<Scan<Vec<String>>>
    where
        F: FnMut(&str, &str) -> bool,
    {
        let mut items = Vec::new();
        let skipped = self.indexer.for_each_note(|filename, content| {
            if predicate(filename, content) {
                items.push(filename.to_string());
            }
        })?;
        Ok(Scan { items, skipped })
    }
}
