//! Backlink and tag discovery by scanning note content.
//!
//! Nothing here is cached. Every call reads the notes it needs from the store,
//! so results always reflect what is on disk at that moment.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::models::NoteId;
use crate::repository::NoteRepository;
use crate::storage::NoteStorage;

/// `#` followed by one or more word characters, with no boundary check:
/// `foo#bar` yields `#bar`.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("tag pattern is valid"));

static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[(\d+)\]\]").expect("link pattern is valid"));

/// A note that a fail-open scan could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: String,
}

/// Result of a scan over the store, with the files it had to skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scan<T> {
    pub items: T,
    pub skipped: Vec<SkippedFile>,
}

impl<T> Scan<T> {
    /// Discards the skip report.
    pub fn into_items(self) -> T {
        self.items
    }

    /// Returns true if every note was read.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Scans note content for `[[id]]` links and `#tag` tokens.
#[derive(Debug)]
pub struct LinkIndexer<'a, S: NoteStorage> {
    repo: &'a NoteRepository<S>,
}

impl<'a, S: NoteStorage> LinkIndexer<'a, S> {
    pub fn new(repo: &'a NoteRepository<S>) -> Self {
        Self { repo }
    }

    /// Visits every readable note in listing order.
    ///
    /// Unreadable notes are logged and collected instead of aborting the scan.
    /// Only a failure to list the store is returned as an error.
    pub(crate) fn for_each_note<F>(&self, mut visit: F) -> Result<Vec<SkippedFile>>
    where
        F: FnMut(&str, &str),
    {
        let mut skipped = Vec::new();
        for filename in self.repo.list()? {
            match self.repo.read(&filename) {
                Ok(content) => visit(&filename, &content),
                Err(e) => {
                    tracing::warn!(%filename, error = %e, "skipping unreadable note");
                    skipped.push(SkippedFile {
                        filename,
                        reason: e.to_string(),
                    });
                }
            }
        }
        if !skipped.is_empty() {
            tracing::warn!(count = skipped.len(), "scan skipped unreadable notes");
        }
        Ok(skipped)
    }

    /// Filenames of notes containing the exact token `[[id]]`, sorted by filename.
    ///
    /// A note linking to itself is included.
    pub fn find_backlinks(&self, id: NoteId) -> Result<Scan<Vec<String>>> {
        let token = id.link_token();
        let mut items = Vec::new();
        let skipped = self.for_each_note(|filename, content| {
            if content.contains(&token) {
                items.push(filename.to_string());
            }
        })?;
        items.sort();
        Ok(Scan { items, skipped })
    }

    /// All distinct `#tag` tokens across the store, case-sensitive and sorted.
    pub fn extract_tags(&self) -> Result<Scan<BTreeSet<String>>> {
        let mut items = BTreeSet::new();
        let skipped = self.for_each_note(|_, content| {
            items.extend(tags_in(content));
        })?;
        Ok(Scan { items, skipped })
    }
}

/// Distinct `#tag` tokens in one note's content.
///
/// ```
/// use zettel::indexer::tags_in;
///
/// let tags: Vec<_> = tags_in("#b then foo#a and #b again").into_iter().collect();
/// assert_eq!(tags, vec!["#a", "#b"]);
/// ```
pub fn tags_in(content: &str) -> BTreeSet<String> {
    TAG_PATTERN
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Distinct note IDs referenced by `[[id]]` tokens in one note's content.
///
/// ```
/// use zettel::indexer::links_in;
/// use zettel::NoteId;
///
/// let links = links_in("see [[12]], [[3]] and [[12]]; not [[ 4 ]]");
/// assert_eq!(links, vec![NoteId::new(3), NoteId::new(12)]);
/// ```
pub fn links_in(content: &str) -> Vec<NoteId> {
    LINK_PATTERN
        .captures_iter(content)
        .filter_map(|cap| cap[1].parse::<NoteId>().ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
