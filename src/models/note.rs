use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::NoteId;

/// A note with its on-disk identity and content.
///
/// The filename is fixed when the note is created and never follows later
/// edits to the title line inside the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, equal to the filename prefix.
    pub id: NoteId,
    /// The title the note was created with.
    pub title: String,
    /// Filename inside the store, `{id}_{slug}.md`.
    pub filename: String,
    /// The note's full raw text.
    pub content: String,
    /// When this note was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Note {
    /// Returns the note's ID.
    pub fn id(&self) -> NoteId {
        self.id
    }

    /// Returns the note's filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the note's content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Builder for constructing `Note` instances with optional fields.
///
/// # Examples
///
/// ```
/// use zettel::{NoteBuilder, NoteId};
///
/// let note = NoteBuilder::new()
///     .id(NoteId::new(1))
///     .filename("1_First.md")
///     .content("My first note")
///     .build();
///
/// assert_eq!(note.id.get(), 1);
/// assert_eq!(note.content, "My first note");
/// assert!(note.title.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct NoteBuilder {
    id: Option<NoteId>,
    title: Option<String>,
    filename: Option<String>,
    content: Option<String>,
    created_at: Option<OffsetDateTime>,
}

impl NoteBuilder {
    /// Creates a new `NoteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note ID.
    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the note title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the filename.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the note content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the created timestamp.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the `Note`, using defaults for optional fields.
    ///
    /// # Panics
    ///
    /// Panics if `id` or `filename` have not been set.
    pub fn build(self) -> Note {
        Note {
            id: self.id.expect("id is required"),
            title: self.title.unwrap_or_default(),
            filename: self.filename.expect("filename is required"),
            content: self.content.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(OffsetDateTime::now_utc),
        }
    }
}
