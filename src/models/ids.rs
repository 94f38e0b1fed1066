use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a note.
///
/// The decimal form of the ID is the prefix of the note's filename, which is
/// the only place the ID is authoritatively stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    /// Creates a new note ID.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying ID value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns the ID that follows this one, or `None` at the end of the range.
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// The inline token other notes use to reference this one, e.g. `[[12]]`.
    pub fn link_token(self) -> String {
        format!("[[{}]]", self.0)
    }

    /// Text that replaces [`link_token`](Self::link_token) once the note is deleted.
    pub fn deleted_placeholder(self) -> String {
        format!("(deleted note {})", self.0)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}
