//! Filename conventions for note files: `{id}_{slug}.md`.

use super::NoteId;

/// Extension every note file carries.
pub const NOTE_EXTENSION: &str = ".md";

/// Maximum number of characters kept from a title when building its slug.
pub const SLUG_MAX_CHARS: usize = 30;

const ILLEGAL_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Derives the filename slug for a title.
///
/// Words are split on whitespace and joined with `_`, characters that are not
/// allowed in filenames are escaped to `-`, and the result is cut to
/// [`SLUG_MAX_CHARS`] characters.
///
/// # Examples
///
/// ```
/// use zettel::models::slugify;
///
/// assert_eq!(slugify("  Hello   world "), "Hello_world");
/// assert_eq!(slugify("a/b: c?"), "a-b-_c-");
/// ```
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) || c.is_control() {
                '-'
            } else {
                c
            }
        })
        .take(SLUG_MAX_CHARS)
        .collect()
}

/// Builds the filename a note with this ID and title is stored under.
///
/// ```
/// use zettel::models::generate_filename;
/// use zettel::NoteId;
///
/// assert_eq!(generate_filename(NoteId::new(3), "Reading list"), "3_Reading_list.md");
/// ```
pub fn generate_filename(id: NoteId, title: &str) -> String {
    format!("{id}_{}{NOTE_EXTENSION}", slugify(title))
}

/// Extracts the note ID from the part of a filename before the first `_`.
///
/// Returns `None` unless that prefix is a canonical decimal integer: ASCII
/// digits only, with no sign and no leading zeros. A stray `007_x.md` is
/// therefore not note 7.
pub fn id_from_filename(filename: &str) -> Option<NoteId> {
    let prefix = filename.split('_').next()?;
    let canonical = !prefix.is_empty()
        && prefix.bytes().all(|b| b.is_ascii_digit())
        && (prefix == "0" || !prefix.starts_with('0'));
    if !canonical {
        return None;
    }
    prefix.parse().ok()
}

/// Returns true if the name follows the note file convention.
pub fn is_note_filename(name: &str) -> bool {
    name.ends_with(NOTE_EXTENSION) && !name.starts_with('.')
}
