mod filename;
mod ids;
mod note;

pub use filename::{
    NOTE_EXTENSION, SLUG_MAX_CHARS, generate_filename, id_from_filename, is_note_filename,
    slugify,
};
pub use ids::NoteId;
pub use note::{Note, NoteBuilder};
