//! Storage adapters for note files.
//!
//! [`NoteStorage`] is the seam between the repository and the place notes
//! live. [`FsStorage`] keeps one file per note in a directory on disk;
//! [`MemoryStorage`] keeps them in a map and is used by tests and embedders
//! that do not want to touch the filesystem.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::error::{NoteError, Result};
use crate::models::is_note_filename;

/// Flat store of note files addressed by filename.
pub trait NoteStorage {
    /// Creates the store if it is absent. Calling it again has no effect.
    fn ensure_store_exists(&self) -> Result<()>;

    /// Lists every filename following the note convention. Order is unspecified.
    fn list_note_files(&self) -> Result<Vec<String>>;

    /// Returns true if a note with this filename is present.
    fn note_exists(&self, filename: &str) -> Result<bool>;

    /// Reads a note's full content.
    ///
    /// Fails with [`NoteError::NotFound`] if the note does not exist.
    fn read_note(&self, filename: &str) -> Result<String>;

    /// Creates or overwrites a note with exactly `content`.
    fn write_note(&self, filename: &str, content: &str) -> Result<()>;

    /// Removes a note.
    ///
    /// Fails with [`NoteError::NotFound`] if the note is already absent.
    fn delete_note(&self, filename: &str) -> Result<()>;
}

/// Rejects names that would escape the store directory.
fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename.contains(['/', '\\', '\0'])
        || filename == "."
        || filename == ".."
    {
        return Err(NoteError::Validation(format!(
            "Invalid note filename: {filename:?}"
        )));
    }
    Ok(())
}

/// Directory-backed storage, one UTF-8 file per note.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates a storage rooted at `root`. The directory is not created until
    /// [`ensure_store_exists`](NoteStorage::ensure_store_exists) is called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;
        Ok(self.root.join(filename))
    }

    /// Opens a hidden staging file in the store directory.
    ///
    /// On Unix the file is requested with mode 0666 so the process umask
    /// decides the final mode, as it would for a plain `fs::write`.
    fn staging_file(&self) -> io::Result<NamedTempFile> {
        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        builder.tempfile_in(&self.root)
    }
}

impl NoteStorage for FsStorage {
    fn ensure_store_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| NoteError::io(&self.root, e))
    }

    fn list_note_files(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| NoteError::io(&self.root, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| NoteError::io(&self.root, e))?;
            // Non-UTF-8 names can never be produced by `create`
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !is_note_filename(&name) {
                continue;
            }
            let is_file = entry
                .file_type()
                .map(|t| t.is_file())
                .map_err(|e| NoteError::io(entry.path(), e))?;
            if is_file {
                files.push(name);
            }
        }

        Ok(files)
    }

    fn note_exists(&self, filename: &str) -> Result<bool> {
        let path = self.path_for(filename)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(NoteError::io(path, e)),
        }
    }

    fn read_note(&self, filename: &str) -> Result<String> {
        let path = self.path_for(filename)?;
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => NoteError::NotFound(filename.to_string()),
            _ => NoteError::io(path, e),
        })
    }

    fn write_note(&self, filename: &str, content: &str) -> Result<()> {
        let path = self.path_for(filename)?;

        // Stage next to the target so the final rename stays on one filesystem.
        // The temp name starts with '.', which keeps it out of listings.
        let mut staged = self
            .staging_file()
            .map_err(|e| NoteError::io(&self.root, e))?;
        staged
            .write_all(content.as_bytes())
            .map_err(|e| NoteError::io(staged.path(), e))?;

        // An overwrite keeps the mode of the note it replaces
        match fs::metadata(&path) {
            Ok(meta) => staged
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| NoteError::io(staged.path(), e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(NoteError::io(path, e)),
        }
        staged
            .persist(&path)
            .map_err(|e| NoteError::io(&path, e.error))?;

        Ok(())
    }

    fn delete_note(&self, filename: &str) -> Result<()> {
        let path = self.path_for(filename)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => NoteError::NotFound(filename.to_string()),
            _ => NoteError::io(path, e),
        })
    }
}

/// In-memory storage.
///
/// Not `Sync`: the store assumes a single writer.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `(filename, content)` pairs.
    ///
    /// Names that do not follow the note convention are kept but never listed,
    /// mirroring stray files in a real directory.
    pub fn with_files<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            files: RefCell::new(files),
        }
    }
}

impl NoteStorage for MemoryStorage {
    fn ensure_store_exists(&self) -> Result<()> {
        Ok(())
    }

    fn list_note_files(&self) -> Result<Vec<String>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|name| is_note_filename(name))
            .cloned()
            .collect())
    }

    fn note_exists(&self, filename: &str) -> Result<bool> {
        validate_filename(filename)?;
        Ok(self.files.borrow().contains_key(filename))
    }

    fn read_note(&self, filename: &str) -> Result<String> {
        validate_filename(filename)?;
        self.files
            .borrow()
            .get(filename)
            .cloned()
            .ok_or_else(|| NoteError::NotFound(filename.to_string()))
    }

    fn write_note(&self, filename: &str, content: &str) -> Result<()> {
        validate_filename(filename)?;
        self.files
            .borrow_mut()
            .insert(filename.to_string(), content.to_string());
        Ok(())
    }

    fn delete_note(&self, filename: &str) -> Result<()> {
        validate_filename(filename)?;
        self.files
            .borrow_mut()
            .remove(filename)
            .map(|_| ())
            .ok_or_else(|| NoteError::NotFound(filename.to_string()))
    }
}
