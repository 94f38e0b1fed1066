//! Architecture Validation Integration Tests
//!
//! Confirms that the note engine can be driven entirely through types
//! exported from the `zettel::` crate root, without any CLI context
//! (clap, dirs, environment), and that the storage seam accepts a
//! caller-provided backend.
//!
//! **Critical Architecture Invariant:**
//! This file must NOT import anything from main.rs. CLI types (`Cli`,
//! `Commands`, `OutputArgs`) are intentionally kept out of the library.

use std::cell::Cell;

use anyhow::Result;
use zettel::{
    DeleteReport, MemoryStorage, NoteError, NoteId, NoteRepository, NoteSession, NoteStorage,
    QueryEngine,
};

/// Helper function for repository instantiation.
///
/// Uses `MemoryStorage` for test isolation.
fn create_test_repo() -> NoteRepository<MemoryStorage> {
    NoteRepository::new(MemoryStorage::new()).expect("failed to create repository")
}

/// Storage wrapper counting reads, used to show that queries go to storage
/// every time instead of serving cached results.
struct CountingStorage {
    inner: MemoryStorage,
    reads: Cell<usize>,
}

impl NoteStorage for CountingStorage {
    fn ensure_store_exists(&self) -> zettel::Result<()> {
        self.inner.ensure_store_exists()
    }

    fn list_note_files(&self) -> zettel::Result<Vec<String>> {
        self.inner.list_note_files()
    }

    fn note_exists(&self, filename: &str) -> zettel::Result<bool> {
        self.inner.note_exists(filename)
    }

    fn read_note(&self, filename: &str) -> zettel::Result<String> {
        self.reads.set(self.reads.get() + 1);
        self.inner.read_note(filename)
    }

    fn write_note(&self, filename: &str, content: &str) -> zettel::Result<()> {
        self.inner.write_note(filename, content)
    }

    fn delete_note(&self, filename: &str) -> zettel::Result<()> {
        self.inner.delete_note(filename)
    }
}

#[test]
fn test_repository_runs_without_cli_context() -> Result<()> {
    let repo = create_test_repo();

    let note = repo.create("Standalone")?;
    let content = repo.read(note.filename())?;

    assert!(content.contains("ID: 1"));
    Ok(())
}

#[test]
fn test_full_boundary_api_over_memory_storage() -> Result<()> {
    let repo = create_test_repo();
    let query = QueryEngine::new(&repo);

    let hub = repo.create("Hub")?;
    let spoke = repo.create("Spoke")?;
    repo.save(spoke.filename(), "Back to [[1]] #graph")?;

    assert_eq!(query.list_all()?, vec!["1_Hub.md", "2_Spoke.md"]);
    assert_eq!(query.search("spoke")?.items, vec!["2_Spoke.md"]);
    assert_eq!(query.filter_by_tag("#graph")?.items, vec!["2_Spoke.md"]);
    assert_eq!(query.find_backlinks(hub.id())?.items, vec!["2_Spoke.md"]);
    assert!(query.extract_tags()?.items.contains("#graph"));

    let report: DeleteReport = repo.delete(hub.id(), hub.filename())?;
    assert_eq!(report.rewritten, vec!["2_Spoke.md"]);
    assert_eq!(repo.read(spoke.filename())?, "Back to (deleted note 1) #graph");
    Ok(())
}

#[test]
fn test_queries_read_storage_on_every_call() -> Result<()> {
    let storage = CountingStorage {
        inner: MemoryStorage::with_files([("1_a.md", "#x"), ("2_b.md", "[[1]]")]),
        reads: Cell::new(0),
    };
    let repo = NoteRepository::new(storage)?;
    let query = QueryEngine::new(&repo);

    query.extract_tags()?;
    let after_first = repo.storage().reads.get();
    query.extract_tags()?;

    assert_eq!(after_first, 2);
    assert_eq!(repo.storage().reads.get(), 4);
    Ok(())
}

#[test]
fn test_session_enforces_open_note_for_save() {
    let repo = create_test_repo();
    let session = NoteSession::new(&repo);

    let err = session.save("orphan text").unwrap_err();

    assert!(matches!(err, NoteError::NoOpenNote));
    assert!(err.is_user_error());
}

#[test]
fn test_note_serializes_for_front_ends() -> Result<()> {
    let repo = create_test_repo();
    let note = repo.create("Serializable")?;

    let json = serde_json::to_value(&note)?;

    assert_eq!(json["id"], 1);
    assert_eq!(json["filename"], "1_Serializable.md");
    assert!(json["created_at"].is_string());
    assert_eq!(note.id(), NoteId::new(1));
    Ok(())
}
