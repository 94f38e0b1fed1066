/// Integration tests for the note store against a real directory.
///
/// These tests verify end-to-end behavior including:
/// - ID allocation across deletions and reopened stores
/// - Numeric listing order
/// - Backlink discovery and cleanup on delete
/// - Tag extraction and case-insensitive search
/// - Fail-open scanning when a note cannot be read
///
/// To run locally:
/// ```bash
/// cargo test --test note_lifecycle_integration
/// ```
use std::collections::HashSet;
use std::fs;

use anyhow::Result;
use tempfile::tempdir;
use zettel::{NoteError, NoteId, NoteRepository, QueryEngine};

#[test]
fn ids_survive_reopening_the_store() -> Result<()> {
    let temp_dir = tempdir()?;
    let store = temp_dir.path().join("zettel");

    {
        let repo = NoteRepository::open(&store)?;
        repo.create("First")?;
        repo.create("Second")?;
    }

    // Reopen and keep counting from the files on disk
    let repo = NoteRepository::open(&store)?;
    let third = repo.create("Third")?;

    assert_eq!(third.id(), NoteId::new(3));
    Ok(())
}

#[test]
fn many_creates_yield_distinct_ids() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = NoteRepository::open(temp_dir.path())?;

    let mut ids = HashSet::new();
    for i in 0..40 {
        let note = repo.create(&format!("Note number {i}"))?;
        assert!(ids.insert(note.id()), "duplicate id {}", note.id());
    }

    assert_eq!(ids.len(), 40);
    Ok(())
}

#[test]
fn allocator_is_max_based_and_gap_tolerant() -> Result<()> {
    let temp_dir = tempdir()?;
    for name in ["1_a.md", "2_b.md", "5_e.md"] {
        fs::write(temp_dir.path().join(name), "")?;
    }
    let repo = NoteRepository::open(temp_dir.path())?;

    let note = repo.create("Next")?;

    assert_eq!(note.id(), NoteId::new(6));
    assert_eq!(note.filename(), "6_Next.md");
    Ok(())
}

#[test]
fn stray_files_do_not_break_allocation_or_listing() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("README.md"), "not a note")?;
    fs::write(temp_dir.path().join(".DS_Store"), "")?;
    fs::write(temp_dir.path().join("settings.json"), "{}")?;
    let repo = NoteRepository::open(temp_dir.path())?;

    let note = repo.create("Real note")?;

    assert_eq!(note.id(), NoteId::new(1));
    assert_eq!(repo.list()?, vec!["1_Real_note.md", "README.md"]);
    Ok(())
}

#[test]
fn list_all_is_numeric_not_lexicographic() -> Result<()> {
    let temp_dir = tempdir()?;
    for name in ["2_two.md", "10_ten.md", "1_one.md"] {
        fs::write(temp_dir.path().join(name), "")?;
    }
    let repo = NoteRepository::open(temp_dir.path())?;
    let query = QueryEngine::new(&repo);

    assert_eq!(query.list_all()?, vec!["1_one.md", "2_two.md", "10_ten.md"]);
    Ok(())
}

#[test]
fn backlink_round_trip_through_delete() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = NoteRepository::open(temp_dir.path())?;
    let query = QueryEngine::new(&repo);

    let a = repo.create("Source")?;
    let b = repo.create("Target")?;
    repo.save(a.filename(), &format!("This builds on [[{}]].", b.id()))?;

    assert_eq!(query.find_backlinks(b.id())?.items, vec![a.filename().to_string()]);

    repo.delete(a.id(), a.filename())?;

    assert!(query.find_backlinks(b.id())?.items.is_empty());
    Ok(())
}

#[test]
fn delete_rewrites_links_to_placeholder() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = NoteRepository::open(temp_dir.path())?;
    let query = QueryEngine::new(&repo);

    let a = repo.create("A")?;
    let b = repo.create("B")?;
    assert_eq!(a.id(), NoteId::new(1));
    repo.save(b.filename(), "Refers to [[1]] twice: [[1]]\n")?;

    let report = repo.delete(a.id(), a.filename())?;

    assert_eq!(report.rewritten, vec![b.filename().to_string()]);
    assert_eq!(
        repo.read(b.filename())?,
        "Refers to (deleted note 1) twice: (deleted note 1)\n"
    );
    assert_eq!(query.list_all()?, vec![b.filename().to_string()]);
    assert!(!temp_dir.path().join(a.filename()).exists());
    Ok(())
}

#[test]
fn tags_are_sorted_case_sensitive_and_unique() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("1_a.md"), "kick off #project")?;
    fs::write(temp_dir.path().join("2_b.md"), "#Project naming")?;
    fs::write(temp_dir.path().join("3_c.md"), "more #project work")?;
    let repo = NoteRepository::open(temp_dir.path())?;
    let query = QueryEngine::new(&repo);

    let tags: Vec<String> = query.extract_tags()?.items.into_iter().collect();

    assert_eq!(tags, vec!["#Project", "#project"]);
    Ok(())
}

#[test]
fn created_notes_contribute_template_tag() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = NoteRepository::open(temp_dir.path())?;
    let query = QueryEngine::new(&repo);

    repo.create("Fresh")?;

    assert!(query.extract_tags()?.items.contains("#example"));
    Ok(())
}

#[test]
fn search_ignores_case() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = NoteRepository::open(temp_dir.path())?;
    let query = QueryEngine::new(&repo);

    let note = repo.create("Method")?;
    repo.save(note.filename(), "Notes on the zettelkasten approach")?;
    repo.create("Unrelated")?;

    assert_eq!(query.search("ZETTEL")?.items, vec![note.filename().to_string()]);
    Ok(())
}

#[test]
fn rescans_without_writes_are_identical() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = NoteRepository::open(temp_dir.path())?;
    let query = QueryEngine::new(&repo);
    let a = repo.create("A")?;
    let b = repo.create("B")?;
    repo.save(b.filename(), "[[1]] #alpha #beta")?;

    assert_eq!(query.extract_tags()?, query.extract_tags()?);
    assert_eq!(query.find_backlinks(a.id())?, query.find_backlinks(a.id())?);
    Ok(())
}

#[test]
fn unreadable_note_is_skipped_and_reported() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = NoteRepository::open(temp_dir.path())?;
    let query = QueryEngine::new(&repo);
    let good = repo.create("Good")?;
    repo.save(good.filename(), "keyword #ok [[9]]")?;
    // Invalid UTF-8 cannot be read as note text
    fs::write(temp_dir.path().join("2_binary.md"), b"\xff\xfe\xfd")?;

    let search = query.search("keyword")?;
    assert_eq!(search.items, vec![good.filename().to_string()]);
    assert_eq!(search.skipped.len(), 1);
    assert_eq!(search.skipped[0].filename, "2_binary.md");

    let tags = query.extract_tags()?;
    assert!(tags.items.contains("#ok"));
    assert!(!tags.is_complete());

    let backlinks = query.find_backlinks(NoteId::new(9))?;
    assert_eq!(backlinks.items, vec![good.filename().to_string()]);
    assert_eq!(backlinks.skipped.len(), 1);
    Ok(())
}

#[test]
fn delete_with_unreadable_neighbour_reports_partial_failure() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = NoteRepository::open(temp_dir.path())?;
    let a = repo.create("A")?;
    let b = repo.create("B")?;
    repo.save(b.filename(), "see [[1]]")?;
    fs::write(temp_dir.path().join("3_binary.md"), b"\xff\xfe")?;

    let err = repo.delete(a.id(), a.filename()).unwrap_err();

    match err {
        NoteError::PartialFailure {
            deleted,
            cleaned,
            failed,
        } => {
            assert_eq!(deleted, a.filename());
            assert_eq!(cleaned, vec![b.filename().to_string()]);
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].filename, "3_binary.md");
        }
        other => panic!("expected PartialFailure, got {other:?}"),
    }
    assert_eq!(repo.read(b.filename())?, "see (deleted note 1)");
    Ok(())
}

#[test]
fn filter_by_tag_matches_literal_tag() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = NoteRepository::open(temp_dir.path())?;
    let query = QueryEngine::new(&repo);
    let a = repo.create("A")?;
    let b = repo.create("B")?;
    repo.save(a.filename(), "#reading list")?;
    repo.save(b.filename(), "reading without tag")?;

    assert_eq!(query.filter_by_tag("#reading")?.items, vec![a.filename().to_string()]);
    Ok(())
}
