pub mod allocator;
pub mod config;
pub mod error;
pub mod indexer;
pub mod models;
pub mod query;
pub mod repository;
pub mod session;
pub mod storage;

pub use error::{CleanupFailure, NoteError, Result};
pub use indexer::{LinkIndexer, Scan, SkippedFile};
pub use models::{Note, NoteBuilder, NoteId};
pub use query::QueryEngine;
pub use repository::{DeleteReport, NoteRepository};
pub use session::{NoteSession, OpenNote};
pub use storage::{FsStorage, MemoryStorage, NoteStorage};
