//! Shared application state.

use std::sync::Arc;

use jotter_core::{NoteRepository, Result, VisitRepository};
use jotter_db::{
    Database, MemoryNoteRepository, MemoryVisitRepository, PgNoteRepository, PgVisitRepository,
};

use crate::views::Views;

/// Application state shared across handlers.
///
/// Holds the store handles explicitly; nothing here is global. Cloning is
/// cheap (three `Arc`s).
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteRepository>,
    pub visits: Arc<dyn VisitRepository>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(notes: Arc<dyn NoteRepository>, visits: Arc<dyn VisitRepository>) -> Result<Self> {
        Ok(Self {
            notes,
            visits,
            views: Arc::new(Views::new()?),
        })
    }

    /// State backed by PostgreSQL repositories sharing `db`'s pool.
    pub fn postgres(db: &Database) -> Result<Self> {
        Self::new(
            Arc::new(PgNoteRepository::new(db.pool.clone())),
            Arc::new(PgVisitRepository::new(db.pool.clone())),
        )
    }

    /// State backed by fresh in-memory repositories.
    pub fn in_memory() -> Result<Self> {
        Self::new(
            Arc::new(MemoryNoteRepository::new()),
            Arc::new(MemoryVisitRepository::new()),
        )
    }
}
