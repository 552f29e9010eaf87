//! Core traits for jotter abstractions.
//!
//! These traits define the interfaces that concrete store implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Request for creating a new note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Request for replacing a note's title and body.
///
/// Both fields are written as given: `None` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Repository for note CRUD operations.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List all notes in insertion order.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Fetch a note by ID. Fails with `Error::NoteNotFound` when absent.
    async fn fetch(&self, id: Uuid) -> Result<Note>;

    /// Insert a new note, assigning its ID.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Replace title and body of an existing note.
    /// Fails with `Error::NoteNotFound` when absent.
    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<()>;

    /// Delete a note. Deleting an unknown ID succeeds.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Check if a note exists.
    async fn exists(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// VISIT REPOSITORY TRAITS
// =============================================================================

/// A visit about to be recorded. The store stamps the date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub path: String,
    pub user_agent: Option<String>,
}

/// Repository for the append-only visit log.
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Append one visit stamped with the current time.
    async fn record(&self, visit: NewVisit) -> Result<Visit>;

    /// Visits grouped by path, most visited first.
    async fn page_views(&self) -> Result<Vec<PageViews>>;

    /// Total number of recorded visits.
    async fn count(&self) -> Result<i64>;
}
