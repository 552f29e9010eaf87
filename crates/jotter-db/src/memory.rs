//! In-memory repository implementations.
//!
//! Same semantics as the PostgreSQL repositories, held in process memory.
//! Used by the HTTP tests and for running the server without a database
//! (`JOTTER_STORE=memory`). Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use jotter_core::{
    CreateNoteRequest, Error, NewVisit, Note, NoteRepository, PageViews, Result,
    UpdateNoteRequest, Visit, VisitRepository,
};

/// In-memory note store. Notes are kept in insertion order.
#[derive(Default)]
pub struct MemoryNoteRepository {
    notes: RwLock<Vec<Note>>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn list(&self) -> Result<Vec<Note>> {
        Ok(self.notes.read().await.clone())
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        self.notes
            .read()
            .await
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let note = Note {
            id: Uuid::now_v7(),
            title: req.title,
            body: req.body,
        };
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<()> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;
        note.title = req.title;
        note.body = req.body;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.notes.write().await.retain(|n| n.id != id);
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.notes.read().await.iter().any(|n| n.id == id))
    }
}

/// In-memory append-only visit log.
#[derive(Default)]
pub struct MemoryVisitRepository {
    visits: RwLock<Vec<Visit>>,
}

impl MemoryVisitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded visit, oldest first.
    pub async fn all(&self) -> Vec<Visit> {
        self.visits.read().await.clone()
    }
}

/// Group visits by path and order by count descending, then path ascending.
pub fn aggregate_page_views<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<PageViews> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for path in paths {
        *counts.entry(path).or_insert(0) += 1;
    }

    let mut views: Vec<PageViews> = counts
        .into_iter()
        .map(|(path, count)| PageViews {
            path: path.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the BTreeMap's path order among equal counts.
    views.sort_by(|a, b| b.count.cmp(&a.count));
    views
}

#[async_trait]
impl VisitRepository for MemoryVisitRepository {
    async fn record(&self, visit: NewVisit) -> Result<Visit> {
        let visit = Visit {
            id: Uuid::now_v7(),
            path: visit.path,
            date: Utc::now(),
            user_agent: visit.user_agent,
        };
        self.visits.write().await.push(visit.clone());
        Ok(visit)
    }

    async fn page_views(&self) -> Result<Vec<PageViews>> {
        let visits = self.visits.read().await;
        Ok(aggregate_page_views(visits.iter().map(|v| v.path.as_str())))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.visits.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, body: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: Some(title.to_string()),
            body: Some(body.to_string()),
        }
    }

    fn visit(path: &str) -> NewVisit {
        NewVisit {
            path: path.to_string(),
            user_agent: Some("test-agent".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_then_fetch() {
        let repo = MemoryNoteRepository::new();
        let note = repo.insert(create("Hello", "World")).await.unwrap();

        let fetched = repo.fetch(note.id).await.unwrap();
        assert_eq!(fetched.title.as_deref(), Some("Hello"));
        assert_eq!(fetched.body.as_deref(), Some("World"));
    }

    #[tokio::test]
    async fn test_update_replaces_both_fields() {
        let repo = MemoryNoteRepository::new();
        let note = repo.insert(create("X1", "Y1")).await.unwrap();

        repo.update(
            note.id,
            UpdateNoteRequest {
                title: Some("X2".to_string()),
                body: None,
            },
        )
        .await
        .unwrap();

        let fetched = repo.fetch(note.id).await.unwrap();
        assert_eq!(fetched.title.as_deref(), Some("X2"));
        assert_eq!(fetched.body, None);
    }

    #[tokio::test]
    async fn test_update_missing_note_is_not_found() {
        let repo = MemoryNoteRepository::new();
        let id = Uuid::now_v7();
        let err = repo
            .update(id, UpdateNoteRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_delete_then_fetch_is_not_found() {
        let repo = MemoryNoteRepository::new();
        let note = repo.insert(create("a", "b")).await.unwrap();

        repo.delete(note.id).await.unwrap();

        assert!(matches!(
            repo.fetch(note.id).await,
            Err(Error::NoteNotFound(_))
        ));
        assert!(!repo.exists(note.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_succeeds() {
        let repo = MemoryNoteRepository::new();
        repo.delete(Uuid::now_v7()).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = MemoryNoteRepository::new();
        let first = repo.insert(create("first", "")).await.unwrap();
        let second = repo.insert(create("second", "")).await.unwrap();

        let ids: Vec<Uuid> = repo.list().await.unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_page_views_grouped_and_sorted() {
        let repo = MemoryVisitRepository::new();
        repo.record(visit("/notes/new")).await.unwrap();
        for _ in 0..3 {
            repo.record(visit("/")).await.unwrap();
        }

        let views = repo.page_views().await.unwrap();
        assert_eq!(
            views,
            vec![
                PageViews {
                    path: "/".to_string(),
                    count: 3
                },
                PageViews {
                    path: "/notes/new".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[test]
    fn test_aggregate_ties_ordered_by_path() {
        let views = aggregate_page_views(["/b", "/a", "/c", "/c"]);
        let paths: Vec<&str> = views.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["/c", "/a", "/b"]);
    }

    #[test]
    fn test_aggregate_ties_use_byte_order() {
        let views = aggregate_page_views(["/a", "/B"]);
        let paths: Vec<&str> = views.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["/B", "/a"]);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_page_views(std::iter::empty()).is_empty());
    }
}
