//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::{debug, info};
use uuid::Uuid;

use jotter_core::{CreateNoteRequest, Error, Note, NoteRepository, Result, UpdateNoteRequest};

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a database row to a Note.
fn map_row_to_note(row: PgRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self) -> Result<Vec<Note>> {
        let rows = sqlx::query("SELECT id, title, body FROM note ORDER BY created_at_utc, id")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "list",
            result_count = rows.len(),
            "Listed notes"
        );
        Ok(rows.into_iter().map(map_row_to_note).collect())
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        sqlx::query("SELECT id, title, body FROM note WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .map(map_row_to_note)
            .ok_or(Error::NoteNotFound(id))
    }

    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        sqlx::query("INSERT INTO note (id, title, body, created_at_utc) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&req.title)
            .bind(&req.body)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "notes",
            op = "insert",
            note_id = %id,
            "Note created"
        );
        Ok(Note {
            id,
            title: req.title,
            body: req.body,
        })
    }

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<()> {
        // Full replace: absent fields are written as NULL.
        let result = sqlx::query("UPDATE note SET title = $1, body = $2 WHERE id = $3")
            .bind(&req.title)
            .bind(&req.body)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }

        info!(
            subsystem = "database",
            component = "notes",
            op = "update",
            note_id = %id,
            "Note updated"
        );
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "notes",
            op = "delete",
            note_id = %id,
            deleted = result.rows_affected() > 0,
            "Note deleted"
        );
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM note WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(exists)
    }
}
