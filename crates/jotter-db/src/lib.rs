//! # jotter-db
//!
//! PostgreSQL database layer for jotter.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for notes and the visit log
//! - In-memory repositories with the same semantics
//!
//! ## Example
//!
//! ```rust,ignore
//! use jotter_db::{CreateNoteRequest, Database, NoteRepository, PoolConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/jotter", &PoolConfig::default()).await?;
//!
//!     let note = db.notes.insert(CreateNoteRequest {
//!         title: Some("Hello".to_string()),
//!         body: Some("World".to_string()),
//!     }).await?;
//!
//!     println!("Created note: {}", note.id);
//!     db.close().await;
//!     Ok(())
//! }
//! ```
pub mod memory;
pub mod notes;
pub mod pool;
pub mod visits;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use jotter_core::*;

// Re-export repository implementations
pub use memory::{MemoryNoteRepository, MemoryVisitRepository};
pub use notes::PgNoteRepository;
pub use pool::{create_pool, log_pool_metrics, PoolConfig};
pub use visits::PgVisitRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository for CRUD operations.
    pub notes: PgNoteRepository,
    /// Visit log repository.
    pub visits: PgVisitRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            visits: PgVisitRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open a pool against `url` and build the repositories on it.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = create_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Close every pooled connection. Outstanding queries finish first.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(
            subsystem = "database",
            component = "pool",
            op = "close",
            "Database connection pool closed"
        );
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
