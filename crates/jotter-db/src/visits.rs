//! Visit log repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, trace};
use uuid::Uuid;

use jotter_core::{Error, NewVisit, PageViews, Result, Visit, VisitRepository};

/// PostgreSQL implementation of VisitRepository.
pub struct PgVisitRepository {
    pool: Pool<Postgres>,
}

impl PgVisitRepository {
    /// Create a new PgVisitRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn record(&self, visit: NewVisit) -> Result<Visit> {
        let id = Uuid::now_v7();
        let date = Utc::now();

        sqlx::query("INSERT INTO visit (id, path, date, user_agent) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&visit.path)
            .bind(date)
            .bind(&visit.user_agent)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        trace!(
            subsystem = "database",
            component = "visits",
            op = "record",
            path = %visit.path,
            "Visit recorded"
        );
        Ok(Visit {
            id,
            path: visit.path,
            date,
            user_agent: visit.user_agent,
        })
    }

    async fn page_views(&self) -> Result<Vec<PageViews>> {
        // Byte-order ties, matching the in-memory store.
        let rows = sqlx::query(
            r#"SELECT path, COUNT(*) AS count FROM visit
               GROUP BY path
               ORDER BY count DESC, path COLLATE "C" ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "visits",
            op = "page_views",
            result_count = rows.len(),
            "Aggregated page views"
        );
        Ok(rows
            .into_iter()
            .map(|row| PageViews {
                path: row.get("path"),
                count: row.get("count"),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visit")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(count)
    }
}
