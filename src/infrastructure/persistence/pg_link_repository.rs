//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, code, long_url, description, click_count, created_at, last_accessed, is_active";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    long_url: String,
    description: Option<String>,
    click_count: i64,
    created_at: DateTime<Utc>,
    last_accessed: Option<DateTime<Utc>>,
    is_active: bool,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            code: row.code,
            long_url: row.long_url,
            description: row.description,
            click_count: row.click_count,
            created_at: row.created_at,
            last_accessed: row.last_accessed,
            is_active: row.is_active,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Queries are bound parameters; the `links_code_key` unique constraint backs
/// [`LinkRepository::insert_if_absent`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        let sql = format!(
            "INSERT INTO links (code, long_url, description) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (code) DO NOTHING \
             RETURNING {LINK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.code)
            .bind(&new_link.long_url)
            .bind(&new_link.description)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE code = $1 AND is_active");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE long_url = $1 AND is_active \
             ORDER BY created_at ASC LIMIT 1"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(long_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn existing_codes(&self) -> Result<HashSet<String>, AppError> {
        let codes: Vec<String> = sqlx::query_scalar("SELECT code FROM links")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(codes.into_iter().collect())
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE code = $1)")
            .bind(code)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(exists)
    }

    async fn record_click(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE links \
             SET click_count = click_count + 1, last_accessed = NOW() \
             WHERE code = $1 AND is_active",
        )
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE is_active ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE is_active")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn total_clicks(&self) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links WHERE is_active")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(total)
    }
}
