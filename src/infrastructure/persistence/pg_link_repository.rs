//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, token, long_url, title, created_at, updated_at, clicks, last_status_code, active";

/// Raw `links` row as stored in PostgreSQL.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: i64,
    token: String,
    long_url: String,
    title: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    clicks: i64,
    last_status_code: i32,
    active: bool,
}

impl TryFrom<LinkRow> for Link {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let last_status_code = u16::try_from(row.last_status_code).map_err(|_| {
            AppError::internal(
                "Stored status code out of range",
                json!({ "token": row.token, "last_status_code": row.last_status_code }),
            )
        })?;

        Ok(Link::new(
            row.id,
            row.token,
            row.long_url,
            row.title,
            row.created_at,
            row.updated_at,
            row.clicks,
            last_status_code,
            row.active,
        ))
    }
}

fn into_links(rows: Vec<LinkRow>) -> Result<Vec<Link>, AppError> {
    rows.into_iter().map(Link::try_from).collect()
}

/// PostgreSQL repository for link lookup and mutation.
///
/// Click increments are a single atomic `UPDATE ... SET clicks = clicks + 1`.
/// Status updates are plain overwrites with no version check.
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
    async fn find_by_token(&self, token: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::try_from).transpose()
    }

    async fn increment_clicks(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET clicks = clicks + 1 WHERE token = $1")
            .bind(token)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn update_status(&self, token: &str, status_code: u16) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE links SET last_status_code = $2, updated_at = NOW() WHERE token = $1",
        )
        .bind(token)
        .bind(i32::from(status_code))
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn popular(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE clicks > 0 ORDER BY clicks DESC, id LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        into_links(rows)
    }

    async fn broken(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE last_status_code NOT IN (0, 200) \
             ORDER BY clicks DESC, id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        into_links(rows)
    }
}
