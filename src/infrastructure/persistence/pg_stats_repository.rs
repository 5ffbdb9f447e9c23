//! PostgreSQL implementation of statistics repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{AccessStat, NewAccessStat};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct AccessStatRow {
    id: Uuid,
    link_id: i64,
    created_at: DateTime<Utc>,
    referrer: String,
    user_agent: String,
    status_code: i32,
}

impl TryFrom<AccessStatRow> for AccessStat {
    type Error = AppError;

    fn try_from(row: AccessStatRow) -> Result<Self, Self::Error> {
        let status_code = u16::try_from(row.status_code).map_err(|_| {
            AppError::internal(
                "Stored status code out of range",
                json!({ "id": row.id.to_string(), "status_code": row.status_code }),
            )
        })?;

        Ok(AccessStat {
            id: row.id,
            link_id: row.link_id,
            created_at: row.created_at,
            referrer: row.referrer,
            user_agent: row.user_agent,
            status_code,
        })
    }
}

/// PostgreSQL repository for append-only access stats.
///
/// `link_id` is a plain reference without a foreign key: stats are owned by this
/// table and outlive whatever happens to the link row.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn append(&self, stat: NewAccessStat) -> Result<AccessStat, AppError> {
        let row = sqlx::query_as::<_, AccessStatRow>(
            r#"
            INSERT INTO access_stats (id, link_id, created_at, referrer, user_agent, status_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, link_id, created_at, referrer, user_agent, status_code
            "#,
        )
        .bind(stat.id)
        .bind(stat.link_id)
        .bind(stat.created_at)
        .bind(&stat.referrer)
        .bind(&stat.user_agent)
        .bind(i32::from(stat.status_code))
        .fetch_one(self.pool.as_ref())
        .await?;

        AccessStat::try_from(row)
    }

    async fn list_for_link(&self, link_id: i64, limit: i64) -> Result<Vec<AccessStat>, AppError> {
        let rows = sqlx::query_as::<_, AccessStatRow>(
            r#"
            SELECT id, link_id, created_at, referrer, user_agent, status_code
            FROM access_stats
            WHERE link_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(link_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(AccessStat::try_from).collect()
    }
}
