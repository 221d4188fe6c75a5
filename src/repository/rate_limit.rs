use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::RateLimitStore;

#[derive(Clone)]
pub struct RateLimitRepository {
    pool: PgPool,
}

impl RateLimitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitStore for RateLimitRepository {
    #[instrument(name = "db.rate_limit.count_since", skip(self))]
    async fn count_since(
        &self,
        key: &str,
        window_start: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM rate_limit_attempts \
             WHERE key = $1 AND created_at > $2",
        )
        .bind(key)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("count"))
    }

    #[instrument(name = "db.rate_limit.record", skip(self))]
    async fn record(&self, key: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO rate_limit_attempts (key) VALUES ($1)")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(name = "db.rate_limit.purge_older_than", skip(self))]
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rate_limit_attempts WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
