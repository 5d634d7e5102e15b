//! PostgreSQL implementation of the regional report.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{RegionStats, ReportRepository};
use crate::error::AppError;

/// PostgreSQL repository for the read-only regional aggregation.
pub struct PgReportRepository {
    pool: Arc<PgPool>,
}

impl PgReportRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RegionStatsRow {
    name: String,
    number_countries: i64,
    total_population: Option<i64>,
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn region_stats(&self) -> Result<Vec<RegionStats>, AppError> {
        // SUM(bigint) yields NUMERIC; the cast keeps NULL for empty regions.
        // COLLATE "C" orders by code point, independent of the database locale.
        let rows = sqlx::query_as::<_, RegionStatsRow>(
            r#"
            SELECT
                r.name,
                COUNT(c.id) AS number_countries,
                SUM(c.population)::BIGINT AS total_population
            FROM regions r
            LEFT JOIN countries c ON c.region_id = r.id
            GROUP BY r.id, r.name
            ORDER BY r.name COLLATE "C"
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| RegionStats {
                name: r.name,
                number_countries: r.number_countries,
                total_population: r.total_population,
            })
            .collect())
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }
}
