use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, QueryBuilder};

use meridian_common::{
    AnalyticsSummary, IngestStats, IngestedRecord, NewIngestedRecord, Order, TypeCount, User,
};
use meridian_common::validation::USERNAME_TAKEN;

use crate::error::{Result, StoreError};
use crate::traits::RecordStore;

/// Postgres-backed store shared by all three services.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect with a short acquire timeout so a dead database surfaces as
    /// a readiness failure instead of a hang.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_user(&self, username: &str, email: &str) -> Result<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email)
            VALUES ($1, $2)
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict(USERNAME_TAKEN.into())),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_recent_users(&self, limit: i64) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, created_at FROM users
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert_order(&self, user_id: i64, amount: f64) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user_id, amount, status)
            VALUES ($1, $2, 'pending')
            RETURNING id, user_id, amount, status, created_at
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    async fn analytics_summary(&self) -> Result<AnalyticsSummary> {
        let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let (order_count, total_amount, average_amount): (i64, f64, f64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(amount), 0)::float8,
                   COALESCE(AVG(amount), 0)::float8
            FROM orders
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(AnalyticsSummary {
            users,
            order_count,
            total_amount,
            average_amount,
        })
    }

    async fn insert_ingested(
        &self,
        region: &str,
        records: &[NewIngestedRecord],
    ) -> Result<Vec<IngestedRecord>> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(records.len());

        for record in records {
            let row = sqlx::query_as::<_, IngestedRecord>(
                r#"
                INSERT INTO ingested_data (record_type, payload, source, region)
                VALUES ($1, $2, $3, $4)
                RETURNING id, record_type, payload, source, region, created_at
                "#,
            )
            .bind(&record.record_type)
            .bind(&record.payload)
            .bind(&record.source)
            .bind(region)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn bulk_insert_ingested(
        &self,
        region: &str,
        records: &[NewIngestedRecord],
    ) -> Result<u64> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("INSERT INTO ingested_data (record_type, payload, source, region) ");

        builder.push_values(records, |mut b, record| {
            b.push_bind(&record.record_type)
                .push_bind(&record.payload)
                .push_bind(&record.source)
                .push_bind(region);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ingest_stats(&self) -> Result<IngestStats> {
        let (total_records, unique_types, unique_sources): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(DISTINCT record_type),
                   COUNT(DISTINCT source)
            FROM ingested_data
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let by_type = sqlx::query_as::<_, TypeCount>(
            r#"
            SELECT record_type, COUNT(*) AS count
            FROM ingested_data
            GROUP BY record_type
            ORDER BY count DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let (recent_hour_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM ingested_data WHERE created_at > NOW() - INTERVAL '1 hour'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(IngestStats {
            total_records,
            unique_types,
            unique_sources,
            recent_hour_count,
            by_type,
        })
    }

    async fn list_recent_ingested(
        &self,
        limit: i64,
        record_type: Option<&str>,
    ) -> Result<Vec<IngestedRecord>> {
        let rows = match record_type {
            Some(record_type) => {
                sqlx::query_as::<_, IngestedRecord>(
                    r#"
                    SELECT id, record_type, payload, source, region, created_at
                    FROM ingested_data
                    WHERE record_type = $1
                    ORDER BY created_at DESC
                    LIMIT $2
                    "#,
                )
                .bind(record_type)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, IngestedRecord>(
                    r#"
                    SELECT id, record_type, payload, source, region, created_at
                    FROM ingested_data
                    ORDER BY created_at DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }
}
