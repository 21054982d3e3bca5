use async_trait::async_trait;

use meridian_common::{
    AnalyticsSummary, IngestStats, IngestedRecord, NewIngestedRecord, Order, User,
};

use crate::error::Result;

/// Narrow persistence interface shared by all three services.
///
/// Implemented by PgStore (postgres) and MemoryStore (tests), so the
/// orchestration logic stays testable without a live database.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Trivial connectivity probe for readiness checks.
    async fn ping(&self) -> Result<()>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Insert a new user. Returns `StoreError::Conflict` when the username
    /// is already taken, which is the store-level uniqueness backstop.
    async fn insert_user(&self, username: &str, email: &str) -> Result<User>;

    /// Most recently created users, newest first.
    async fn list_recent_users(&self, limit: i64) -> Result<Vec<User>>;

    /// Insert an order in `pending` status. The caller checks the user
    /// exists beforehand; there is no foreign-key contract at this layer.
    async fn insert_order(&self, user_id: i64, amount: f64) -> Result<Order>;

    async fn analytics_summary(&self) -> Result<AnalyticsSummary>;

    /// Insert records one by one, in input order, inside one transaction,
    /// returning every inserted row.
    async fn insert_ingested(
        &self,
        region: &str,
        records: &[NewIngestedRecord],
    ) -> Result<Vec<IngestedRecord>>;

    /// One bulk INSERT, no per-row round trip. Reports only the count.
    async fn bulk_insert_ingested(
        &self,
        region: &str,
        records: &[NewIngestedRecord],
    ) -> Result<u64>;

    /// Aggregates computed fresh on every call; cost scales with table size.
    async fn ingest_stats(&self) -> Result<IngestStats>;

    /// Up to `limit` newest records, optionally filtered to one type.
    async fn list_recent_ingested(
        &self,
        limit: i64,
        record_type: Option<&str>,
    ) -> Result<Vec<IngestedRecord>>;
}
