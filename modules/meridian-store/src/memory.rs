use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use meridian_common::{
    AnalyticsSummary, IngestStats, IngestedRecord, NewIngestedRecord, Order, TypeCount, User,
};
use meridian_common::validation::USERNAME_TAKEN;

use crate::error::{Result, StoreError};
use crate::traits::RecordStore;

/// In-memory RecordStore with the same observable semantics as PgStore.
/// Lets the service test suites exercise the orchestration logic without a
/// live database.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    offline: AtomicBool,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    orders: Vec<Order>,
    ingested: Vec<IngestedRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent pings fail, simulating an unreachable database.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of orders on record. Test observability only; the service
    /// surface never lists orders.
    pub fn order_count(&self) -> usize {
        self.inner.lock().expect("lock poisoned").orders.len()
    }

    /// Shift an ingested record's creation time into the past, so the
    /// trailing-hour window can be tested without waiting.
    pub fn rewind_created_at(&self, id: i64, by: Duration) {
        let mut inner = self.inner.lock().expect("lock poisoned");
        if let Some(record) = inner.ingested.iter_mut().find(|r| r.id == id) {
            record.created_at -= by;
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().expect("lock poisoned");
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let inner = self.inner.lock().expect("lock poisoned");
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, username: &str, email: &str) -> Result<User> {
        let mut inner = self.inner.lock().expect("lock poisoned");
        if inner.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Conflict(USERNAME_TAKEN.into()));
        }

        let user = User {
            id: inner.users.len() as i64 + 1,
            username: username.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn list_recent_users(&self, limit: i64) -> Result<Vec<User>> {
        let inner = self.inner.lock().expect("lock poisoned");
        Ok(inner
            .users
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn insert_order(&self, user_id: i64, amount: f64) -> Result<Order> {
        let mut inner = self.inner.lock().expect("lock poisoned");
        let order = Order {
            id: inner.orders.len() as i64 + 1,
            user_id,
            amount,
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        inner.orders.push(order.clone());
        Ok(order)
    }

    async fn analytics_summary(&self) -> Result<AnalyticsSummary> {
        let inner = self.inner.lock().expect("lock poisoned");
        let order_count = inner.orders.len() as i64;
        let total_amount: f64 = inner.orders.iter().map(|o| o.amount).sum();
        let average_amount = if order_count > 0 {
            total_amount / order_count as f64
        } else {
            0.0
        };

        Ok(AnalyticsSummary {
            users: inner.users.len() as i64,
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
        let mut inner = self.inner.lock().expect("lock poisoned");
        let mut inserted = Vec::with_capacity(records.len());

        for record in records {
            let row = IngestedRecord {
                id: inner.ingested.len() as i64 + 1,
                record_type: record.record_type.clone(),
                payload: record.payload.clone(),
                source: record.source.clone(),
                region: region.to_string(),
                created_at: Utc::now(),
            };
            inner.ingested.push(row.clone());
            inserted.push(row);
        }

        Ok(inserted)
    }

    async fn bulk_insert_ingested(
        &self,
        region: &str,
        records: &[NewIngestedRecord],
    ) -> Result<u64> {
        let inserted = self.insert_ingested(region, records).await?;
        Ok(inserted.len() as u64)
    }

    async fn ingest_stats(&self) -> Result<IngestStats> {
        let inner = self.inner.lock().expect("lock poisoned");
        let cutoff = Utc::now() - Duration::hours(1);

        let mut types: Vec<&str> = inner.ingested.iter().map(|r| r.record_type.as_str()).collect();
        types.sort_unstable();
        types.dedup();

        let mut sources: Vec<&str> = inner.ingested.iter().map(|r| r.source.as_str()).collect();
        sources.sort_unstable();
        sources.dedup();

        // Count per type in first-seen order; the stable sort then keeps
        // natural row order between equal counts, like the SQL path.
        let mut by_type: Vec<TypeCount> = Vec::new();
        for record in &inner.ingested {
            match by_type.iter_mut().find(|c| c.record_type == record.record_type) {
                Some(entry) => entry.count += 1,
                None => by_type.push(TypeCount {
                    record_type: record.record_type.clone(),
                    count: 1,
                }),
            }
        }
        by_type.sort_by(|a, b| b.count.cmp(&a.count));
        by_type.truncate(10);

        Ok(IngestStats {
            total_records: inner.ingested.len() as i64,
            unique_types: types.len() as i64,
            unique_sources: sources.len() as i64,
            recent_hour_count: inner
                .ingested
                .iter()
                .filter(|r| r.created_at > cutoff)
                .count() as i64,
            by_type,
        })
    }

    async fn list_recent_ingested(
        &self,
        limit: i64,
        record_type: Option<&str>,
    ) -> Result<Vec<IngestedRecord>> {
        let inner = self.inner.lock().expect("lock poisoned");
        Ok(inner
            .ingested
            .iter()
            .rev()
            .filter(|r| record_type.map_or(true, |t| r.record_type == t))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
