use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. Created only through the validated-write workflow;
/// never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// An order owned by a user. Starts in `pending` status; this core defines
/// no further transitions.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// One unit of externally supplied data. The payload is opaque to us; its
/// semantics belong to the producer. Region is the ingesting node's own,
/// for provenance across federated deployments.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngestedRecord {
    pub id: i64,
    pub record_type: String,
    pub payload: serde_json::Value,
    pub source: String,
    pub region: String,
    pub created_at: DateTime<Utc>,
}

/// A normalized record ready for insertion. Region is attached by the store
/// at write time, never taken from the caller.
#[derive(Debug, Clone)]
pub struct NewIngestedRecord {
    pub record_type: String,
    pub payload: serde_json::Value,
    pub source: String,
}

/// Per-type frequency, for the top-types listing. Tie order between equal
/// counts follows the store's natural row order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TypeCount {
    pub record_type: String,
    pub count: i64,
}

/// Ingestion aggregates, computed fresh on every call.
#[derive(Debug, Clone)]
pub struct IngestStats {
    pub total_records: i64,
    pub unique_types: i64,
    pub unique_sources: i64,
    pub recent_hour_count: i64,
    pub by_type: Vec<TypeCount>,
}

/// User and order totals for the analytics summary.
#[derive(Debug, Clone)]
pub struct AnalyticsSummary {
    pub users: i64,
    pub order_count: i64,
    pub total_amount: f64,
    pub average_amount: f64,
}
