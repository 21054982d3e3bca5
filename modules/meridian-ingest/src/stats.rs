use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use meridian_common::ApiError;

use crate::routes::AppState;

/// Aggregates are recomputed on every call; there is no caching layer, so
/// cost grows with the table.
pub async fn stats(State(state): State<Arc<AppState>>) -> Response {
    match state.store.ingest_stats().await {
        Ok(stats) => Json(json!({
            "total_records": stats.total_records,
            "unique_types": stats.unique_types,
            "unique_sources": stats.unique_sources,
            "recent_hour_count": stats.recent_hour_count,
            "by_type": stats.by_type,
            "region": state.config.region,
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(e) => ApiError::Internal(e.to_string()).to_response(&state.config.region),
    }
}

#[derive(Deserialize)]
pub struct RecentQuery {
    limit: Option<i64>,
    #[serde(rename = "type")]
    record_type: Option<String>,
}

/// Newest-first listing, optionally filtered to one record type. The limit
/// defaults to 50 and is caller-controlled with no upper bound.
pub async fn recent(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(50);

    match state
        .store
        .list_recent_ingested(limit, params.record_type.as_deref())
        .await
    {
        Ok(records) => Json(json!({
            "records": records,
            "count": records.len(),
            "region": state.config.region,
        }))
        .into_response(),
        Err(e) => ApiError::Internal(e.to_string()).to_response(&state.config.region),
    }
}
