use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use meridian_common::{ApiError, NewIngestedRecord};

use crate::records::{normalize_record, SOURCE_API, SOURCE_BATCH};
use crate::routes::AppState;

/// Single or mixed ingest: one record object, or an array of them. Records
/// are inserted individually, in input order, inside one transaction, and
/// every inserted row is returned.
pub async fn ingest(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let records: Vec<Value> = match body {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => Vec::new(),
    };

    if records.is_empty() {
        return ApiError::ClientInput("no data provided").to_response(&state.config.region);
    }

    let normalized: Vec<NewIngestedRecord> = records
        .iter()
        .map(|record| normalize_record(record, SOURCE_API))
        .collect();

    match state.store.insert_ingested(&state.config.region, &normalized).await {
        Ok(rows) => {
            info!(count = rows.len(), region = %state.config.region, "Ingested records");
            (
                StatusCode::CREATED,
                Json(json!({
                    "ingested": rows.len(),
                    "records": rows,
                    "region": state.config.region,
                })),
            )
                .into_response()
        }
        Err(e) => ApiError::Internal(e.to_string()).to_response(&state.config.region),
    }
}

#[derive(Deserialize)]
pub struct BatchRequest {
    records: Option<Vec<Value>>,
}

/// Throughput path: one bulk insert, count-only response. No per-row
/// results come back from this endpoint.
pub async fn ingest_batch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchRequest>,
) -> Response {
    let records = body.records.unwrap_or_default();
    if records.is_empty() {
        return ApiError::ClientInput("no records provided").to_response(&state.config.region);
    }

    let normalized: Vec<NewIngestedRecord> = records
        .iter()
        .map(|record| normalize_record(record, SOURCE_BATCH))
        .collect();

    match state
        .store
        .bulk_insert_ingested(&state.config.region, &normalized)
        .await
    {
        Ok(count) => {
            info!(count, region = %state.config.region, "Batch ingested records");
            (
                StatusCode::CREATED,
                Json(json!({
                    "ingested": count,
                    "region": state.config.region,
                    "timestamp": Utc::now().to_rfc3339(),
                })),
            )
                .into_response()
        }
        Err(e) => ApiError::Internal(e.to_string()).to_response(&state.config.region),
    }
}
