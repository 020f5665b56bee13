use axum::{Json, extract::State};
use chrono::Utc;
use tracing::info;

use crate::clock::record_timestamp;
use crate::db::Record;
use crate::middleware::{ApiJson, ApiPath, Tenant};
use crate::types::MessageResponse;
use crate::types::record::{CreatedRecord, RecordPayload};
use crate::{HomeroomError, router::HomeroomState};

/// GET /api/records/{student_id}?device_id= -> newest first.
pub async fn list_records(
    State(state): State<HomeroomState>,
    tenant: Tenant,
    ApiPath(student_id): ApiPath<i64>,
) -> Result<Json<Vec<Record>>, HomeroomError> {
    let records = state
        .storage
        .list_records(tenant.as_str(), student_id)
        .await?;
    Ok(Json(records))
}

/// POST /api/records -> stamped with server time, never the client's.
pub async fn create_record(
    State(state): State<HomeroomState>,
    ApiJson(payload): ApiJson<RecordPayload>,
) -> Result<Json<CreatedRecord>, HomeroomError> {
    let record = payload.into_record()?;
    let created_at = record_timestamp(Utc::now());
    let record = state.storage.create_record(record, created_at).await?;
    info!(
        device_id = %record.device_id,
        id = record.id,
        student_id = record.student_id,
        "record created"
    );
    Ok(Json(record.into()))
}

pub async fn delete_record(
    State(state): State<HomeroomState>,
    tenant: Tenant,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, HomeroomError> {
    let removed = state.storage.delete_record(tenant.as_str(), id).await?;
    info!(device_id = %tenant.as_str(), id, removed, "record deleted");
    Ok(Json(MessageResponse::new("deleted")))
}
