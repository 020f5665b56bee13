use axum::{Json, extract::State};
use tracing::info;

use crate::db::{AttendanceEntry, StatusCount};
use crate::middleware::{ApiJson, ApiPath, Tenant};
use crate::types::MessageResponse;
use crate::types::attendance::AttendancePayload;
use crate::{HomeroomError, router::HomeroomState};

pub async fn attendance_by_date(
    State(state): State<HomeroomState>,
    tenant: Tenant,
    ApiPath(date): ApiPath<String>,
) -> Result<Json<Vec<AttendanceEntry>>, HomeroomError> {
    let entries = state.storage.attendance_on(tenant.as_str(), &date).await?;
    Ok(Json(entries))
}

/// POST /api/attendance -> one atomic upsert per (tenant, student, date).
pub async fn save_attendance(
    State(state): State<HomeroomState>,
    ApiJson(payload): ApiJson<AttendancePayload>,
) -> Result<Json<MessageResponse>, HomeroomError> {
    let mark = payload.into_mark()?;
    state.storage.upsert_attendance(&mark).await?;
    info!(
        device_id = %mark.device_id,
        student_id = mark.student_id,
        date = %mark.date,
        status = %mark.status,
        "attendance saved"
    );
    Ok(Json(MessageResponse::new("saved")))
}

pub async fn attendance_stats(
    State(state): State<HomeroomState>,
    tenant: Tenant,
    ApiPath(student_id): ApiPath<i64>,
) -> Result<Json<Vec<StatusCount>>, HomeroomError> {
    let counts = state
        .storage
        .attendance_stats(tenant.as_str(), student_id)
        .await?;
    Ok(Json(counts))
}
