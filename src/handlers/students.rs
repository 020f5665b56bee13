use axum::{Json, extract::State};
use tracing::{debug, info};

use crate::db::Student;
use crate::middleware::{ApiJson, ApiPath, Tenant};
use crate::types::MessageResponse;
use crate::types::student::{CreatedStudent, StudentPayload};
use crate::{HomeroomError, router::HomeroomState};

/// GET /api/students?device_id= -> roster ordered by number.
pub async fn list_students(
    State(state): State<HomeroomState>,
    tenant: Tenant,
) -> Result<Json<Vec<Student>>, HomeroomError> {
    let students = state.storage.list_students(tenant.as_str()).await?;
    debug!(device_id = %tenant.as_str(), count = students.len(), "listed students");
    Ok(Json(students))
}

/// GET /api/students/{id}?device_id= -> one student, 404 outside the tenant.
pub async fn get_student(
    State(state): State<HomeroomState>,
    tenant: Tenant,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Student>, HomeroomError> {
    state
        .storage
        .get_student(tenant.as_str(), id)
        .await?
        .map(Json)
        .ok_or(HomeroomError::StudentNotFound)
}

pub async fn create_student(
    State(state): State<HomeroomState>,
    ApiJson(payload): ApiJson<StudentPayload>,
) -> Result<Json<CreatedStudent>, HomeroomError> {
    let fields = payload.into_fields()?;
    let id = state.storage.create_student(&fields).await?;
    info!(device_id = %fields.device_id, id, number = fields.number, "student created");
    Ok(Json(CreatedStudent {
        id,
        number: fields.number,
        name: fields.name,
    }))
}

/// PUT /api/students/{id} -> full replace; unknown ids still succeed.
pub async fn update_student(
    State(state): State<HomeroomState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<StudentPayload>,
) -> Result<Json<MessageResponse>, HomeroomError> {
    let fields = payload.into_fields()?;
    let updated = state.storage.update_student(id, &fields).await?;
    info!(device_id = %fields.device_id, id, updated, "student updated");
    Ok(Json(MessageResponse::new("updated")))
}

/// DELETE /api/students/{id}?device_id= -> also removes attendance and records.
pub async fn delete_student(
    State(state): State<HomeroomState>,
    tenant: Tenant,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, HomeroomError> {
    let removed = state.storage.delete_student(tenant.as_str(), id).await?;
    info!(device_id = %tenant.as_str(), id, removed, "student deleted");
    Ok(Json(MessageResponse::new("deleted")))
}
