use serde::{Deserialize, Serialize};

use super::Required;
use crate::HomeroomError;
use crate::db::{NewRecord, Record};

/// Body of `POST /api/records`. Any `created_at` sent by the client is
/// not part of the shape and is dropped during deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct RecordPayload {
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::optional_int")]
    pub student_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<String>,
}

impl RecordPayload {
    pub fn into_record(self) -> Result<NewRecord, HomeroomError> {
        let mut required = Required::default();
        let record = NewRecord {
            device_id: required.text("device_id", self.device_id),
            student_id: required.int("student_id", self.student_id),
            kind: required.text("type", self.kind),
            content: required.text("content", self.content),
        };
        required.finish(record)
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedRecord {
    pub id: i64,
    pub student_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub created_at: String,
}

impl From<Record> for CreatedRecord {
    fn from(r: Record) -> Self {
        Self {
            id: r.id,
            student_id: r.student_id,
            kind: r.kind,
            content: r.content,
            created_at: r.created_at,
        }
    }
}
