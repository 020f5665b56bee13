use serde::{Deserialize, Serialize};

use super::Required;
use crate::HomeroomError;
use crate::db::StudentFields;

/// Body of `POST /api/students` and `PUT /api/students/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct StudentPayload {
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::optional_int")]
    pub number: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    pub memo: Option<String>,
}

impl StudentPayload {
    /// Optional contact fields default to the empty string.
    pub fn into_fields(self) -> Result<StudentFields, HomeroomError> {
        let mut required = Required::default();
        let fields = StudentFields {
            device_id: required.text("device_id", self.device_id),
            number: required.int("number", self.number),
            name: required.text("name", self.name),
            phone: self.phone.unwrap_or_default(),
            parent_phone: self.parent_phone.unwrap_or_default(),
            memo: self.memo.unwrap_or_default(),
        };
        required.finish(fields)
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedStudent {
    pub id: i64,
    pub number: i64,
    pub name: String,
}
