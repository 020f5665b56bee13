use serde::Deserialize;

use super::Required;
use crate::HomeroomError;
use crate::db::AttendanceMark;

/// Body of `POST /api/attendance`.
#[derive(Debug, Default, Deserialize)]
pub struct AttendancePayload {
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::optional_int")]
    pub student_id: Option<i64>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub reason: Option<String>,
}

impl AttendancePayload {
    pub fn into_mark(self) -> Result<AttendanceMark, HomeroomError> {
        let mut required = Required::default();
        let mark = AttendanceMark {
            device_id: required.text("device_id", self.device_id),
            student_id: required.int("student_id", self.student_id),
            date: required.text("date", self.date),
            status: required.text("status", self.status),
            reason: self.reason,
        };
        required.finish(mark)
    }
}
