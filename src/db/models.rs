use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Student {
    pub id: i64,
    pub device_id: String,
    pub number: i64,
    pub name: String,
    pub phone: String,
    pub parent_phone: String,
    pub memo: String,
}

/// Mutable student fields, shared by create and full-replace update.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentFields {
    pub device_id: String,
    pub number: i64,
    pub name: String,
    pub phone: String,
    pub parent_phone: String,
    pub memo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct AttendanceEntry {
    pub student_id: i64,
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceMark {
    pub device_id: String,
    pub student_id: i64,
    pub date: String,
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Record {
    pub id: i64,
    pub device_id: String,
    pub student_id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub device_id: String,
    pub student_id: i64,
    pub kind: String,
    pub content: String,
}
