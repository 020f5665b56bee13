//! Database module: models, schema and the tenant-scoped storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and write inputs
//! - `schema.rs`: SQL DDL and additive migrations (SQLite-first)
//! - `sqlite.rs`: pool setup and `SchoolStorage` queries

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{AttendanceEntry, AttendanceMark, NewRecord, Record, StatusCount, Student, StudentFields};
pub use schema::SQLITE_INIT;
pub use sqlite::{SchoolStorage, SqlitePool, connect};
