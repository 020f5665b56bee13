//! SQL DDL for the school store. SQLite-first.

/// Base tables. Every table carries the `device_id` tenant column;
/// `attendance` allows one row per (tenant, student, date).
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_id TEXT NOT NULL,
    number INTEGER NOT NULL,
    name TEXT NOT NULL,
    phone TEXT,
    parent_phone TEXT,
    memo TEXT
);

CREATE TABLE IF NOT EXISTS attendance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_id TEXT NOT NULL,
    student_id INTEGER NOT NULL,
    date TEXT NOT NULL, -- opaque client string, usually YYYY-MM-DD
    status TEXT NOT NULL,
    reason TEXT,
    UNIQUE(device_id, student_id, date)
);

CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_id TEXT NOT NULL,
    student_id INTEGER NOT NULL,
    type TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL -- YYYY-MM-DD HH:MM:SS, UTC+9
)
"#;

/// Columns missing from stores written by older releases:
/// `(table, column, column definition)`.
pub const LEGACY_COLUMNS: &[(&str, &str, &str)] = &[
    ("students", "device_id", "TEXT NOT NULL DEFAULT ''"),
    ("attendance", "device_id", "TEXT NOT NULL DEFAULT ''"),
    ("attendance", "reason", "TEXT"),
    ("records", "device_id", "TEXT NOT NULL DEFAULT ''"),
];

/// Tenant column added to legacy tables. Rows that predate it are
/// assigned to the configured legacy tenant.
pub const TENANT_COLUMN: &str = "device_id";

/// Columns of the single-user uniqueness constraint on `attendance`,
/// which has to go before two tenants can mark the same student id.
pub const LEGACY_ATTENDANCE_UNIQUE: &[&str] = &["student_id", "date"];

/// Rebuild of `attendance` without the legacy constraint. SQLite cannot
/// drop a table-level `UNIQUE`, so rows are copied into a fresh table.
pub const ATTENDANCE_REBUILD: &[&str] = &[
    r#"CREATE TABLE attendance_rebuild (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_id TEXT NOT NULL,
    student_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    status TEXT NOT NULL,
    reason TEXT,
    UNIQUE(device_id, student_id, date)
)"#,
    r#"INSERT INTO attendance_rebuild (id, device_id, student_id, date, status, reason)
    SELECT id, device_id, student_id, date, status, reason FROM attendance"#,
    "DROP TABLE attendance",
    "ALTER TABLE attendance_rebuild RENAME TO attendance",
];

/// Indexes created after the column migrations, since they reference
/// `device_id`. The unique index gives legacy `attendance` tables the
/// conflict target used by the upsert.
pub const SQLITE_INDEXES: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_tenant_day
    ON attendance(device_id, student_id, date);

CREATE INDEX IF NOT EXISTS idx_students_tenant_number
    ON students(device_id, number);

CREATE INDEX IF NOT EXISTS idx_records_tenant_student
    ON records(device_id, student_id, created_at)
"#;
