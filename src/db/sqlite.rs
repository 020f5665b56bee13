use crate::config::DatabaseConfig;
use crate::db::models::{
    AttendanceEntry, AttendanceMark, NewRecord, Record, StatusCount, Student, StudentFields,
};
use crate::db::schema::{
    ATTENDANCE_REBUILD, LEGACY_ATTENDANCE_UNIQUE, LEGACY_COLUMNS, SQLITE_INDEXES, SQLITE_INIT,
    TENANT_COLUMN,
};
use crate::error::HomeroomError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

const STUDENT_COLUMNS: &str = "id, device_id, number, name, \
    COALESCE(phone, '') AS phone, \
    COALESCE(parent_phone, '') AS parent_phone, \
    COALESCE(memo, '') AS memo";

/// Open a pool for `cfg.url`, creating the database file if needed.
pub async fn connect(cfg: &DatabaseConfig) -> Result<SqlitePool, HomeroomError> {
    let options = SqliteConnectOptions::from_str(&cfg.url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections.max(1))
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Tenant-scoped access to students, attendance and records.
/// Every query filters on `device_id`.
#[derive(Clone)]
pub struct SchoolStorage {
    pool: SqlitePool,
}

impl SchoolStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables, apply additive column migrations, then indexes.
    /// Safe to run against an already-initialized store.
    ///
    /// Rows from single-user stores get `legacy_device_id` as their tenant,
    /// and a legacy `attendance` table is rebuilt so uniqueness holds per
    /// (tenant, student, date) rather than per (student, date).
    pub async fn init_schema(&self, legacy_device_id: &str) -> Result<(), HomeroomError> {
        self.execute_batch(SQLITE_INIT).await?;
        for (table, column, definition) in LEGACY_COLUMNS {
            let added = self.add_column_if_missing(table, column, definition).await?;
            if added && *column == TENANT_COLUMN {
                self.assign_legacy_tenant(table, legacy_device_id).await?;
            }
        }
        if self
            .has_unique_index_on("attendance", LEGACY_ATTENDANCE_UNIQUE)
            .await?
        {
            self.rebuild_attendance().await?;
        }
        self.execute_batch(SQLITE_INDEXES).await?;
        Ok(())
    }

    // sqlx::query runs one statement at a time
    async fn execute_batch(&self, sql: &str) -> Result<(), HomeroomError> {
        for stmt in sql.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// `table`, `column` and `definition` come from `LEGACY_COLUMNS`,
    /// never from request input; DDL cannot take bound parameters.
    async fn add_column_if_missing(
        &self,
        table: &str,
        column: &str,
        definition: &str,
    ) -> Result<bool, HomeroomError> {
        let present: Option<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info(?) WHERE name = ?")
                .bind(table)
                .bind(column)
                .fetch_optional(&self.pool)
                .await?;
        if present.is_some() {
            return Ok(false);
        }
        sqlx::query(&format!(
            "ALTER TABLE {table} ADD COLUMN {column} {definition}"
        ))
        .execute(&self.pool)
        .await?;
        info!(table, column, "migrated legacy table");
        Ok(true)
    }

    async fn assign_legacy_tenant(
        &self,
        table: &str,
        legacy_device_id: &str,
    ) -> Result<(), HomeroomError> {
        let assigned = sqlx::query(&format!(
            "UPDATE {table} SET {TENANT_COLUMN} = ? WHERE {TENANT_COLUMN} = ''"
        ))
        .bind(legacy_device_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        info!(table, legacy_device_id, assigned, "assigned legacy rows to tenant");
        Ok(())
    }

    /// True when `table` has a unique index over exactly `columns`, in order.
    async fn has_unique_index_on(
        &self,
        table: &str,
        columns: &[&str],
    ) -> Result<bool, HomeroomError> {
        let indexes: Vec<(String,)> =
            sqlx::query_as(r#"SELECT name FROM pragma_index_list(?) WHERE "unique" = 1"#)
                .bind(table)
                .fetch_all(&self.pool)
                .await?;
        for (index,) in indexes {
            let indexed: Vec<(Option<String>,)> =
                sqlx::query_as("SELECT name FROM pragma_index_info(?) ORDER BY seqno")
                    .bind(&index)
                    .fetch_all(&self.pool)
                    .await?;
            if indexed
                .iter()
                .map(|(name,)| name.as_deref())
                .eq(columns.iter().map(|c| Some(*c)))
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn rebuild_attendance(&self) -> Result<(), HomeroomError> {
        let mut tx = self.pool.begin().await?;
        for stmt in ATTENDANCE_REBUILD {
            sqlx::query(stmt).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!("rebuilt legacy attendance table with per-tenant uniqueness");
        Ok(())
    }

    pub async fn list_students(&self, device_id: &str) -> Result<Vec<Student>, HomeroomError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE device_id = ? ORDER BY number, id"
        ))
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    pub async fn get_student(
        &self,
        device_id: &str,
        id: i64,
    ) -> Result<Option<Student>, HomeroomError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = ? AND device_id = ?"
        ))
        .bind(id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    /// Insert a student and return its generated id.
    pub async fn create_student(&self, fields: &StudentFields) -> Result<i64, HomeroomError> {
        let result = sqlx::query(
            r#"INSERT INTO students (device_id, number, name, phone, parent_phone, memo)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&fields.device_id)
        .bind(fields.number)
        .bind(&fields.name)
        .bind(&fields.phone)
        .bind(&fields.parent_phone)
        .bind(&fields.memo)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Replace every mutable field. Returns the number of rows touched;
    /// zero when the id is unknown to this tenant.
    pub async fn update_student(
        &self,
        id: i64,
        fields: &StudentFields,
    ) -> Result<u64, HomeroomError> {
        let result = sqlx::query(
            r#"UPDATE students SET
                number = ?,
                name = ?,
                phone = ?,
                parent_phone = ?,
                memo = ?
              WHERE id = ? AND device_id = ?"#,
        )
        .bind(fields.number)
        .bind(&fields.name)
        .bind(&fields.phone)
        .bind(&fields.parent_phone)
        .bind(&fields.memo)
        .bind(id)
        .bind(&fields.device_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a student together with its attendance and records, in one
    /// transaction. Returns the number of student rows removed.
    pub async fn delete_student(&self, device_id: &str, id: i64) -> Result<u64, HomeroomError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM students WHERE id = ? AND device_id = ?")
            .bind(id)
            .bind(device_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM attendance WHERE student_id = ? AND device_id = ?")
            .bind(id)
            .bind(device_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM records WHERE student_id = ? AND device_id = ?")
            .bind(id)
            .bind(device_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(removed)
    }

    pub async fn attendance_on(
        &self,
        device_id: &str,
        date: &str,
    ) -> Result<Vec<AttendanceEntry>, HomeroomError> {
        let entries = sqlx::query_as::<_, AttendanceEntry>(
            r#"SELECT student_id, status, reason FROM attendance
               WHERE device_id = ? AND date = ?
               ORDER BY student_id"#,
        )
        .bind(device_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Insert or overwrite the mark for (tenant, student, date).
    /// Uses SQLite `INSERT ... ON CONFLICT DO UPDATE`, so concurrent
    /// submissions for the same day never produce two rows.
    pub async fn upsert_attendance(&self, mark: &AttendanceMark) -> Result<(), HomeroomError> {
        sqlx::query(
            r#"
            INSERT INTO attendance (device_id, student_id, date, status, reason)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(device_id, student_id, date) DO UPDATE SET
                status = excluded.status,
                reason = excluded.reason
            "#,
        )
        .bind(&mark.device_id)
        .bind(mark.student_id)
        .bind(&mark.date)
        .bind(&mark.status)
        .bind(&mark.reason)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn attendance_stats(
        &self,
        device_id: &str,
        student_id: i64,
    ) -> Result<Vec<StatusCount>, HomeroomError> {
        let counts = sqlx::query_as::<_, StatusCount>(
            r#"SELECT status, COUNT(*) AS count FROM attendance
               WHERE device_id = ? AND student_id = ?
               GROUP BY status
               ORDER BY status"#,
        )
        .bind(device_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Records for one student, newest first.
    pub async fn list_records(
        &self,
        device_id: &str,
        student_id: i64,
    ) -> Result<Vec<Record>, HomeroomError> {
        let records = sqlx::query_as::<_, Record>(
            r#"SELECT id, device_id, student_id, type, content, created_at FROM records
               WHERE device_id = ? AND student_id = ?
               ORDER BY created_at DESC, id DESC"#,
        )
        .bind(device_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Append a record stamped with `created_at`.
    pub async fn create_record(
        &self,
        record: NewRecord,
        created_at: String,
    ) -> Result<Record, HomeroomError> {
        let id = sqlx::query(
            r#"INSERT INTO records (device_id, student_id, type, content, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&record.device_id)
        .bind(record.student_id)
        .bind(&record.kind)
        .bind(&record.content)
        .bind(&created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Record {
            id,
            device_id: record.device_id,
            student_id: record.student_id,
            kind: record.kind,
            content: record.content,
            created_at,
        })
    }

    pub async fn delete_record(&self, device_id: &str, id: i64) -> Result<u64, HomeroomError> {
        let result = sqlx::query("DELETE FROM records WHERE id = ? AND device_id = ?")
            .bind(id)
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
