//! Sink for cleaned records: one SQLite table per target entity.

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;

use crate::models::{Record, SemanticField};

use super::sqlite::{table_columns, validate_identifier};
use super::DatabaseError;

/// Column stamped on every inserted row.
pub const LOADED_AT_COLUMN: &str = "loaded_at";

/// Destination for cleaned records.
///
/// `insert_batch` is all-or-nothing: on error no record of the batch is
/// stored, so callers can retry the batch record by record.
pub trait RecordStore: Send + Sync {
    /// Create the table for `entity` (or add missing field columns).
    fn ensure_table(&self, entity: &str, fields: &[SemanticField]) -> Result<(), DatabaseError>;

    fn insert_batch(&self, entity: &str, records: &[Record]) -> Result<usize, DatabaseError>;

    fn insert_one(&self, entity: &str, record: &Record) -> Result<(), DatabaseError>;
}

/// SQLite-backed record store.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Number of rows stored for `entity`.
    pub fn count(&self, entity: &str) -> Result<i64, DatabaseError> {
        let table = validate_identifier(entity)?;
        let conn = self.lock()?;
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    /// All rows of `entity` as JSON objects, in insertion order.
    pub fn fetch_all(&self, entity: &str) -> Result<Vec<Record>, DatabaseError> {
        let table = validate_identifier(entity)?;
        let conn = self.lock()?;
        let columns = table_columns(&conn, table)?;
        if columns.is_empty() {
            return Err(DatabaseError::TableNotFound(table.to_string()));
        }

        let mut stmt = conn.prepare(&format!("SELECT * FROM \"{table}\" ORDER BY rowid"))?;
        let rows = stmt.query_map([], |row| {
            let mut record = Record::new();
            for (i, column) in columns.iter().enumerate() {
                let value: SqlValue = row.get(i)?;
                record.insert(column.clone(), json_from_sql(value));
            }
            Ok(record)
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl RecordStore for SqliteRecordStore {
    fn ensure_table(&self, entity: &str, fields: &[SemanticField]) -> Result<(), DatabaseError> {
        let table = validate_identifier(entity)?;
        for field in fields {
            validate_identifier(&field.name)?;
        }

        let conn = self.lock()?;
        let existing: HashSet<String> = table_columns(&conn, table)?.into_iter().collect();

        if existing.is_empty() {
            let mut columns: Vec<String> = fields.iter().map(|f| format!("\"{}\"", f.name)).collect();
            columns.push(format!("\"{LOADED_AT_COLUMN}\" TEXT NOT NULL"));
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS \"{table}\" ({});",
                columns.join(", ")
            ))?;
            tracing::info!(table, columns = fields.len(), "Created record table");
            return Ok(());
        }

        for field in fields.iter().filter(|f| !existing.contains(&f.name)) {
            conn.execute_batch(&format!(
                "ALTER TABLE \"{table}\" ADD COLUMN \"{}\";",
                field.name
            ))?;
            tracing::info!(table, column = %field.name, "Added missing column");
        }
        Ok(())
    }

    fn insert_batch(&self, entity: &str, records: &[Record]) -> Result<usize, DatabaseError> {
        let table = validate_identifier(entity)?;
        let conn = self.lock()?;
        let columns = known_columns(&conn, table)?;
        let loaded_at = Utc::now().to_rfc3339();

        let tx = conn.unchecked_transaction()?;
        for record in records {
            insert_record(&tx, table, &columns, record, &loaded_at)?;
        }
        tx.commit()?;

        Ok(records.len())
    }

    fn insert_one(&self, entity: &str, record: &Record) -> Result<(), DatabaseError> {
        let table = validate_identifier(entity)?;
        let conn = self.lock()?;
        let columns = known_columns(&conn, table)?;
        insert_record(&conn, table, &columns, record, &Utc::now().to_rfc3339())
    }
}

fn known_columns(conn: &Connection, table: &str) -> Result<HashSet<String>, DatabaseError> {
    let columns: HashSet<String> = table_columns(conn, table)?.into_iter().collect();
    if columns.is_empty() {
        return Err(DatabaseError::TableNotFound(table.to_string()));
    }
    Ok(columns)
}

fn insert_record(
    conn: &Connection,
    table: &str,
    columns: &HashSet<String>,
    record: &Record,
    loaded_at: &str,
) -> Result<(), DatabaseError> {
    let mut names = Vec::with_capacity(record.len() + 1);
    let mut values = Vec::with_capacity(record.len() + 1);
    for (key, value) in record {
        if key == LOADED_AT_COLUMN || !columns.contains(key) {
            tracing::debug!(table, key = %key, "Skipping key with no matching column");
            continue;
        }
        names.push(format!("\"{key}\""));
        values.push(sql_from_json(value));
    }
    names.push(format!("\"{LOADED_AT_COLUMN}\""));
    values.push(SqlValue::Text(loaded_at.to_string()));

    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    conn.execute(
        &format!(
            "INSERT INTO \"{table}\" ({}) VALUES ({})",
            names.join(", "),
            placeholders.join(", ")
        ),
        params_from_iter(values),
    )?;
    Ok(())
}

/// Map a cleaned JSON value onto SQLite storage classes.
fn sql_from_json(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn json_from_sql(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => Value::from(f),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(b) => Value::from(b),
    }
}
