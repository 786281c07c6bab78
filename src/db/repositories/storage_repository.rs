use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct StorageSlotRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl TryFrom<&Row<'_>> for StorageSlotRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            key: row.get("key")?,
            value: row.get("value")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// The persistence port: synchronous get/set of opaque strings under
/// logical keys. Repositories built on top own the payload formats.
pub struct StorageRepository;

impl StorageRepository {
    pub fn get(conn: &Connection, key: &str) -> AppResult<Option<StorageSlotRow>> {
        let mut stmt =
            conn.prepare("SELECT key, value, updated_at FROM storage_slots WHERE key = ?1")?;

        let row = stmt
            .query_row([key], |row| StorageSlotRow::try_from(row))
            .optional()?;

        Ok(row)
    }

    pub fn upsert(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO storage_slots (key, value)
                VALUES (:key, :value)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = CURRENT_TIMESTAMP
            "#,
            named_params! {":key": key, ":value": value},
        )?;

        Ok(())
    }

    pub fn delete(conn: &Connection, key: &str) -> AppResult<()> {
        conn.execute("DELETE FROM storage_slots WHERE key = ?1", [key])?;
        Ok(())
    }
}
