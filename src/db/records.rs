//! Record and field operations

use crate::error::Result;
use sqlx::SqlitePool;

/// One collection record with its fields in declared order.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: i64,
    pub fields: Vec<Field>,
}

/// A named field value within a record.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Record {
    /// Value of the field with exactly this name, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// All record ids in the collection, in stable order.
pub async fn record_ids(pool: &SqlitePool) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM records ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// Load one record's fields, ordered as declared in the collection.
pub async fn load_record(pool: &SqlitePool, record_id: i64) -> Result<Record> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT name, value FROM fields WHERE record_id = ? ORDER BY ord",
    )
    .bind(record_id)
    .fetch_all(pool)
    .await?;

    Ok(Record {
        id: record_id,
        fields: rows
            .into_iter()
            .map(|(name, value)| Field { name, value })
            .collect(),
    })
}

/// Update one field value. Autocommitted: the change is durable once this
/// returns, before the next record is processed.
pub async fn write_field(pool: &SqlitePool, record_id: i64, name: &str, value: &str) -> Result<()> {
    sqlx::query("UPDATE fields SET value = ? WHERE record_id = ? AND name = ?")
        .bind(value)
        .bind(record_id)
        .bind(name)
        .execute(pool)
        .await?;
    Ok(())
}
