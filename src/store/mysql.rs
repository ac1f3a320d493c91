use super::{EmployeeStore, StoreError, decode_record, encode_record};
use crate::model::employee::EmployeeRecord;
use async_trait::async_trait;
use futures_util::StreamExt;
use sqlx::MySqlPool;
use tracing::{debug, error};

/// MySQL error class for integrity constraint violations (duplicate key).
const DUPLICATE_KEY_STATE: &str = "23000";

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS employee_records (
    id          VARCHAR(191) NOT NULL PRIMARY KEY,
    payload     LONGTEXT     NOT NULL,
    is_active   BOOLEAN      NOT NULL DEFAULT TRUE,
    created_at  TIMESTAMP    NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Records stored as serialized JSON text, one row per identifier.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

/// Duplicate primary keys become `Conflict`; everything else is a backend failure.
fn insert_error(id: &str, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(DUPLICATE_KEY_STATE) {
            return StoreError::Conflict(id.to_string());
        }
    }
    error!(error = %e, id, "Failed to insert employee record");
    e.into()
}

#[async_trait]
impl EmployeeStore for MySqlStore {
    async fn get(&self, id: &str) -> Result<Option<EmployeeRecord>, StoreError> {
        let payload = sqlx::query_scalar::<_, String>(
            "SELECT payload FROM employee_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to fetch employee record");
            StoreError::from(e)
        })?;

        payload.map(|p| decode_record(id, &p)).transpose()
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employee_records WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found > 0)
    }

    async fn put(&self, record: &EmployeeRecord) -> Result<(), StoreError> {
        let payload = encode_record(record)?;

        let result = sqlx::query(
            r#"INSERT INTO employee_records (id, payload, is_active) VALUES (?, ?, ?)"#,
        )
        .bind(&record.id)
        .bind(payload)
        .bind(record.active)
        .execute(&self.pool)
        .await;

        result.map(|_| ()).map_err(|e| insert_error(&record.id, e))
    }

    async fn identifiers(&self) -> Result<Vec<String>, StoreError> {
        let mut stream =
            sqlx::query_as::<_, (String,)>("SELECT id FROM employee_records").fetch(&self.pool);

        let mut ids = Vec::new();
        while let Some(row) = stream.next().await {
            let (id,) = row?;
            ids.push(id);
        }

        debug!(count = ids.len(), "Loaded employee identifiers");
        Ok(ids)
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<Vec<EmployeeRecord>, StoreError> {
        let offset = (page.max(1) - 1) as i64 * per_page as i64;

        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT id, payload FROM employee_records ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|(id, payload)| decode_record(id, payload)).collect()
    }

    async fn count(&self, active_only: bool) -> Result<i64, StoreError> {
        let sql = if active_only {
            "SELECT COUNT(*) FROM employee_records WHERE is_active = TRUE"
        } else {
            "SELECT COUNT(*) FROM employee_records"
        };

        let total = sqlx::query_scalar::<_, i64>(sql).fetch_one(&self.pool).await?;
        Ok(total)
    }
}
