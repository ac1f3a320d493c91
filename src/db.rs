use crate::store::MySqlStore;
use anyhow::{Context, Result};
use sqlx::MySqlPool;

pub async fn init_db(database_url: &str) -> Result<MySqlStore> {
    let pool = MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let store = MySqlStore::new(pool);
    store
        .ensure_schema()
        .await
        .context("Failed to create employee_records table")?;

    Ok(store)
}
