use crate::model::employee::EmployeeRecord;
use async_trait::async_trait;
use derive_more::Display;
use strum_macros::{Display as StrumDisplay, EnumString};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Display)]
pub enum StoreError {
    /// Insert-only store: the key is already present.
    #[display(fmt = "record {} already exists", _0)]
    Conflict(String),
    #[display(fmt = "stored record {} is corrupt: {}", id, reason)]
    Corrupt { id: String, reason: String },
    #[display(fmt = "storage backend error: {}", _0)]
    Backend(String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Which [`EmployeeStore`] implementation the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Memory,
    Mysql,
}

/// Keyed repository of employee records.
///
/// Records are never updated or removed; `put` refuses an existing key.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<EmployeeRecord>, StoreError>;

    async fn exists(&self, id: &str) -> Result<bool, StoreError>;

    async fn put(&self, record: &EmployeeRecord) -> Result<(), StoreError>;

    /// Every stored key, used to warm the identifier index.
    async fn identifiers(&self) -> Result<Vec<String>, StoreError>;

    /// Records ordered by id; `page` starts at 1.
    async fn list(&self, page: u32, per_page: u32) -> Result<Vec<EmployeeRecord>, StoreError>;

    async fn count(&self, active_only: bool) -> Result<i64, StoreError>;
}

pub(crate) fn decode_record(id: &str, payload: &str) -> Result<EmployeeRecord, StoreError> {
    serde_json::from_str(payload).map_err(|e| StoreError::Corrupt {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn encode_record(record: &EmployeeRecord) -> Result<String, StoreError> {
    serde_json::to_string(record).map_err(|e| StoreError::Corrupt {
        id: record.id.clone(),
        reason: e.to_string(),
    })
}
