use super::{EmployeeStore, StoreError, decode_record, encode_record};
use crate::model::employee::EmployeeRecord;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Process-lifetime store holding each record as its serialized JSON text,
/// keyed by identifier.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Raw stored text for `id`.
    pub fn raw(&self, id: &str) -> Option<String> {
        self.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<EmployeeRecord>, StoreError> {
        match self.read().get(id) {
            Some(payload) => decode_record(id, payload).map(Some),
            None => Ok(None),
        }
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.read().contains_key(id))
    }

    async fn put(&self, record: &EmployeeRecord) -> Result<(), StoreError> {
        let payload = encode_record(record)?;
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());

        if entries.contains_key(&record.id) {
            return Err(StoreError::Conflict(record.id.clone()));
        }

        entries.insert(record.id.clone(), payload);
        Ok(())
    }

    async fn identifiers(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read().keys().cloned().collect())
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<Vec<EmployeeRecord>, StoreError> {
        let offset = (page.max(1) - 1) as usize * per_page as usize;

        self.read()
            .iter()
            .skip(offset)
            .take(per_page as usize)
            .map(|(id, payload)| decode_record(id, payload))
            .collect()
    }

    async fn count(&self, active_only: bool) -> Result<i64, StoreError> {
        if !active_only {
            return Ok(self.read().len() as i64);
        }

        let mut active = 0;
        for (id, payload) in self.read().iter() {
            if decode_record(id, payload)?.active {
                active += 1;
            }
        }
        Ok(active)
    }
}
