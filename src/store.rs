use crate::error::StoreError;
use crate::types::WebhookRecord;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Received webhooks, in arrival order.
///
/// Every operation takes the lock once, so append, snapshot and clear never
/// interleave.
#[derive(Debug, Default)]
pub struct WebhookStore {
    records: RwLock<Vec<WebhookRecord>>,
}

impl WebhookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<WebhookRecord>>, StoreError> {
        self.records.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<WebhookRecord>>, StoreError> {
        self.records.write().map_err(|_| StoreError::Poisoned)
    }

    /// Append a record and return the store size afterwards.
    pub fn append(&self, record: WebhookRecord) -> Result<usize, StoreError> {
        let mut records = self.write()?;
        records.push(record);
        Ok(records.len())
    }

    pub fn list(&self) -> Result<Vec<WebhookRecord>, StoreError> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    /// Drop every record and return how many were removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let removed = std::mem::take(&mut *self.write()?);
        Ok(removed.len())
    }

    #[cfg(test)]
    pub(crate) fn poison(self: &std::sync::Arc<Self>) {
        let store = self.clone();
        let _ = std::thread::spawn(move || {
            let _guard = store.records.write();
            panic!("poison the store");
        })
        .join();
    }
}
