// ABOUTME: In-memory property store with injectable save failures.
// ABOUTME: Records save calls so callers can assert on persistence order.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{PropertyStore, StoreError, service_property_key};
use crate::types::ServiceName;

/// Property store that never touches disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
    saved: Mutex<BTreeMap<String, String>>,
    save_failure: Mutex<Option<String>>,
    save_count: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail with an I/O error carrying `message`.
    pub fn fail_saves(&self, message: impl Into<String>) {
        *self.save_failure.lock() = Some(message.into());
    }

    /// Values as of the last successful save.
    pub fn saved_values(&self) -> BTreeMap<String, String> {
        self.saved.lock().clone()
    }

    /// Current in-memory values, saved or not.
    pub fn values(&self) -> BTreeMap<String, String> {
        self.values.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.save_count.lock()
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    fn get_service_property(&self, service: &ServiceName, key: &str) -> Option<String> {
        self.values
            .lock()
            .get(&service_property_key(service, key))
            .cloned()
    }

    fn set_service_property(&self, service: &ServiceName, key: &str, value: &str) {
        self.values
            .lock()
            .insert(service_property_key(service, key), value.to_string());
    }

    async fn save(&self) -> Result<(), StoreError> {
        *self.save_count.lock() += 1;

        if let Some(message) = self.save_failure.lock().clone() {
            return Err(StoreError::Write {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other(message),
            });
        }

        let values = self.values.lock();
        *self.saved.lock() = values.clone();
        Ok(())
    }
}
