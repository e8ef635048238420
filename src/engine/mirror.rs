use std::collections::HashMap;
use std::sync::Arc;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::{Error, Storage};
use crate::engine::MemStorage;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "shopfront";

/// Durable key-value mirror used by the store to persist slices.
///
/// The mirror never reports failures to its caller: writes that fail are
/// logged, and reads that fail (absent key, unreadable value, wrong shape)
/// yield the caller's default.
#[derive(Clone)]
pub struct Mirror {
    storage: Arc<dyn Storage>,
    namespace: String,
}

impl Mirror {
    pub fn new(storage: Arc<dyn Storage>, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    /// A mirror over fresh in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemStorage::ephemeral()), DEFAULT_NAMESPACE)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Serializes `value` and writes it under `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_value(value)
            .map_err(Error::from)
            .and_then(|v| self.storage.set(&self.namespace, key, v));
        if let Err(e) = result {
            warn!("Failed to persist {}/{}: {}", self.namespace, key, e);
        }
    }

    /// Reads and deserializes `key`, falling back to `default`.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let value = match self.storage.get(&self.namespace, key) {
            Ok(v) => v,
            Err(Error::KeyNotFound) => return default,
            Err(e) => {
                warn!("Could not read {}/{}: {}", self.namespace, key, e);
                return default;
            }
        };
        match serde_json::from_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("Discarding unreadable value at {}/{}: {}", self.namespace, key, e);
                default
            }
        }
    }

    /// Removes `key` entirely.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.storage.delete(&self.namespace, key) {
            warn!("Failed to remove {}/{}: {}", self.namespace, key, e);
        }
    }

    /// Raw snapshot of everything stored in the namespace.
    pub fn snapshot(&self) -> HashMap<String, serde_json::Value> {
        match self.storage.dump(&self.namespace) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not dump namespace {}: {}", self.namespace, e);
                HashMap::new()
            }
        }
    }
}
