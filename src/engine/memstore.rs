use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::{Result, Error, KVReader, KVWriter, BatchExporter};
use crate::engine::persistence::NamespaceData;
use crate::engine::Persistence;

type StoreData = HashMap<String, NamespaceData>;

/// In-memory key-value storage, optionally written through to [`Persistence`].
///
/// Every write persists the touched namespace before returning, so a caller
/// that sees `Ok` knows the file on disk matches memory.
pub struct MemStorage {
    data: RwLock<StoreData>,
    persistence: Option<Arc<Persistence>>,
}

impl MemStorage {
    pub fn new(initial_data: StoreData, persistence: Option<Arc<Persistence>>) -> Self {
        Self {
            data: RwLock::new(initial_data),
            persistence,
        }
    }

    /// Storage without a backing directory. Used by tests and as the store default.
    pub fn ephemeral() -> Self {
        Self::new(HashMap::new(), None)
    }

    pub fn namespaces(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, data: &StoreData, namespace: &str) -> Result<()> {
        if let Some(p) = &self.persistence {
            let empty = NamespaceData::new();
            p.save_namespace(namespace, data.get(namespace).unwrap_or(&empty))?;
        }
        Ok(())
    }
}

impl KVReader for MemStorage {
    fn get(&self, namespace: &str, key: &str) -> Result<serde_json::Value> {
        let data = self.read();
        data.get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned()
            .ok_or(Error::KeyNotFound)
    }
}

impl KVWriter for MemStorage {
    fn set(&self, namespace: &str, key: &str, value: serde_json::Value) -> Result<()> {
        let mut data = self.write();
        data.entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self.persist(&data, namespace)
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<()> {
        let mut data = self.write();
        let removed = data
            .get_mut(namespace)
            .and_then(|ns| ns.remove(key))
            .is_some();
        if removed {
            self.persist(&data, namespace)?;
        }
        Ok(())
    }
}

impl BatchExporter for MemStorage {
    fn dump(&self, namespace: &str) -> Result<HashMap<String, serde_json::Value>> {
        Ok(self.read().get(namespace).cloned().unwrap_or_default())
    }
}
