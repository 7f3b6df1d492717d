use crate::core::store::KeyValueStore;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory store, lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .inner
            .read()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        let value = entries.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {}", key);
        } else {
            debug!("Store MISS for key: {}", key);
        }
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .inner
            .write()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        debug!("Store PUT for key: {}", key);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
