use crate::core::store::KeyValueStore;
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION_NAME: &str = "budget";

/// Store backed by a `fjall` keyspace on disk.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create store directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION_NAME, PartitionCreateOptions::default())
            .context("Failed to open budget partition")?;

        debug!("Opened disk store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueStore for DiskStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match self.partition.get(key)? {
            Some(bytes) => {
                debug!("Store HIT for key: {}", key);
                let value = String::from_utf8(bytes.to_vec())
                    .with_context(|| format!("Stored value for {key} is not UTF-8"))?;
                Ok(Some(value))
            }
            None => {
                debug!("Store MISS for key: {}", key);
                Ok(None)
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.partition.insert(key, value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_disk_store_read_write() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        assert!(store.read("key1").unwrap().is_none());

        store.write("key1", "{\"a\":1}").unwrap();
        assert_eq!(store.read("key1").unwrap().as_deref(), Some("{\"a\":1}"));

        store.write("key1", "{}").unwrap();
        assert_eq!(store.read("key1").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store.write("key1", "kept").unwrap();
        }

        let reopened = DiskStore::open(dir.path()).unwrap();
        assert_eq!(reopened.read("key1").unwrap().as_deref(), Some("kept"));
    }
}
