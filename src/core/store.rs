use anyhow::Result;

/// A durable string slot per key.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites any prior value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}
