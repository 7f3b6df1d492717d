pub mod disk;
pub mod memory;

use crate::core::store::KeyValueStore;
use disk::DiskStore;
use memory::MemoryStore;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Opens the on-disk store under `data_path`, falling back to memory.
///
/// Budget edits made against the fallback are lost at exit, but the
/// calculators stay usable when the data directory is not writable.
pub fn open_store(data_path: &Path) -> Arc<dyn KeyValueStore> {
    let store_dir = data_path.join("store");
    match DiskStore::open(&store_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Failed to open disk store, budget will not be saved");
            Arc::new(MemoryStore::new())
        }
    }
}
