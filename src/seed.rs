use anyhow::{anyhow, Result};
use std::{fs, path::Path};

use study604_core::store::memory::MemoryStore;

/// Loads a JSON file with the rows of all collections
/// into an in-memory store.
pub fn load_memory_store(path: &Path) -> Result<MemoryStore> {
    let json = fs::read_to_string(path)
        .map_err(|err| anyhow!("Unable to read seed file {}: {err}", path.display()))?;
    let seed = serde_json::from_str(&json)
        .map_err(|err| anyhow!("Invalid seed file {}: {err}", path.display()))?;
    let store = MemoryStore::from_json(seed)?;
    log::info!("Loaded rows from {}", path.display());
    Ok(store)
}
