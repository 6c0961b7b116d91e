use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::anyhow;
use anyhow::Result;

use crate::domain::models::SessionStorage;

/// In-process storage. Clones share the same map, so a clone can observe what
/// a store wrote through another handle.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        return MemoryStorage::default();
    }

    pub fn contains(&self, key: &str) -> bool {
        return self
            .entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false);
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|err| anyhow!("{err}"))?;
        return Ok(entries.get(key).cloned());
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|err| anyhow!("{err}"))?;
        entries.insert(key.to_string(), value.to_string());
        return Ok(());
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|err| anyhow!("{err}"))?;
        entries.remove(key);
        return Ok(());
    }
}
