use anyhow::Result;

/// Synchronous key/value store holding serialized session state.
pub trait SessionStorage: Send {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub type SessionStorageBox = Box<dyn SessionStorage>;
