mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::domain::models::SessionStorageBox;

/// Storage for this run: in memory when `ephemeral`, otherwise under the
/// configured data directory.
pub fn session_storage(ephemeral: bool) -> SessionStorageBox {
    if ephemeral {
        tracing::info!("using in-memory session storage");
        return Box::new(MemoryStorage::new());
    }

    let storage = FileStorage::default();
    tracing::info!(dir = %storage.dir().display(), "using file session storage");
    return Box::new(storage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::SessionStore;

    #[test]
    fn test_ephemeral_storage_starts_empty() {
        let mut store = SessionStore::load(session_storage(true));
        assert!(store.sessions().is_empty());

        store.start_new_session();
        assert_eq!(SessionStore::load(session_storage(true)).sessions().len(), 0);
    }
}
