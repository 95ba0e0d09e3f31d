use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

/// Narrow interface over whatever holds the persisted state. Writes are
/// treated as infallible by callers; implementations log failures and drop
/// them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value);
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// One file per key under a base directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(error) = fs::create_dir_all(&self.dir) {
            warn!(%error, dir = %self.dir.display(), "failed to create store directory");
            return;
        }
        let path = self.path_for(key);
        if let Err(error) = fs::write(&path, value) {
            warn!(%error, path = %path.display(), "failed to write store entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("data_atm"), None);
        store.set("data_atm", "[]");
        assert_eq!(store.get("data_atm").as_deref(), Some("[]"));
        store.set("data_atm", "[1]");
        assert_eq!(
            store.get("data_atm").as_deref(),
            Some("[1]"),
            "set replaces prior contents"
        );
    }

    #[test]
    fn file_store_round_trips_values() {
        let dir = std::env::temp_dir().join(format!("atm-store-test-{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get("data_atm"), None);
        store.set("data_atm", r#"{"version":1,"accounts":[]}"#);
        assert_eq!(
            store.get("data_atm").as_deref(),
            Some(r#"{"version":1,"accounts":[]}"#)
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn boxed_stores_delegate() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
