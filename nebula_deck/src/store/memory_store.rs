use super::KeyValueStore;
use crate::error::ApiResult;
use std::collections::HashMap;

/// Volatile store, useful for embedding and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: HashMap<String, Vec<u8>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, name: &str) -> ApiResult<Option<Vec<u8>>> {
        Ok(self.records.get(name).cloned())
    }

    fn set(&mut self, name: &str, bytes: &[u8]) -> ApiResult<()> {
        self.records.insert(name.to_string(), bytes.to_vec());
        self.writes += 1;
        Ok(())
    }
}
