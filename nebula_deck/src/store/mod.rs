//! Persistent key-value storage for the deck and the catalog address

pub mod file_store;
pub mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use crate::error::ApiResult;

/// Record holding the serialized deck
pub const DECK_RECORD: &str = "nebula_deck";

/// Record holding the last-used catalog base address
pub const API_BASE_RECORD: &str = "nebula_api_base";

/// Opaque byte store with named records
pub trait KeyValueStore {
    fn get(&self, name: &str) -> ApiResult<Option<Vec<u8>>>;
    fn set(&mut self, name: &str, bytes: &[u8]) -> ApiResult<()>;
}

/// Read the saved catalog address, if any
pub fn load_api_base<S: KeyValueStore>(store: &S) -> Option<String> {
    match store.get(API_BASE_RECORD) {
        Ok(Some(bytes)) => Some(String::from_utf8_lossy(&bytes).trim().to_string())
            .filter(|value| !value.is_empty()),
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to read saved API base: {}", e);
            None
        }
    }
}

/// Remember the catalog address for the next session
pub fn save_api_base<S: KeyValueStore>(store: &mut S, value: &str) -> ApiResult<()> {
    store.set(API_BASE_RECORD, value.trim().as_bytes())
}
