use super::KeyValueStore;
use crate::error::{ApiError, ApiResult};
use std::path::{Path, PathBuf};

/// Store that keeps one file per record in a data directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> ApiResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        log::info!("Data directory: {:?}", dir);
        Ok(Self { dir })
    }

    /// Get the default data directory path
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nebula_deck")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> ApiResult<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ApiError::Store(format!("Invalid record name: {:?}", name)));
        }
        Ok(self.dir.join(name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, name: &str) -> ApiResult<Option<Vec<u8>>> {
        let path = self.path(name)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, name: &str, bytes: &[u8]) -> ApiResult<()> {
        let path = self.path(name)?;
        // Replace via rename; readers never see a partial record
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        log::debug!("Saved record {} ({} bytes)", name, bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_get_missing_record() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.get("nebula_deck").unwrap().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let (mut store, _temp_dir) = create_test_store();
        store.set("nebula_deck", b"{}").unwrap();
        assert_eq!(store.get("nebula_deck").unwrap().unwrap(), b"{}".to_vec());
    }

    #[test]
    fn test_set_overwrites() {
        let (mut store, _temp_dir) = create_test_store();
        store.set("nebula_api_base", b"http://a").unwrap();
        store.set("nebula_api_base", b"http://b").unwrap();
        assert_eq!(
            store.get("nebula_api_base").unwrap().unwrap(),
            b"http://b".to_vec()
        );
    }

    #[test]
    fn test_records_persist_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = FileStore::new(temp_dir.path()).unwrap();
            store.set("nebula_deck", &[1, 2, 3]).unwrap();
        }
        let store = FileStore::new(temp_dir.path()).unwrap();
        assert_eq!(store.get("nebula_deck").unwrap().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_path_like_names() {
        let (mut store, _temp_dir) = create_test_store();
        assert!(matches!(
            store.set("../escape", b"x"),
            Err(ApiError::Store(_))
        ));
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let store = FileStore::new(&nested).unwrap();
        assert!(store.dir().exists());
    }
}
