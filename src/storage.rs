use std::{
    collections::HashMap,
    path::PathBuf,
    sync::RwLock,
};

use crate::entry_id::EntryId;

/// Key-value blob store. The catalog is serialized under a single fixed key;
/// the config file lives next to it.
pub trait StorageManager: Send + Sync {
    fn write(&self, ident: &str, data: &[u8]) -> std::io::Result<()>;
    fn read(&self, ident: &str) -> std::io::Result<Vec<u8>>;
    fn exists(&self, ident: &str) -> bool;
    fn delete(&self, ident: &str) -> std::io::Result<()>;
}

#[derive(Clone)]
pub struct BackendLocal {
    pub base_dir: PathBuf,
}

impl BackendLocal {
    pub fn new(storage_dir: &str) -> std::io::Result<Self> {
        let path = PathBuf::from(storage_dir);
        std::fs::create_dir_all(&path)?;
        Ok(BackendLocal { base_dir: path })
    }
}

impl StorageManager for BackendLocal {
    fn exists(&self, ident: &str) -> bool {
        std::fs::metadata(self.base_dir.join(ident)).is_ok()
    }

    fn read(&self, ident: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.base_dir.join(ident))
    }

    fn write(&self, ident: &str, data: &[u8]) -> std::io::Result<()> {
        let path = self.base_dir.join(ident);
        // write-then-rename keeps the blob intact if we die mid-write
        let temp_path = self.base_dir.join(format!("{}-{ident}", EntryId::new()));

        std::fs::write(&temp_path, data)?;
        std::fs::rename(&temp_path, &path)
    }

    fn delete(&self, ident: &str) -> std::io::Result<()> {
        std::fs::remove_file(self.base_dir.join(ident))
    }
}

/// In-memory backend, the browser-local-storage analog. Used by tests and
/// anywhere durability is not required.
#[derive(Default)]
#[allow(dead_code)]
pub struct BackendMemory {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl StorageManager for BackendMemory {
    fn exists(&self, ident: &str) -> bool {
        self.blobs.read().unwrap().contains_key(ident)
    }

    fn read(&self, ident: &str) -> std::io::Result<Vec<u8>> {
        self.blobs
            .read()
            .unwrap()
            .get(ident)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, ident.to_string()))
    }

    fn write(&self, ident: &str, data: &[u8]) -> std::io::Result<()> {
        self.blobs
            .write()
            .unwrap()
            .insert(ident.to_string(), data.to_vec());
        Ok(())
    }

    fn delete(&self, ident: &str) -> std::io::Result<()> {
        self.blobs.write().unwrap().remove(ident);
        Ok(())
    }
}
