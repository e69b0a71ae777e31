use crate::catalog::{CatalogStore, Category, Entry};
use crate::enrich::classifier::{Classification, Classifier, ClassifyItem, ServiceError};
use crate::storage::{BackendMemory, StorageManager};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

pub fn memory_catalog() -> Arc<CatalogStore> {
    Arc::new(CatalogStore::load(Arc::new(BackendMemory::default())).unwrap())
}

pub fn entry(title: &str, url: &str) -> Entry {
    Entry::new(Some(title.to_string()), url.to_string())
}

pub fn classification_for(item: &ClassifyItem, category: Category) -> Classification {
    Classification {
        url: item.url.clone(),
        category,
        description: format!("about {}", item.title),
        tags: vec!["web".to_string(), "saved".to_string(), "tools".to_string()],
    }
}

/// Answers every item with a fixed category and derived description/tags.
pub struct EchoClassifier {
    pub category: Category,
}

impl Classifier for EchoClassifier {
    fn classify(&self, items: &[ClassifyItem]) -> Result<Vec<Classification>, ServiceError> {
        Ok(items
            .iter()
            .map(|item| classification_for(item, self.category))
            .collect())
    }

    fn name(&self) -> &'static str {
        "echo"
    }
}

/// Succeeds like EchoClassifier until the given call number, then fails with
/// a 503 on that call and every later one.
pub struct FailingClassifier {
    fail_at: usize,
    calls: AtomicUsize,
}

impl FailingClassifier {
    pub fn new(fail_at: usize) -> Self {
        Self {
            fail_at,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Classifier for FailingClassifier {
    fn classify(&self, items: &[ClassifyItem]) -> Result<Vec<Classification>, ServiceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call >= self.fail_at {
            return Err(ServiceError::Status(503));
        }

        Ok(items
            .iter()
            .map(|item| classification_for(item, Category::Other))
            .collect())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Backend whose writes always fail. Reads behave as an empty store.
pub struct BrokenStorage;

impl StorageManager for BrokenStorage {
    fn write(&self, _ident: &str, _data: &[u8]) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
    }

    fn read(&self, ident: &str) -> std::io::Result<Vec<u8>> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            ident.to_string(),
        ))
    }

    fn exists(&self, _ident: &str) -> bool {
        false
    }

    fn delete(&self, _ident: &str) -> std::io::Result<()> {
        Ok(())
    }
}
