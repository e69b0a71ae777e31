use crate::entry_id::EntryId;
use crate::storage::StorageManager;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    sync::{Arc, RwLock},
};

/// Fixed key the catalog snapshot is persisted under.
pub const CATALOG_KEY: &str = "catalog.json";

const PLACEHOLDER_TITLE: &str = "Untitled";

/// Closed set of categories the classifier may assign. Anything outside this
/// set in a service response fails deserialization and aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Frontend,
    Backend,
    DevOps,
    #[serde(rename = "AI/ML")]
    AiMl,
    Design,
    Productivity,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Frontend => "Frontend",
            Category::Backend => "Backend",
            Category::DevOps => "DevOps",
            Category::AiMl => "AI/ML",
            Category::Design => "Design",
            Category::Productivity => "Productivity",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,

    pub title: String,
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default)]
    pub processed: bool,

    pub added_at: i64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::hash::Hash for Entry {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Entry {
    /// Fresh unprocessed entry. Blank anchor text falls back to a placeholder.
    pub fn new(title: Option<String>, url: String) -> Entry {
        Entry {
            id: EntryId::new(),
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            url,
            description: None,
            category: None,
            tags: None,
            processed: false,
            added_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Authoritative in-memory catalog, persisted as a single JSON blob after
/// every mutation. Persistence is best-effort: a failed write is logged and
/// the in-memory state stays authoritative for the session.
pub struct CatalogStore {
    list: RwLock<Vec<Entry>>,
    store: Arc<dyn StorageManager>,
}

impl CatalogStore {
    pub fn load(store: Arc<dyn StorageManager>) -> anyhow::Result<Self> {
        let list: Vec<Entry> = if store.exists(CATALOG_KEY) {
            serde_json::from_slice(&store.read(CATALOG_KEY)?)?
        } else {
            log::info!("no catalog found, starting empty");
            vec![]
        };

        log::debug!("catalog loaded with {} entries", list.len());

        Ok(CatalogStore {
            list: RwLock::new(list),
            store,
        })
    }

    fn persist(&self) {
        let list = self.list.read().unwrap();
        match serde_json::to_vec_pretty(&*list) {
            Ok(data) => {
                if let Err(err) = self.store.write(CATALOG_KEY, &data) {
                    log::warn!("failed to persist catalog ({} entries): {err}", list.len());
                }
            }
            Err(err) => log::warn!("failed to serialize catalog: {err}"),
        }
    }

    /// Append new entries, skipping any whose url is already in the catalog.
    /// Returns how many were actually added.
    pub fn append(&self, entries: Vec<Entry>) -> usize {
        let mut list = self.list.write().unwrap();
        let mut added = 0;
        for entry in entries {
            if list.iter().any(|e| e.url == entry.url) {
                log::debug!("skipping duplicate url {}", entry.url);
                continue;
            }
            list.push(entry);
            added += 1;
        }
        drop(list);

        if added > 0 {
            self.persist();
        }

        added
    }

    /// Bulk merge of enriched entries by id. Ids no longer present (deleted
    /// while a run was in flight) are silently skipped. Returns how many
    /// entries were replaced.
    pub fn commit(&self, updated: Vec<Entry>) -> usize {
        let mut list = self.list.write().unwrap();
        let mut merged = 0;
        for entry in updated {
            if let Some(existing) = list.iter_mut().find(|e| e.id == entry.id) {
                *existing = entry;
                merged += 1;
            } else {
                log::debug!("entry {} gone from catalog, dropping update", entry.id);
            }
        }
        drop(list);

        if merged > 0 {
            self.persist();
        }

        merged
    }

    pub fn delete(&self, id: &EntryId) -> bool {
        let mut list = self.list.write().unwrap();
        let found = list
            .iter()
            .position(|e| &e.id == id)
            .map(|idx| {
                list.remove(idx);
            })
            .is_some();
        drop(list);

        if found {
            self.persist();
        }

        found
    }

    pub fn snapshot(&self) -> Vec<Entry> {
        self.list.read().unwrap().clone()
    }

    pub fn unprocessed(&self) -> Vec<Entry> {
        self.list
            .read()
            .unwrap()
            .iter()
            .filter(|e| !e.processed)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.list.read().unwrap().len()
    }
}
