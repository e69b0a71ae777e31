use serde::{Deserialize, Serialize};
use std::fmt::Display;
use ulid::Ulid;

/// Opaque catalog entry identifier. Assigned once at creation, never reused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct EntryId(String);

impl EntryId {
    #[inline]
    pub fn new() -> EntryId {
        EntryId(Ulid::new().to_string())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(fr: &str) -> Self {
        EntryId(fr.to_string())
    }
}

impl From<String> for EntryId {
    fn from(fr: String) -> Self {
        EntryId(fr)
    }
}
