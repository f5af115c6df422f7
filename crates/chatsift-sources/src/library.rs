//! Recovered attachments, keyed by attachment name.

use chatsift_core::RecoveredMedia;
use std::collections::BTreeMap;

/// Holds decoded images until the consumer writes or discards them.
///
/// There is no eviction. Call [`MediaLibrary::release`] once an attachment
/// has been persisted so its bytes are dropped.
#[derive(Debug, Default)]
pub struct MediaLibrary {
    items: BTreeMap<String, RecoveredMedia>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an attachment. A later insert under the same name replaces the
    /// earlier one and returns it.
    pub fn insert(&mut self, name: impl Into<String>, media: RecoveredMedia) -> Option<RecoveredMedia> {
        self.items.insert(name.into(), media)
    }

    pub fn get(&self, name: &str) -> Option<&RecoveredMedia> {
        self.items.get(name)
    }

    pub fn release(&mut self, name: &str) -> Option<RecoveredMedia> {
        self.items.remove(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Attachment names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}
