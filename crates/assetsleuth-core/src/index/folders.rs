/// Append-only registry of every folder prefix ever observed.
///
/// Folders are registered from asset ids, never enumerated directly, and
/// are never removed: a folder whose last asset was deleted keeps reporting
/// an all-zero aggregate until the registry is rebuilt by a fresh `init`.
use crate::model::AssetId;
use compact_str::CompactString;
use std::collections::BTreeSet;

#[derive(Debug, Default, Clone)]
pub struct FolderRegistry {
    /// Sorted so aggregation walks folders in a deterministic order.
    folders: BTreeSet<CompactString>,
}

impl FolderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every strict ancestor folder of `id`. Returns how many were new.
    pub fn register_folders(&mut self, id: &AssetId) -> usize {
        let mut added = 0;
        for prefix in id.ancestor_folders() {
            if !self.folders.contains(prefix) {
                self.folders.insert(CompactString::new(prefix));
                added += 1;
            }
        }
        added
    }

    /// Registered ancestors of `id`, shallowest first.
    pub fn ancestors_of<'a>(&'a self, id: &'a AssetId) -> impl Iterator<Item = &'a str> + 'a {
        id.ancestor_folders()
            .filter(move |prefix| self.folders.contains(*prefix))
    }

    #[inline]
    pub fn contains(&self, folder: &str) -> bool {
        self.folders.contains(folder)
    }

    /// All folders in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(CompactString::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.folders.clear();
    }
}
