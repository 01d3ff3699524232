/// Unused-asset snapshot and per-folder aggregates.
///
/// The snapshot is derived state. It is produced by [`update_unused_assets`]
/// from the index as it stands at that moment and is never refreshed behind
/// the caller's back. Incremental callers may patch a few folders with
/// [`UnusedSnapshot::update_folders_with_qty_by_path`]; everything else
/// stays as it was until the next full pass.
use crate::contracts::{AssetClassifier, IgnoreFilter};
use crate::error::Result;
use crate::index::{BacklinkIndex, FolderRegistry};
use crate::model::{AssetId, FolderStats};
use compact_str::CompactString;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnusedSnapshot {
    /// Unused non-scene assets and their byte sizes.
    pub files: BTreeMap<AssetId, u64>,
    /// Unused scene-like assets and their byte sizes.
    pub scenes: BTreeMap<AssetId, u64>,
    /// Aggregate for every registered folder, including empty ones.
    pub folders: BTreeMap<CompactString, FolderStats>,
}

/// Derive a fresh snapshot from the index.
///
/// An asset is unused when it has a forward row, nothing references it
/// and the ignore filter lets it through. Whether the *referencing* asset
/// is itself unused does not matter. Folder aggregates are recomputed for
/// every registered folder.
pub fn update_unused_assets<C, F>(
    index: &BacklinkIndex,
    folders: &FolderRegistry,
    classifier: &C,
    ignore: &F,
) -> Result<UnusedSnapshot>
where
    C: AssetClassifier + ?Sized,
    F: IgnoreFilter + ?Sized,
{
    let start = Instant::now();
    let mut snapshot = UnusedSnapshot::default();

    let candidates = index
        .assets()
        .filter(|id| !index.is_referenced(id.as_str()))
        .filter(|id| !ignore.is_ignored(id));

    for id in candidates {
        let size = classifier.file_size(id)?;
        if classifier.is_scene_like(id) {
            snapshot.scenes.insert(id.clone(), size);
        } else {
            snapshot.files.insert(id.clone(), size);
        }
    }

    for folder in folders.iter() {
        let stats = snapshot.stats_under(folder);
        snapshot.folders.insert(CompactString::new(folder), stats);
    }

    debug!(
        "Unused assets: {} files, {} scenes across {} folders in {:?}",
        snapshot.files.len(),
        snapshot.scenes.len(),
        snapshot.folders.len(),
        start.elapsed()
    );
    Ok(snapshot)
}

/// Entries of `map` whose id starts with `prefix`.
///
/// Ids sharing a prefix are contiguous in a sorted map, so this is a range
/// scan rather than a full pass. Matching is plain string prefix matching:
/// `"Assets/X"` also covers `"Assets/XY/..."`.
fn under_prefix<'a>(
    map: &'a BTreeMap<AssetId, u64>,
    prefix: &'a str,
) -> impl Iterator<Item = (&'a AssetId, &'a u64)> + 'a {
    map.range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(move |(id, _)| id.starts_with(prefix))
}

impl UnusedSnapshot {
    /// Counts and total size of unused assets whose id starts with `folder`.
    pub fn stats_under(&self, folder: &str) -> FolderStats {
        let mut stats = FolderStats::default();
        for (_, size) in under_prefix(&self.files, folder) {
            stats.unused_files += 1;
            stats.unused_size += size;
        }
        for (_, size) in under_prefix(&self.scenes, folder) {
            stats.unused_scenes += 1;
            stats.unused_size += size;
        }
        stats
    }

    /// Recompute aggregates for the registered ancestors of `id` only.
    ///
    /// Other folders keep whatever they held before, so after incremental
    /// changes in many places the aggregates are only locally fresh.
    pub fn update_folders_with_qty_by_path(&mut self, id: &AssetId, folders: &FolderRegistry) {
        for folder in folders.ancestors_of(id) {
            let stats = self.stats_under(folder);
            self.folders.insert(CompactString::new(folder), stats);
        }
    }

    /// Drop `id` from the unused sets. Returns its recorded size if present.
    pub fn forget(&mut self, id: &str) -> Option<u64> {
        self.files.remove(id).or_else(|| self.scenes.remove(id))
    }

    /// Record `id` as unused in the bucket `scene_like` selects.
    pub fn record(&mut self, id: AssetId, size: u64, scene_like: bool) {
        if scene_like {
            self.scenes.insert(id, size);
        } else {
            self.files.insert(id, size);
        }
    }

    #[inline]
    pub fn is_unused(&self, id: &str) -> bool {
        self.files.contains_key(id) || self.scenes.contains_key(id)
    }

    /// Recorded aggregate for a folder, if it is registered.
    pub fn folder(&self, folder: &str) -> Option<FolderStats> {
        self.folders.get(folder).copied()
    }

    /// Unused files and scenes under `folder`, each sorted.
    pub fn unused_under(&self, folder: &str) -> (Vec<AssetId>, Vec<AssetId>) {
        let files = under_prefix(&self.files, folder).map(|(id, _)| id.clone()).collect();
        let scenes = under_prefix(&self.scenes, folder).map(|(id, _)| id.clone()).collect();
        (files, scenes)
    }

    /// Aggregate over a mixed selection of assets and folders.
    ///
    /// Each selected id counts if it is itself unused; each selected id that
    /// is a known folder also pulls in every unused asset beneath it.
    /// Overlapping picks are counted once.
    pub fn summarize_selection<'a, I>(&self, selection: I) -> FolderStats
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut files: BTreeSet<&AssetId> = BTreeSet::new();
        let mut scenes: BTreeSet<&AssetId> = BTreeSet::new();

        for id in selection {
            if let Some((key, _)) = self.files.get_key_value(id) {
                files.insert(key);
            } else if let Some((key, _)) = self.scenes.get_key_value(id) {
                scenes.insert(key);
            }
            if self.folders.contains_key(id) {
                files.extend(under_prefix(&self.files, id).map(|(key, _)| key));
                scenes.extend(under_prefix(&self.scenes, id).map(|(key, _)| key));
            }
        }

        let size: u64 = files.iter().map(|id| self.files[*id]).sum::<u64>()
            + scenes.iter().map(|id| self.scenes[*id]).sum::<u64>();
        FolderStats::new(files.len() as u64, scenes.len() as u64, size)
    }

    /// Copy of this snapshot restricted to ids and folders under `folder`.
    pub fn restricted_to(&self, folder: &str) -> Self {
        let keep = |map: &BTreeMap<AssetId, u64>| -> BTreeMap<AssetId, u64> {
            under_prefix(map, folder).map(|(id, size)| (id.clone(), *size)).collect()
        };
        Self {
            files: keep(&self.files),
            scenes: keep(&self.scenes),
            folders: self
                .folders
                .iter()
                .filter(|(name, _)| name.starts_with(folder))
                .map(|(name, stats)| (name.clone(), *stats))
                .collect(),
        }
    }

    /// Total unused bytes across files and scenes.
    pub fn total_size(&self) -> u64 {
        self.files.values().chain(self.scenes.values()).sum()
    }
}
