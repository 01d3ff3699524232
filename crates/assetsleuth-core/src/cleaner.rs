/// `AssetCleaner`: the single entry point frontends talk to.
///
/// Owns the backlink index, the folder registry and the latest unused
/// snapshot, together with the collaborators needed to keep them fed.
/// All operations run synchronously on the calling thread; callers must
/// serialise access to one instance.
use crate::analysis::{self, UnusedSnapshot};
use crate::config::{CleanerConfig, PathIgnoreFilter};
use crate::contracts::{AssetClassifier, DependencyResolver, IgnoreFilter, ProgressSink};
use crate::error::Result;
use crate::index::{BacklinkIndex, FolderRegistry};
use crate::model::{AssetId, FolderStats};
use compact_str::CompactString;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct AssetCleaner {
    config: CleanerConfig,
    ignore: PathIgnoreFilter,
    resolver: Box<dyn DependencyResolver>,
    classifier: Box<dyn AssetClassifier>,
    index: BacklinkIndex,
    folders: FolderRegistry,
    snapshot: UnusedSnapshot,
}

impl AssetCleaner {
    pub fn new(
        config: CleanerConfig,
        resolver: Box<dyn DependencyResolver>,
        classifier: Box<dyn AssetClassifier>,
    ) -> Self {
        let ignore = PathIgnoreFilter::from_config(&config);
        Self {
            config,
            ignore,
            resolver,
            classifier,
            index: BacklinkIndex::new(),
            folders: FolderRegistry::new(),
            snapshot: UnusedSnapshot::default(),
        }
    }

    /// Bulk-build the index from a full enumeration, then compute the first
    /// unused snapshot.
    pub fn init<I>(&mut self, ids: I, progress: &mut dyn ProgressSink) -> Result<()>
    where
        I: IntoIterator<Item = AssetId>,
    {
        self.folders.clear();
        let inserted =
            self.index
                .init(ids, self.resolver.as_ref(), self.classifier.as_ref(), progress)?;
        for id in &inserted {
            self.folders.register_folders(id);
        }
        info!("Registered {} folders", self.folders.len());
        self.update_unused_assets()
    }

    /// Forget a deleted asset. Its folders stay registered.
    pub fn remove(&mut self, id: &AssetId) -> Result<()> {
        if !self.index.remove(id) {
            debug!("Remove of unknown asset {id} ignored");
        }
        self.snapshot.forget(id.as_str());
        self.after_change(&[id])
    }

    /// Move an asset's rows to its new path.
    ///
    /// Rows of other assets that mention `old` are not rewritten; rebuild
    /// those neighbours explicitly if they must follow the rename.
    pub fn rename(&mut self, old: &AssetId, new: &AssetId) -> Result<()> {
        self.index.rename(old, new);
        self.folders.register_folders(new);
        self.snapshot.forget(old.as_str());
        self.reclassify(new)?;
        self.after_change(&[old, new])
    }

    /// Bring the unused entry for `id` in line with what a full pass would
    /// record: present only for an unreferenced, non-ignored forward row.
    fn reclassify(&mut self, id: &AssetId) -> Result<()> {
        self.snapshot.forget(id.as_str());
        if self.index.contains(id.as_str())
            && !self.index.is_referenced(id.as_str())
            && !self.ignore.is_ignored(id)
        {
            let size = self.classifier.file_size(id)?;
            let scene_like = self.classifier.is_scene_like(id);
            self.snapshot.record(id.clone(), size, scene_like);
        }
        Ok(())
    }

    /// Re-resolve one asset whose content changed (`is_update`) or that was
    /// just created (`!is_update`).
    pub fn rebuild_one(&mut self, id: &AssetId, is_update: bool) -> Result<()> {
        self.index
            .rebuild_one(id, self.resolver.as_ref(), is_update)?;
        if !is_update {
            self.folders.register_folders(id);
        }
        self.after_change(&[id])
    }

    /// Recompute the whole unused snapshot from the current index.
    pub fn update_unused_assets(&mut self) -> Result<()> {
        self.snapshot = analysis::update_unused_assets(
            &self.index,
            &self.folders,
            self.classifier.as_ref(),
            &self.ignore,
        )?;
        Ok(())
    }

    /// Swap in new settings. A full recomputation runs when the change
    /// affects which assets may be reported.
    pub fn apply_config(&mut self, config: CleanerConfig) -> Result<()> {
        let rebuild = self.config.ignore_settings_differ(&config);
        self.ignore = PathIgnoreFilter::from_config(&config);
        self.classifier.reconfigure(&config);
        self.config = config;
        if rebuild {
            self.update_unused_assets()?;
        }
        Ok(())
    }

    fn after_change(&mut self, touched: &[&AssetId]) -> Result<()> {
        if self.config.update_unused_on_demand {
            for id in touched {
                self.snapshot
                    .update_folders_with_qty_by_path(id, &self.folders);
            }
            Ok(())
        } else {
            self.update_unused_assets()
        }
    }

    /// `true` if `id` is in the latest snapshot and not ignored by settings.
    pub fn is_unused(&self, id: &AssetId) -> bool {
        !self.ignore.is_ignored(id) && self.snapshot.is_unused(id.as_str())
    }

    pub fn files_that_reference(&self, id: &str) -> Vec<AssetId> {
        analysis::files_that_reference(&self.index, self.classifier.as_ref(), id)
    }

    pub fn scenes_that_contain(&self, id: &str) -> Vec<AssetId> {
        analysis::scenes_that_contain(&self.index, self.classifier.as_ref(), id)
    }

    pub fn summarize_selection<'a, I>(&self, selection: I) -> FolderStats
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.snapshot.summarize_selection(selection)
    }

    pub fn unused_files(&self) -> &BTreeMap<AssetId, u64> {
        &self.snapshot.files
    }

    pub fn unused_scenes(&self) -> &BTreeMap<AssetId, u64> {
        &self.snapshot.scenes
    }

    pub fn folder_stats(&self) -> &BTreeMap<CompactString, FolderStats> {
        &self.snapshot.folders
    }

    pub fn snapshot(&self) -> &UnusedSnapshot {
        &self.snapshot
    }

    pub fn index(&self) -> &BacklinkIndex {
        &self.index
    }

    pub fn folders(&self) -> &FolderRegistry {
        &self.folders
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }
}
