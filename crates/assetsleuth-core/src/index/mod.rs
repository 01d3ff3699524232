/// Bidirectional dependency index.
///
/// The forward map records what each known asset directly references; the
/// backward map ("lookup") records who references a given id. Every public
/// mutation keeps the two in step so that for each `d` in `forward[a]`,
/// `a` is in `backward[d]`.
///
/// Backward rows are created the moment any asset is found to depend on an
/// id, whether or not that id is itself a forward entry. Implicit references
/// (a build configuration listing scenes) therefore still count.
pub mod folders;

pub use folders::FolderRegistry;

use crate::contracts::{AssetClassifier, DependencyResolver, ProgressSink};
use crate::error::Result;
use crate::model::AssetId;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, error, info};

/// Report progress to the sink every this many inserted assets.
pub const PROGRESS_INTERVAL: usize = 256;

/// Forward and backward adjacency maps for the whole project.
#[derive(Debug, Default, Clone)]
pub struct BacklinkIndex {
    forward: HashMap<AssetId, HashSet<AssetId>>,
    backward: HashMap<AssetId, HashSet<AssetId>>,
}

impl BacklinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the index from a full enumeration.
    ///
    /// Duplicates are collapsed and container/ignorable ids are dropped
    /// before each remaining id is resolved and inserted. Any previous
    /// contents are discarded. Returns the ids that were inserted, in
    /// sorted order, so the caller can register their folders.
    ///
    /// The sink may ask for cancellation. That request is logged and the
    /// scan runs to completion regardless.
    pub fn init<I, R, C, P>(
        &mut self,
        ids: I,
        resolver: &R,
        classifier: &C,
        progress: &mut P,
    ) -> Result<Vec<AssetId>>
    where
        I: IntoIterator<Item = AssetId>,
        R: DependencyResolver + ?Sized,
        C: AssetClassifier + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let start = Instant::now();
        self.forward.clear();
        self.backward.clear();

        let candidates: Vec<AssetId> = ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|id| !classifier.is_container_or_ignorable(id))
            .collect();

        let total = candidates.len();
        info!("Building backlink index for {total} assets");

        let mut cancel_logged = false;
        for (i, id) in candidates.iter().enumerate() {
            self.insert_fresh(id, resolver)?;

            let done = i + 1;
            if done % PROGRESS_INTERVAL == 0 || done == total {
                let cancel = progress.report(done as f32 / total as f32);
                if cancel && !cancel_logged {
                    error!("Cancellation requested during index build; continuing until complete");
                    cancel_logged = true;
                }
            }
        }
        if total == 0 && progress.report(1.0) {
            error!("Cancellation requested during index build; nothing to index");
        }

        info!(
            "Backlink index built: {} forward rows, {} backward rows in {:?}",
            self.forward.len(),
            self.backward.len(),
            start.elapsed()
        );
        Ok(candidates)
    }

    /// Resolve `id` and install it as a brand-new forward row.
    pub fn insert_fresh<R>(&mut self, id: &AssetId, resolver: &R) -> Result<()>
    where
        R: DependencyResolver + ?Sized,
    {
        let deps = resolver.direct_dependencies(id)?;
        for dep in &deps {
            self.backward
                .entry(dep.clone())
                .or_default()
                .insert(id.clone());
        }
        self.forward.insert(id.clone(), deps);
        Ok(())
    }

    /// Drop `id`'s forward row and unlink it from every backward row it
    /// appeared in. Returns `false` when there was nothing to remove.
    ///
    /// `backward[id]` itself is left alone: assets that still reference the
    /// removed id keep that reference until they are rebuilt.
    pub fn remove(&mut self, id: &AssetId) -> bool {
        let Some(deps) = self.forward.remove(id) else {
            return false;
        };
        self.unlink(id, &deps);
        debug!("Removed {id} from backlink index ({} dependencies unlinked)", deps.len());
        true
    }

    /// Move the rows keyed by `old` to `new` in both maps.
    ///
    /// Only keys move. Other rows whose dependency or lookup sets mention
    /// `old` keep mentioning `old` verbatim; callers that need those
    /// repaired must `rebuild_one` each affected neighbour themselves.
    /// An existing row under `new` is overwritten.
    pub fn rename(&mut self, old: &AssetId, new: &AssetId) -> bool {
        if old == new {
            return self.forward.contains_key(old) || self.backward.contains_key(old);
        }
        let mut moved = false;
        if let Some(deps) = self.forward.remove(old) {
            self.forward.insert(new.clone(), deps);
            moved = true;
        }
        if let Some(lookup) = self.backward.remove(old) {
            self.backward.insert(new.clone(), lookup);
            moved = true;
        }
        debug!("Renamed {old} -> {new} (moved: {moved})");
        moved
    }

    /// Recompute one asset's dependencies after its content changed.
    ///
    /// With `is_update`, the previous forward row (if any) is unwound first
    /// exactly as [`remove`](Self::remove) would, leaving `backward[id]`
    /// untouched. The resolver is consulted before anything is unwound, so a
    /// resolver error leaves the index as it was.
    pub fn rebuild_one<R>(&mut self, id: &AssetId, resolver: &R, is_update: bool) -> Result<()>
    where
        R: DependencyResolver + ?Sized,
    {
        let deps = resolver.direct_dependencies(id)?;

        if is_update {
            if let Some(old) = self.forward.remove(id) {
                self.unlink(id, &old);
            }
        }

        for dep in &deps {
            let lookup = self.backward.entry(dep.clone()).or_default();
            if is_update {
                lookup.remove(id);
            }
            lookup.insert(id.clone());
        }
        debug!("Rebuilt {id} with {} dependencies (update: {is_update})", deps.len());
        self.forward.insert(id.clone(), deps);
        Ok(())
    }

    /// Remove `id` from each dependency's lookup set. Missing rows are fine.
    fn unlink(&mut self, id: &AssetId, deps: &HashSet<AssetId>) {
        for dep in deps {
            if let Some(lookup) = self.backward.get_mut(dep) {
                lookup.remove(id);
            }
        }
    }

    /// Direct dependencies of a known asset.
    pub fn dependencies(&self, id: &str) -> Option<&HashSet<AssetId>> {
        self.forward.get(id)
    }

    /// Assets that directly reference `id`.
    pub fn lookup(&self, id: &str) -> Option<&HashSet<AssetId>> {
        self.backward.get(id)
    }

    /// `true` when at least one asset currently references `id`.
    pub fn is_referenced(&self, id: &str) -> bool {
        self.backward.get(id).is_some_and(|lookup| !lookup.is_empty())
    }

    /// Every id with a forward row.
    pub fn assets(&self) -> impl Iterator<Item = &AssetId> {
        self.forward.keys()
    }

    /// Every backward row, including ones for ids that were never enumerated.
    pub fn backlinks(&self) -> impl Iterator<Item = (&AssetId, &HashSet<AssetId>)> {
        self.backward.iter()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.forward.contains_key(id)
    }

    /// Number of forward rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Check that every forward edge has its backward counterpart.
    pub fn is_consistent(&self) -> bool {
        self.forward.iter().all(|(id, deps)| {
            deps.iter()
                .all(|dep| self.backward.get(dep).is_some_and(|lookup| lookup.contains(id)))
        })
    }
}
