/// Collaborator contracts consumed by the index and the classifier.
///
/// The index never touches the filesystem itself. Enumeration, content
/// walking, classification and progress UI are supplied through these
/// traits so frontends (and tests) can plug in their own.
use crate::config::CleanerConfig;
use crate::error::Result;
use crate::model::AssetId;
use std::collections::HashSet;

/// Discovers what a single asset directly references.
pub trait DependencyResolver {
    /// Direct references of `id` only, never the transitive closure.
    ///
    /// Must be safe to call for any id produced by enumeration. An empty
    /// set is a valid answer. Errors propagate to the caller unchanged.
    fn direct_dependencies(&self, id: &AssetId) -> Result<HashSet<AssetId>>;
}

/// Type-level facts about an asset id.
pub trait AssetClassifier {
    /// Folder placeholders and non-content markers that `init` skips.
    fn is_container_or_ignorable(&self, id: &AssetId) -> bool;

    /// Scene-like assets are bucketed separately from plain files.
    fn is_scene_like(&self, id: &AssetId) -> bool;

    /// Byte length of the asset. A missing file is an error.
    fn file_size(&self, id: &AssetId) -> Result<u64>;

    /// Pick up changed settings. Classifiers with fixed rules ignore this.
    fn reconfigure(&mut self, _config: &CleanerConfig) {}
}

/// Caller-configured predicate removing ids from the unused snapshot.
pub trait IgnoreFilter {
    fn is_ignored(&self, id: &AssetId) -> bool;
}

/// Advisory progress sink for the long-running `init` scan.
pub trait ProgressSink {
    /// Report completion in `0.0..=1.0`. Returns `true` when the user asked
    /// to cancel. The scan logs the request and keeps going.
    fn report(&mut self, fraction: f32) -> bool;
}

/// Sink that discards every report and never requests cancellation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _fraction: f32) -> bool {
        false
    }
}

/// Filter that keeps everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreNothing;

impl IgnoreFilter for IgnoreNothing {
    fn is_ignored(&self, _id: &AssetId) -> bool {
        false
    }
}
