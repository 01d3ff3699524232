/// "Who references this?" queries over the backward map.
///
/// Referrers are split the way a frontend shows them: project files in
/// one list, scenes that contain the asset in another.
use crate::contracts::AssetClassifier;
use crate::index::BacklinkIndex;
use crate::model::AssetId;

/// Non-scene assets that directly reference `id`, sorted.
pub fn files_that_reference<C>(index: &BacklinkIndex, classifier: &C, id: &str) -> Vec<AssetId>
where
    C: AssetClassifier + ?Sized,
{
    referrers(index, id, |referrer| !classifier.is_scene_like(referrer))
}

/// Scene-like assets that directly reference `id`, sorted.
pub fn scenes_that_contain<C>(index: &BacklinkIndex, classifier: &C, id: &str) -> Vec<AssetId>
where
    C: AssetClassifier + ?Sized,
{
    referrers(index, id, |referrer| classifier.is_scene_like(referrer))
}

fn referrers(index: &BacklinkIndex, id: &str, keep: impl Fn(&AssetId) -> bool) -> Vec<AssetId> {
    let Some(lookup) = index.lookup(id) else {
        return Vec::new();
    };
    let mut out: Vec<AssetId> = lookup.iter().filter(|r| keep(*r)).cloned().collect();
    out.sort_unstable();
    out
}
