/// Filesystem-backed collaborators for a project rooted on disk.
///
/// [`ProjectClassifier`] answers type questions from paths and metadata;
/// [`GuidResolver`] discovers references from `.meta` GUIDs.
pub mod guid;

pub use guid::GuidResolver;

use crate::config::CleanerConfig;
use crate::contracts::AssetClassifier;
use crate::error::{CleanerError, Result};
use crate::model::AssetId;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Classifies ids relative to a project root.
#[derive(Debug, Clone)]
pub struct ProjectClassifier {
    root: PathBuf,
    scene_extensions: HashSet<String>,
    container_extensions: HashSet<String>,
}

impl ProjectClassifier {
    pub fn new(root: impl Into<PathBuf>, config: &CleanerConfig) -> Self {
        Self {
            root: root.into(),
            scene_extensions: extension_set(&config.scene_extensions),
            container_extensions: extension_set(&config.container_extensions),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn has_extension_in(id: &AssetId, set: &HashSet<String>) -> bool {
        id.extension().is_some_and(|ext| set.contains(&ext))
    }
}

impl AssetClassifier for ProjectClassifier {
    fn is_container_or_ignorable(&self, id: &AssetId) -> bool {
        Self::has_extension_in(id, &self.container_extensions)
            || self.root.join(id.as_str()).is_dir()
    }

    fn is_scene_like(&self, id: &AssetId) -> bool {
        Self::has_extension_in(id, &self.scene_extensions)
    }

    fn file_size(&self, id: &AssetId) -> Result<u64> {
        let path = self.root.join(id.as_str());
        fs::metadata(&path)
            .map(|meta| meta.len())
            .map_err(|e| CleanerError::io(path, e))
    }

    fn reconfigure(&mut self, config: &CleanerConfig) {
        self.scene_extensions = extension_set(&config.scene_extensions);
        self.container_extensions = extension_set(&config.container_extensions);
    }
}

fn extension_set(exts: &[String]) -> HashSet<String> {
    exts.iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect()
}
