/// User-tunable settings and the path-based ignore filter built from them.
use crate::contracts::IgnoreFilter;
use crate::error::{CleanerError, Result};
use crate::model::AssetId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default location of the build configuration that implicitly lists scenes.
pub const DEFAULT_BUILD_SETTINGS: &str = "ProjectSettings/EditorBuildSettings.asset";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CleanerConfig {
    /// Any id containing one of these substrings is never reported unused.
    pub ignore_path_contains: Vec<String>,
    /// Ids not containing this marker are not project assets at all.
    pub asset_root: Option<String>,
    /// Extra extensions (without the dot) excluded from the unused set.
    pub ignore_extensions: Vec<String>,
    /// Skip materials (`.mat`).
    pub ignore_materials: bool,
    /// Skip serialized data assets (`.asset`).
    pub ignore_scriptable: bool,
    /// Extensions treated as scenes.
    pub scene_extensions: Vec<String>,
    /// Extensions of non-content markers skipped during indexing.
    pub container_extensions: Vec<String>,
    /// Project-relative path of the build settings asset.
    pub build_settings_path: String,
    /// When `true`, incremental changes only refresh the touched folders and
    /// a full recomputation waits for an explicit request.
    pub update_unused_on_demand: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            ignore_path_contains: Vec::new(),
            asset_root: Some("Assets/".to_string()),
            ignore_extensions: Vec::new(),
            ignore_materials: false,
            ignore_scriptable: false,
            scene_extensions: vec!["unity".to_string()],
            container_extensions: vec![
                "meta".to_string(),
                "asmdef".to_string(),
                "asmref".to_string(),
            ],
            build_settings_path: DEFAULT_BUILD_SETTINGS.to_string(),
            update_unused_on_demand: true,
        }
    }
}

impl CleanerConfig {
    /// Load a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| CleanerError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| CleanerError::ConfigParse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }

    /// Replace the ignored substrings from a `;`-separated list.
    /// Blank parts are dropped.
    pub fn set_ignore_path_combined(&mut self, combined: &str) {
        self.ignore_path_contains = combined
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// The ignored substrings joined back into the `;`-separated form.
    pub fn ignore_path_combined(&self) -> String {
        self.ignore_path_contains
            .iter()
            .map(|s| format!("{s};"))
            .collect()
    }

    /// `true` when switching from `self` to `other` changes which assets
    /// can be reported unused.
    pub fn ignore_settings_differ(&self, other: &Self) -> bool {
        self.ignore_path_contains != other.ignore_path_contains
            || self.asset_root != other.asset_root
            || self.ignore_extensions != other.ignore_extensions
            || self.ignore_materials != other.ignore_materials
            || self.ignore_scriptable != other.ignore_scriptable
            || self.scene_extensions != other.scene_extensions
    }
}

/// Ignore filter driven by [`CleanerConfig`].
///
/// An id is ignored when its extension is excluded, when it lies outside
/// the asset root, or when it contains any configured substring.
#[derive(Debug, Clone, Default)]
pub struct PathIgnoreFilter {
    extensions: HashSet<String>,
    asset_root: Option<String>,
    path_contains: Vec<String>,
}

impl PathIgnoreFilter {
    pub fn from_config(config: &CleanerConfig) -> Self {
        let mut extensions: HashSet<String> = config
            .ignore_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        if config.ignore_materials {
            extensions.insert("mat".to_string());
        }
        if config.ignore_scriptable {
            extensions.insert("asset".to_string());
        }
        Self {
            extensions,
            asset_root: config.asset_root.clone(),
            path_contains: config.ignore_path_contains.clone(),
        }
    }

    /// Substring that caused `id` to be ignored, if any.
    pub fn matching_path(&self, id: &AssetId) -> Option<&str> {
        self.path_contains
            .iter()
            .find(|substr| id.as_str().contains(substr.as_str()))
            .map(String::as_str)
    }
}

impl IgnoreFilter for PathIgnoreFilter {
    fn is_ignored(&self, id: &AssetId) -> bool {
        if let Some(ext) = id.extension() {
            if self.extensions.contains(&ext) {
                return true;
            }
        }
        if let Some(root) = &self.asset_root {
            if !id.as_str().contains(root.as_str()) {
                return true;
            }
        }
        self.matching_path(id).is_some()
    }
}
