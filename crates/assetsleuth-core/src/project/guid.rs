/// GUID-based dependency resolver.
///
/// Every asset has a sibling `<asset>.meta` file carrying its `guid:`.
/// Text-serialised assets (YAML with a `%YAML` header) reference other
/// assets as `{fileID: ..., guid: <hex>, type: ...}`. Resolving an asset
/// means scanning its bytes for those GUIDs and mapping them back to ids.
/// Binary assets cannot reference anything and resolve to an empty set.
///
/// The build settings asset also lists scenes by `path:`; those are added
/// as implicit dependencies so scenes in the build never look unused.
use crate::config::CleanerConfig;
use crate::contracts::DependencyResolver;
use crate::error::{CleanerError, Result};
use crate::model::AssetId;
use rayon::prelude::*;
use regex::bytes::Regex;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

const YAML_HEADER: &[u8] = b"%YAML";
const META_SUFFIX: &str = ".meta";
const GUID_PATTERN: &str = r"guid:\s*([0-9a-fA-F]{32})";
const SCENE_PATH_PATTERN: &str = r"(?m)^\s*path:\s*(\S.*?)\s*$";

pub struct GuidResolver {
    root: PathBuf,
    by_guid: HashMap<String, AssetId>,
    build_settings: AssetId,
    guid_re: Regex,
    scene_path_re: Regex,
}

impl GuidResolver {
    /// Read the `.meta` file of every id in `ids` and build the GUID table.
    ///
    /// Missing `.meta` files are skipped silently; unreadable ones are
    /// logged and skipped. Meta reads run in parallel.
    pub fn build(root: impl Into<PathBuf>, ids: &[AssetId], config: &CleanerConfig) -> Result<Self> {
        let start = Instant::now();
        let root = root.into();
        let guid_re = compile(GUID_PATTERN)?;
        let scene_path_re = compile(SCENE_PATH_PATTERN)?;

        let pairs: Vec<(String, AssetId)> = ids
            .par_iter()
            .filter(|id| !id.as_str().ends_with(META_SUFFIX))
            .filter_map(|id| {
                let meta = root.join(format!("{id}{META_SUFFIX}"));
                let bytes = match fs::read(&meta) {
                    Ok(bytes) => bytes,
                    Err(err) if err.kind() == ErrorKind::NotFound => return None,
                    Err(err) => {
                        warn!("Skipping unreadable meta file {}: {err}", meta.display());
                        return None;
                    }
                };
                let caps = guid_re.captures(&bytes)?;
                let guid = String::from_utf8_lossy(&caps[1]).to_ascii_lowercase();
                Some((guid, id.clone()))
            })
            .collect();

        let mut by_guid = HashMap::with_capacity(pairs.len());
        for (guid, id) in pairs {
            if let Some(previous) = by_guid.insert(guid.clone(), id.clone()) {
                warn!("Duplicate guid {guid}: {previous} and {id}");
            }
        }

        info!("Indexed {} guids in {:?}", by_guid.len(), start.elapsed());
        Ok(Self {
            root,
            by_guid,
            build_settings: AssetId::new(config.build_settings_path.replace('\\', "/")),
            guid_re,
            scene_path_re,
        })
    }

    /// Asset that owns `guid`, if known.
    pub fn asset_for_guid(&self, guid: &str) -> Option<&AssetId> {
        self.by_guid.get(&guid.to_ascii_lowercase())
    }

    /// Number of known GUIDs.
    pub fn len(&self) -> usize {
        self.by_guid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_guid.is_empty()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| CleanerError::Resolve {
        id: pattern.to_string(),
        details: e.to_string(),
    })
}

/// Full contents of `path` when it starts with the YAML header.
///
/// Only the header is read from binary assets.
fn read_if_yaml(path: &Path) -> Result<Option<Vec<u8>>> {
    let mut file = File::open(path).map_err(|e| CleanerError::io(path, e))?;
    let mut bytes = Vec::with_capacity(YAML_HEADER.len());
    file.by_ref()
        .take(YAML_HEADER.len() as u64)
        .read_to_end(&mut bytes)
        .map_err(|e| CleanerError::io(path, e))?;
    if bytes != YAML_HEADER {
        return Ok(None);
    }
    file.read_to_end(&mut bytes)
        .map_err(|e| CleanerError::io(path, e))?;
    Ok(Some(bytes))
}

impl DependencyResolver for GuidResolver {
    fn direct_dependencies(&self, id: &AssetId) -> Result<HashSet<AssetId>> {
        let path = self.root.join(id.as_str());
        let mut deps = HashSet::new();
        if path.is_dir() {
            return Ok(deps);
        }

        let Some(bytes) = read_if_yaml(&path)? else {
            return Ok(deps);
        };

        for caps in self.guid_re.captures_iter(&bytes) {
            let guid = String::from_utf8_lossy(&caps[1]).to_ascii_lowercase();
            if let Some(target) = self.by_guid.get(&guid) {
                if target != id {
                    deps.insert(target.clone());
                }
            }
        }

        if *id == self.build_settings {
            for caps in self.scene_path_re.captures_iter(&bytes) {
                let scene = String::from_utf8_lossy(&caps[1]);
                deps.insert(AssetId::new(scene.as_ref()));
            }
        }

        Ok(deps)
    }
}
