/// Scanner module. Enumerates a project tree into asset ids.
///
/// Walks `<root>/Assets` with `jwalk`'s rayon-backed parallel traversal and
/// turns each entry into a project-relative, `/`-separated [`AssetId`].
/// Directories are listed too; the classifier drops them during `init`.
/// Hidden entries and `~`-suffixed folders are skipped, matching what the
/// editor itself imports.
pub mod progress;

use crate::config::CleanerConfig;
use crate::error::{CleanerError, Result};
use crate::model::{AssetId, SEPARATOR};
use std::path::{Component, Path};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Top-level folder holding project assets.
pub const ASSETS_DIR: &str = "Assets";

/// Result of a project enumeration.
#[derive(Debug, Default)]
pub struct Enumeration {
    /// Every asset id found, in walk order.
    pub ids: Vec<AssetId>,
    /// Non-fatal walk errors as `(path, message)`.
    pub errors: Vec<(String, String)>,
}

/// Enumerate every asset under `root`.
///
/// The build settings asset named in `config` is appended when it exists so
/// its implicit scene references reach the index.
pub fn enumerate_assets(root: &Path, config: &CleanerConfig) -> Result<Enumeration> {
    let start = Instant::now();
    let assets_dir = root.join(ASSETS_DIR);
    if !assets_dir.is_dir() {
        return Err(CleanerError::Walk {
            details: format!("{} is not a directory", assets_dir.display()),
        });
    }

    let mut out = Enumeration::default();

    let walker = jwalk::WalkDir::new(&assets_dir)
        .skip_hidden(true)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()))
        .process_read_dir(|_depth, _path, _state, children| {
            children.retain(|entry| {
                entry
                    .as_ref()
                    .map(|e| !e.file_name.to_string_lossy().ends_with('~'))
                    .unwrap_or(true)
            });
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                warn!("Skipping unreadable entry {path}: {err}");
                out.errors.push((path, err.to_string()));
                continue;
            }
        };
        if let Some(id) = relative_id(root, &entry.path()) {
            out.ids.push(id);
        }
    }

    let build_settings = root.join(&config.build_settings_path);
    if build_settings.is_file() {
        debug!("Including build settings {}", build_settings.display());
        out.ids.push(AssetId::new(config.build_settings_path.replace('\\', "/")));
    }

    info!(
        "Enumerated {} entries ({} errors) in {:?}",
        out.ids.len(),
        out.errors.len(),
        start.elapsed()
    );
    Ok(out)
}

/// Project-relative id of `path`, joined with [`SEPARATOR`].
pub fn relative_id(root: &Path, path: &Path) -> Option<AssetId> {
    let rel = path.strip_prefix(root).ok()?;
    let mut id = String::new();
    for component in rel.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        if !id.is_empty() {
            id.push(SEPARATOR);
        }
        id.push_str(&part.to_string_lossy());
    }
    if id.is_empty() {
        None
    } else {
        Some(AssetId::from(id))
    }
}
