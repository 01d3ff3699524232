/// End-to-end tests over a real on-disk project.
///
/// Each test lays out a small project in a `TempDir`, then drives the real
/// scanner, GUID resolver and classifier through `AssetCleaner`. No
/// collaborator is mocked, so enumeration, `.meta` parsing, reference
/// extraction and size lookup are all exercised together.
///
/// **Why a `tests/` integration test (not unit test)?**
///
/// The unit tests drive the index through in-memory resolvers. Here the
/// GUIDs live in real `.meta` files, references live in real YAML bodies,
/// and sizes come from `fs::metadata`, so a project layout that parses
/// differently from what the in-memory fixtures assume shows up here.
use assetsleuth_core::config::CleanerConfig;
use assetsleuth_core::contracts::NoProgress;
use assetsleuth_core::model::{AssetId, FolderStats};
use assetsleuth_core::project::{GuidResolver, ProjectClassifier};
use assetsleuth_core::report;
use assetsleuth_core::scanner::enumerate_assets;
use assetsleuth_core::scanner::progress::{ChannelProgress, IndexProgress};
use assetsleuth_core::AssetCleaner;
use std::fs;
use std::path::Path;
use std::sync::atomic::Ordering;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn guid(n: u32) -> String {
    format!("{n:032x}")
}

fn write(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Write an asset together with its `.meta` file.
fn asset(root: &Path, rel: &str, id: u32, contents: &[u8]) {
    write(root, rel, contents);
    let meta = format!("fileFormatVersion: 2\nguid: {}\n", guid(id));
    write(root, &format!("{rel}.meta"), meta.as_bytes());
}

fn yaml_refs(refs: &[u32]) -> Vec<u8> {
    let mut out = String::from("%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n--- !u!21 &2100000\n");
    for r in refs {
        out.push_str(&format!("  - {{fileID: 2100000, guid: {}, type: 2}}\n", guid(*r)));
    }
    out.into_bytes()
}

/// Build a reproducible project:
///
/// ```text
/// Assets/
///   Scenes/Main.unity        -> Hero.prefab   (listed in build settings)
///   Scenes/Old.unity                          (unused scene)
///   Prefabs/Hero.prefab      -> Hero.mat
///   Materials/Hero.mat       -> Hero.png
///   Materials/Unused.mat                      (unused, 64 bytes)
///   Textures/Hero.png
///   Textures/Orphan.png                       (unused, 300 bytes)
///   Textures/Backup~/Old.png                  (skipped by the scanner)
///   Plugins/native.dll                        (unused unless ignored)
///   Code.asmdef                               (container marker)
/// ProjectSettings/EditorBuildSettings.asset   -> Main.unity
/// ```
fn build_project() -> TempDir {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let root = tmp.path();

    asset(root, "Assets/Textures/Hero.png", 1, &[0x89, b'P', b'N', b'G', 0, 0]);
    asset(root, "Assets/Textures/Orphan.png", 2, &[7u8; 300]);
    asset(root, "Assets/Materials/Hero.mat", 3, &yaml_refs(&[1]));
    let mut unused_mat = yaml_refs(&[]);
    unused_mat.resize(64, b' ');
    asset(root, "Assets/Materials/Unused.mat", 4, &unused_mat);
    asset(root, "Assets/Prefabs/Hero.prefab", 5, &yaml_refs(&[3]));
    asset(root, "Assets/Scenes/Main.unity", 6, &yaml_refs(&[5]));
    asset(root, "Assets/Scenes/Old.unity", 7, &yaml_refs(&[]));
    asset(root, "Assets/Plugins/native.dll", 8, &[0u8; 10]);
    asset(root, "Assets/Code.asmdef", 9, b"{ \"name\": \"Code\" }");
    asset(root, "Assets/Textures/Backup~/Old.png", 10, &[1u8; 5]);
    write(
        root,
        "ProjectSettings/EditorBuildSettings.asset",
        b"%YAML 1.1\nEditorBuildSettings:\n  m_Scenes:\n  - enabled: 1\n    path: Assets/Scenes/Main.unity\n",
    );
    tmp
}

fn cleaner_for(root: &Path, config: CleanerConfig) -> AssetCleaner {
    let enumeration = enumerate_assets(root, &config).unwrap();
    let resolver = GuidResolver::build(root, &enumeration.ids, &config).unwrap();
    let classifier = ProjectClassifier::new(root, &config);
    let mut cleaner = AssetCleaner::new(config, Box::new(resolver), Box::new(classifier));
    cleaner.init(enumeration.ids, &mut NoProgress).unwrap();
    cleaner
}

fn names<V>(map: &std::collections::BTreeMap<AssetId, V>) -> Vec<&str> {
    map.keys().map(AssetId::as_str).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn enumeration_skips_tilde_folders() {
    let tmp = build_project();
    let enumeration = enumerate_assets(tmp.path(), &CleanerConfig::default()).unwrap();
    let ids: Vec<&str> = enumeration.ids.iter().map(AssetId::as_str).collect();

    assert!(ids.contains(&"Assets/Textures/Hero.png"));
    assert!(ids.contains(&"Assets/Textures/Hero.png.meta"));
    assert!(ids.contains(&"Assets/Textures"));
    assert!(ids.contains(&"ProjectSettings/EditorBuildSettings.asset"));
    assert!(!ids.iter().any(|id| id.contains("Backup~")));
    assert!(enumeration.errors.is_empty());
}

#[test]
fn pipeline_reports_unused_assets() {
    let tmp = build_project();
    let cleaner = cleaner_for(tmp.path(), CleanerConfig::default());

    assert_eq!(
        names(cleaner.unused_files()),
        vec![
            "Assets/Materials/Unused.mat",
            "Assets/Plugins/native.dll",
            "Assets/Textures/Orphan.png",
        ]
    );
    assert_eq!(names(cleaner.unused_scenes()), vec!["Assets/Scenes/Old.unity"]);

    // Listed in the build settings, so referenced implicitly.
    assert!(!cleaner.is_unused(&AssetId::new("Assets/Scenes/Main.unity")));
    assert!(cleaner.index().is_consistent());

    let textures = cleaner.folder_stats()["Assets/Textures"];
    assert_eq!(textures, FolderStats::new(1, 0, 300));
    let materials = cleaner.folder_stats()["Assets/Materials"];
    assert_eq!(materials, FolderStats::new(1, 0, 64));
}

#[test]
fn ignored_paths_are_not_reported() {
    let tmp = build_project();
    let mut config = CleanerConfig::default();
    config.set_ignore_path_combined("Plugins/");
    let cleaner = cleaner_for(tmp.path(), config);

    assert!(!cleaner.is_unused(&AssetId::new("Assets/Plugins/native.dll")));
    assert_eq!(cleaner.unused_files().len(), 2);
    assert_eq!(cleaner.folder_stats()["Assets/Plugins"], FolderStats::default());
}

#[test]
fn backlink_queries_follow_disk_references() {
    let tmp = build_project();
    let cleaner = cleaner_for(tmp.path(), CleanerConfig::default());

    assert_eq!(
        cleaner.scenes_that_contain("Assets/Prefabs/Hero.prefab"),
        vec![AssetId::new("Assets/Scenes/Main.unity")]
    );
    assert_eq!(
        cleaner.files_that_reference("Assets/Materials/Hero.mat"),
        vec![AssetId::new("Assets/Prefabs/Hero.prefab")]
    );
}

#[test]
fn content_change_is_picked_up_by_rebuild() {
    let tmp = build_project();
    let root = tmp.path();
    let mut cleaner = cleaner_for(root, CleanerConfig::default());
    assert!(!cleaner.is_unused(&AssetId::new("Assets/Textures/Hero.png")));

    // The material stops referencing its texture.
    write(root, "Assets/Materials/Hero.mat", &yaml_refs(&[]));
    cleaner
        .rebuild_one(&AssetId::new("Assets/Materials/Hero.mat"), true)
        .unwrap();
    cleaner.update_unused_assets().unwrap();

    assert!(cleaner.is_unused(&AssetId::new("Assets/Textures/Hero.png")));
    assert_eq!(cleaner.folder_stats()["Assets/Textures"].unused_files, 2);
    assert!(cleaner.index().is_consistent());
}

#[test]
fn deleted_folder_keeps_zero_aggregate() {
    let tmp = build_project();
    let root = tmp.path();
    let mut cleaner = cleaner_for(root, CleanerConfig::default());

    fs::remove_dir_all(root.join("Assets/Plugins")).unwrap();
    cleaner.remove(&AssetId::new("Assets/Plugins/native.dll")).unwrap();
    cleaner.update_unused_assets().unwrap();

    assert!(cleaner.folders().contains("Assets/Plugins"));
    assert_eq!(cleaner.folder_stats()["Assets/Plugins"], FolderStats::default());
}

#[test]
fn scene_extension_change_rebuckets_assets() {
    let tmp = build_project();
    let mut cleaner = cleaner_for(tmp.path(), CleanerConfig::default());
    assert!(cleaner.unused_files().contains_key("Assets/Materials/Unused.mat"));

    let mut config = cleaner.config().clone();
    config.scene_extensions.push("mat".to_string());
    cleaner.apply_config(config).unwrap();

    assert_eq!(
        names(cleaner.unused_scenes()),
        vec!["Assets/Materials/Unused.mat", "Assets/Scenes/Old.unity"]
    );
    assert!(!cleaner.unused_files().contains_key("Assets/Materials/Unused.mat"));
    assert_eq!(cleaner.folder_stats()["Assets/Materials"], FolderStats::new(0, 1, 64));
}

#[test]
fn selection_summary_over_folders() {
    let tmp = build_project();
    let cleaner = cleaner_for(tmp.path(), CleanerConfig::default());
    let summary = cleaner.summarize_selection(["Assets/Textures", "Assets/Scenes/Old.unity"]);
    assert_eq!(summary.unused_files, 1);
    assert_eq!(summary.unused_scenes, 1);
    let old_scene = fs::metadata(tmp.path().join("Assets/Scenes/Old.unity")).unwrap().len();
    assert_eq!(summary.unused_size, 300 + old_scene);
}

/// Known limitation: cancellation is advisory. The sink sees the request
/// and reports it, but every asset is still indexed.
#[test]
fn cancellation_does_not_stop_init() {
    let tmp = build_project();
    let root = tmp.path();
    let config = CleanerConfig::default();
    let enumeration = enumerate_assets(root, &config).unwrap();
    let resolver = GuidResolver::build(root, &enumeration.ids, &config).unwrap();
    let classifier = ProjectClassifier::new(root, &config);
    let mut cleaner = AssetCleaner::new(config, Box::new(resolver), Box::new(classifier));

    let (mut sink, rx) = ChannelProgress::new();
    sink.cancel_flag().store(true, Ordering::Relaxed);
    cleaner.init(enumeration.ids, &mut sink).unwrap();

    let messages: Vec<IndexProgress> = rx.try_iter().collect();
    assert!(messages.contains(&IndexProgress::CancelRequested));
    assert!(messages.contains(&IndexProgress::Update { fraction: 1.0 }));
    assert_eq!(cleaner.unused_scenes().len(), 1);
    assert!(cleaner.index().contains("Assets/Textures/Orphan.png"));
}

#[test]
fn csv_report_matches_snapshot() {
    let tmp = build_project();
    let cleaner = cleaner_for(tmp.path(), CleanerConfig::default());
    let mut buf = Vec::new();
    report::write_csv(cleaner.snapshot(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().count(), 1 + 4);
    assert!(text.contains("file,Assets/Textures/Orphan.png,300"));
    assert!(text.lines().nth(1).unwrap().starts_with("scene,"));
}
