/// Rendering of an [`UnusedSnapshot`] for humans and tools.
use crate::analysis::UnusedSnapshot;
use crate::error::{CleanerError, Result};
use crate::model::size::{format_count, format_size};
use crate::model::{AssetId, FolderStats};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io;

/// Largest folders listed in the text summary.
const TEXT_TOP_FOLDERS: usize = 10;

#[derive(Serialize)]
struct CsvRow<'a> {
    kind: &'static str,
    path: &'a str,
    size: u64,
}

/// Write one row per unused asset: scenes first, then files, each sorted.
pub fn write_csv<W: io::Write>(snapshot: &UnusedSnapshot, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for (kind, map) in [("scene", &snapshot.scenes), ("file", &snapshot.files)] {
        for (id, size) in map {
            csv.serialize(CsvRow {
                kind,
                path: id.as_str(),
                size: *size,
            })?;
        }
    }
    csv.flush().map_err(|e| CleanerError::Report {
        details: e.to_string(),
    })
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    total_size: u64,
    files: &'a BTreeMap<AssetId, u64>,
    scenes: &'a BTreeMap<AssetId, u64>,
    folders: BTreeMap<&'a str, FolderStats>,
}

/// Pretty-printed JSON document with a generation timestamp.
pub fn to_json(snapshot: &UnusedSnapshot) -> Result<String> {
    let report = JsonReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        total_size: snapshot.total_size(),
        files: &snapshot.files,
        scenes: &snapshot.scenes,
        folders: snapshot
            .folders
            .iter()
            .map(|(name, stats)| (name.as_str(), *stats))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Short human summary: totals, then the folders holding the most unused bytes.
pub fn render_text(snapshot: &UnusedSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Unused: {} files, {} scenes, {} total",
        format_count(snapshot.files.len() as u64),
        format_count(snapshot.scenes.len() as u64),
        format_size(snapshot.total_size())
    );

    let mut folders: Vec<(&str, &FolderStats)> = snapshot
        .folders
        .iter()
        .filter(|(_, stats)| !stats.is_empty())
        .map(|(name, stats)| (name.as_str(), stats))
        .collect();
    folders.sort_by(|a, b| b.1.unused_size.cmp(&a.1.unused_size).then(a.0.cmp(b.0)));

    if !folders.is_empty() {
        let _ = writeln!(out, "\nFolders:");
        for (name, stats) in folders.into_iter().take(TEXT_TOP_FOLDERS) {
            let _ = writeln!(
                out,
                "  {name}: {} files, {} scenes, {}",
                format_count(stats.unused_files),
                format_count(stats.unused_scenes),
                format_size(stats.unused_size)
            );
        }
    }

    for (label, map) in [("Scenes", &snapshot.scenes), ("Files", &snapshot.files)] {
        if map.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{label}:");
        for (id, size) in map {
            let _ = writeln!(out, "  {id} ({})", format_size(*size));
        }
    }
    out
}
