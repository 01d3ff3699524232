//! AssetSleuth command-line entry point.
//!
//! Thin binary. Scans a project once, builds the backlink index and prints
//! the unused-asset report. All logic lives in `assetsleuth-core`.

use anyhow::{bail, Context};
use assetsleuth_core::config::CleanerConfig;
use assetsleuth_core::project::{GuidResolver, ProjectClassifier};
use assetsleuth_core::report;
use assetsleuth_core::scanner::{self, progress::ChannelProgress, progress::IndexProgress};
use assetsleuth_core::AssetCleaner;
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Csv,
    Json,
}

/// Report the assets nothing in a project references.
#[derive(Debug, Parser)]
#[command(name = "assetsleuth", version, about)]
struct Args {
    /// Project root containing the `Assets` folder.
    project_root: PathBuf,

    /// JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Only report assets under this folder prefix, e.g. `Assets/Textures`.
    #[arg(long)]
    folder: Option<String>,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    tracing::info!("AssetSleuth starting");

    let root = &args.project_root;
    if !root.is_dir() {
        bail!("project root {} is not a directory", root.display());
    }

    let config = match &args.config {
        Some(path) => CleanerConfig::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => CleanerConfig::default(),
    };

    let enumeration = scanner::enumerate_assets(root, &config)
        .with_context(|| format!("enumerating {}", root.display()))?;
    if !enumeration.errors.is_empty() {
        tracing::warn!("{} entries could not be read", enumeration.errors.len());
    }

    let resolver = GuidResolver::build(root.clone(), &enumeration.ids, &config)
        .context("reading .meta files")?;
    let classifier = ProjectClassifier::new(root.clone(), &config);
    let mut cleaner = AssetCleaner::new(config, Box::new(resolver), Box::new(classifier));

    let (mut sink, rx) = ChannelProgress::new();
    let drain = thread::spawn(move || {
        let mut last_tenth = 0;
        for msg in rx {
            match msg {
                IndexProgress::Update { fraction } => {
                    let tenth = (fraction * 10.0) as u32;
                    if tenth > last_tenth {
                        tracing::info!("Indexing {}%", tenth * 10);
                        last_tenth = tenth;
                    }
                }
                IndexProgress::CancelRequested => {
                    tracing::warn!("Cancel requested; indexing continues");
                }
            }
        }
    });

    let result = cleaner.init(enumeration.ids, &mut sink);
    drop(sink);
    join_progress_logger(drain);
    result.context("building backlink index")?;

    let snapshot = match &args.folder {
        Some(folder) => cleaner.snapshot().restricted_to(folder),
        None => cleaner.snapshot().clone(),
    };

    let stdout = io::stdout();
    match args.format {
        Format::Text => {
            let mut out = stdout.lock();
            out.write_all(report::render_text(&snapshot).as_bytes())?;
        }
        Format::Csv => report::write_csv(&snapshot, stdout.lock()).context("writing CSV")?,
        Format::Json => {
            let json = report::to_json(&snapshot).context("serialising report")?;
            let mut out = stdout.lock();
            writeln!(out, "{json}")?;
        }
    }

    Ok(())
}

/// Wait for the progress logger. Returns `false` when it panicked.
fn join_progress_logger(handle: thread::JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            tracing::warn!("Progress reporter thread panicked");
            false
        }
    }
}
