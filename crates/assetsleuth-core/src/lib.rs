/// AssetSleuth Core: backlink index, unused-asset analysis, and data model.
///
/// This crate contains all business logic with zero CLI dependencies.
/// It is designed to be driven by any frontend (CLI, editor plugin, TUI).
///
/// # Modules
///
/// - [`model`]: Asset identifiers, folder aggregates, size formatting.
/// - [`contracts`]: Collaborator traits the index consumes.
/// - [`index`]: Forward/backward dependency maps and the folder registry.
/// - [`analysis`]: Unused-asset snapshot and backlink queries.
/// - [`cleaner`]: The glue type frontends talk to.
/// - [`scanner`]: Project enumeration with progress reporting.
/// - [`project`]: Filesystem-backed classifier and GUID resolver.
/// - [`config`]: User-tunable settings and the path ignore filter.
/// - [`report`]: CSV / JSON / text rendering of a snapshot.
pub mod analysis;
pub mod cleaner;
pub mod config;
pub mod contracts;
pub mod error;
pub mod index;
pub mod model;
pub mod project;
pub mod report;
pub mod scanner;

pub use cleaner::AssetCleaner;
pub use error::{CleanerError, Result};
